//! View configuration (page sizes, export directory).

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::export::DirectorySink;

pub const ENV_PAGE_SIZE: &str = "USERDESK_PAGE_SIZE";
pub const ENV_MAX_PAGE_SIZE: &str = "USERDESK_MAX_PAGE_SIZE";
pub const ENV_EXPORT_DIR: &str = "USERDESK_EXPORT_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Where [`ViewConfig::sink`] exports land.
    pub export_dir: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            export_dir: PathBuf::from("."),
        }
    }
}

impl ViewConfig {
    /// Read overrides from the environment.
    ///
    /// Missing variables keep the default; unparsable or zero values log a
    /// warning and keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse a JSON document; missing keys take their defaults.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let mut config: Self = serde_json::from_str(raw).context("invalid view config JSON")?;
        if config.default_page_size == 0 || config.max_page_size == 0 {
            anyhow::bail!("page sizes must be positive");
        }
        config.default_page_size = config.default_page_size.min(config.max_page_size);
        Ok(config)
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let default_page_size = page_size_var(&lookup, ENV_PAGE_SIZE, defaults.default_page_size);
        let max_page_size = page_size_var(&lookup, ENV_MAX_PAGE_SIZE, defaults.max_page_size);
        let export_dir = lookup(ENV_EXPORT_DIR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        Self {
            default_page_size: default_page_size.min(max_page_size),
            max_page_size,
            export_dir,
        }
    }

    /// Sink that writes exports into [`export_dir`](Self::export_dir).
    pub fn sink(&self) -> DirectorySink {
        DirectorySink::new(self.export_dir.clone())
    }

    /// `None`/`0` become the default page size; larger requests are capped.
    pub fn clamp_page_size(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(0) | None => self.default_page_size,
            Some(size) => size.min(self.max_page_size),
        }
    }
}

fn page_size_var<F>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => {
            warn!(key, value = %raw, default, "invalid page size; using default");
            default
        }
        Ok(size) => size,
    }
}
