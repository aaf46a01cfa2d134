//! Client-side page slicing.

use serde::Serialize;

/// One 1-indexed page of a slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, R> {
    pub slice: &'a [R],
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    /// Never below 1, even for an empty input.
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Slice page `page` (1-indexed) of `items`.
///
/// `page == 0` is read as page 1 and `page_size == 0` as 1. A page past the end
/// yields an empty slice with `has_next == false`.
pub fn paginate<R>(items: &[R], page: usize, page_size: usize) -> Page<'_, R> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_count = items.len();
    let total_pages = total_count.div_ceil(page_size).max(1);

    let start = (page - 1).saturating_mul(page_size);
    let slice = if start >= total_count {
        &items[..0]
    } else {
        let end = start.saturating_add(page_size).min(total_count);
        &items[start..end]
    };

    Page {
        slice,
        page,
        page_size,
        total_count,
        total_pages,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_middle_last() {
        let items: Vec<u32> = (1..=25).collect();

        let first = paginate(&items, 1, 10);
        assert_eq!(first.slice, &items[0..10]);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next && !first.has_prev);

        let middle = paginate(&items, 2, 10);
        assert!(middle.has_next && middle.has_prev);

        let last = paginate(&items, 3, 10);
        assert_eq!(last.slice, &items[20..25]);
        assert_eq!(last.slice.len(), 5);
        assert!(!last.has_next && last.has_prev);
    }

    #[test]
    fn empty_input_has_one_page() {
        let page = paginate::<u32>(&[], 1, 20);
        assert_eq!(page.total_pages, 1);
        assert!(page.slice.is_empty());
        assert!(!page.has_next && !page.has_prev);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let items = [1, 2, 3];
        let zero = paginate(&items, 0, 0);
        assert_eq!(zero.page, 1);
        assert_eq!(zero.page_size, 1);
        assert_eq!(zero.slice, &[1]);

        let past = paginate(&items, 9, 2);
        assert!(past.slice.is_empty());
        assert!(!past.has_next);
        assert!(past.has_prev);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: page bounds and slice length hold for any input.
        #[test]
        fn page_bounds_hold(len in 0usize..200, page in 1usize..30, size in 1usize..50) {
            let items: Vec<usize> = (0..len).collect();
            let p = paginate(&items, page, size);

            prop_assert!(p.total_pages >= 1);
            prop_assert_eq!(p.has_prev, page > 1);
            if page >= p.total_pages {
                prop_assert!(!p.has_next);
            }
            let remaining = len.saturating_sub((page - 1) * size);
            prop_assert_eq!(p.slice.len(), size.min(remaining));
        }
    }
}
