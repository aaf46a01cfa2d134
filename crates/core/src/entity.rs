//! Entity trait: a record with a stable identity.

/// Anything fetched from the backend that carries a stable unique identifier.
///
/// The view engine never creates or mutates entities; it only needs the id to
/// tell two rows apart (optimistic rollback, duplicate detection in tests).
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
