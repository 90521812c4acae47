//! Ordering capabilities
//!
//! A [`Container`] holds an implicit ordered set of [`OrderedItem`]s. Order is
//! never stored as an index: it is derived by sorting children on `position`.

use super::entity::Entity;

/// Parent entity whose children are kept in a user-visible order
pub trait Container: Entity<Id = u32> {
    /// Lowercase noun used in messages ("list", "board")
    const KIND: &'static str;
    /// Lowercase noun of the entity owning this container ("board", "workspace")
    const OWNER_KIND: &'static str;

    /// Id of the entity owning this container
    fn owner_id(&self) -> u32;
}

/// An entity positioned among its siblings inside one container
///
/// The container reference and the position are only ever changed together
/// through [`OrderedItem::place`]; a position means nothing outside the
/// container it was computed for.
pub trait OrderedItem: Entity<Id = u32> {
    type Container: Container;

    /// Lowercase noun used in messages ("card", "list")
    const KIND: &'static str;

    fn container_id(&self) -> u32;

    fn position(&self) -> f64;

    /// Re-parent and re-position in one step
    fn place(&mut self, container_id: u32, position: f64);

    /// Set the id assigned by storage on insert
    fn assign_id(&mut self, id: u32);

    fn is_archived(&self) -> bool;

    /// Archive or restore; `at` is the archive timestamp in epoch millis
    fn set_archived(&mut self, archived: bool, at: Option<i64>);

    /// Display title, used to derive copy titles
    fn title(&self) -> &str;

    /// Clone the copyable content into a new, unsaved item with `title`.
    ///
    /// The result has id 0 and keeps the source placement until the caller
    /// places it.
    fn duplicate(&self, title: String) -> Self;
}

/// Title given to a copy when the caller does not supply one
pub fn copy_title(source: &str) -> String {
    format!("{} (copy)", source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_title() {
        assert_eq!(copy_title("B"), "B (copy)");
        assert_eq!(copy_title("B (copy)"), "B (copy) (copy)");
    }
}
