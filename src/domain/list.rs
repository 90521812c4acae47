//! List Entity
//!
//! A list is ordered among the lists of its board and is itself the
//! container of ordered cards.

use serde::{Deserialize, Serialize};
use super::board::Board;
use super::entity::Entity;
use super::ordered::{Container, OrderedItem};

/// A column of cards on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardList {
    /// Unique identifier
    pub id: u32,
    /// Owning board; changes only together with `position`
    pub(crate) board_id: u32,
    pub name: String,
    /// Sort key among the board's lists
    pub(crate) position: f64,
    pub cover_url: Option<String>,
    pub is_archived: bool,
    /// Epoch millis of archiving
    pub archived_at: Option<i64>,
}

impl BoardList {
    /// Create an unsaved list; the move coordinator assigns board and position
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            board_id: 0,
            name: name.into(),
            position: 0.0,
            cover_url: None,
            is_archived: false,
            archived_at: None,
        }
    }

    pub fn with_cover(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }

    pub fn board_id(&self) -> u32 {
        self.board_id
    }

    pub fn position(&self) -> f64 {
        self.position
    }
}

impl Entity for BoardList {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Container for BoardList {
    const KIND: &'static str = "list";
    const OWNER_KIND: &'static str = "board";

    fn owner_id(&self) -> u32 {
        self.board_id
    }
}

impl OrderedItem for BoardList {
    type Container = Board;

    const KIND: &'static str = "list";

    fn container_id(&self) -> u32 {
        self.board_id
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn place(&mut self, container_id: u32, position: f64) {
        self.board_id = container_id;
        self.position = position;
    }

    fn assign_id(&mut self, id: u32) {
        self.id = id;
    }

    fn is_archived(&self) -> bool {
        self.is_archived
    }

    fn set_archived(&mut self, archived: bool, at: Option<i64>) {
        self.is_archived = archived;
        self.archived_at = if archived { at } else { None };
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn duplicate(&self, title: String) -> Self {
        Self {
            id: 0,
            board_id: self.board_id,
            name: title,
            position: self.position,
            cover_url: self.cover_url.clone(),
            is_archived: false,
            archived_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_creation() {
        let list = BoardList::new("Todo").with_cover("http://img/1.png");
        assert_eq!(list.id(), 0);
        assert_eq!(list.name, "Todo");
        assert_eq!(list.cover_url.as_deref(), Some("http://img/1.png"));
    }

    #[test]
    fn test_place_sets_board_and_position_together() {
        let mut list = BoardList::new("Todo");
        list.place(4, 250.0);
        assert_eq!(list.board_id(), 4);
        assert_eq!(OrderedItem::position(&list), 250.0);
        assert_eq!(list.owner_id(), 4);
    }

    #[test]
    fn test_duplicate_resets_identity_and_archive() {
        let mut list = BoardList::new("Doing").with_cover("c");
        list.id = 9;
        list.place(2, 300.0);
        list.set_archived(true, Some(1));

        let copy = list.duplicate("Doing (copy)".to_string());
        assert_eq!(copy.id, 0);
        assert_eq!(copy.name, "Doing (copy)");
        assert_eq!(copy.cover_url.as_deref(), Some("c"));
        assert!(!copy.is_archived);
    }
}
