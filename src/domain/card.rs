//! Card Entity
//!
//! Cards are ordered within a list.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::list::BoardList;
use super::ordered::OrderedItem;

/// A card on a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier
    pub id: u32,
    /// Owning list; changes only together with `position`
    pub(crate) list_id: u32,
    pub title: String,
    /// Sort key among the list's cards
    pub(crate) position: f64,
    pub description: Option<String>,
    pub is_archived: bool,
    /// Epoch millis of archiving
    pub archived_at: Option<i64>,
    pub start_date: Option<i64>,
    pub deadline_date: Option<i64>,
    pub is_completed: bool,
}

impl Card {
    /// Create an unsaved card; the move coordinator assigns list and position
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            list_id: 0,
            title: title.into(),
            position: 0.0,
            description: None,
            is_archived: false,
            archived_at: None,
            start_date: None,
            deadline_date: None,
            is_completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn list_id(&self) -> u32 {
        self.list_id
    }

    pub fn position(&self) -> f64 {
        self.position
    }
}

impl Entity for Card {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl OrderedItem for Card {
    type Container = BoardList;

    const KIND: &'static str = "card";

    fn container_id(&self) -> u32 {
        self.list_id
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn place(&mut self, container_id: u32, position: f64) {
        self.list_id = container_id;
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
        &self.title
    }

    fn duplicate(&self, title: String) -> Self {
        Self {
            id: 0,
            list_id: self.list_id,
            title,
            position: self.position,
            description: self.description.clone(),
            is_archived: false,
            archived_at: None,
            start_date: self.start_date,
            deadline_date: self.deadline_date,
            is_completed: self.is_completed,
        }
    }
}
