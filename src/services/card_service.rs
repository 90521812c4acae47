//! Card Service
//!
//! Cards ordered within lists. Moves and copies name both the target list and
//! the board the caller expects it on.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::OrderingConfig;
use crate::domain::{Card, DomainError, DomainResult};
use crate::ordering::{Destination, MoveCoordinator};
use crate::repository::{CardRepository, SiblingRepository};

/// Content changes to a card; `None` leaves the field alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<i64>,
    pub deadline_date: Option<i64>,
    pub is_completed: Option<bool>,
}

pub struct CardService<R: SiblingRepository<Card> = CardRepository> {
    ordering: MoveCoordinator<Card, R>,
}

impl<R: SiblingRepository<Card>> CardService<R> {
    pub fn new(repo: Arc<R>, config: OrderingConfig) -> Self {
        Self {
            ordering: MoveCoordinator::new(repo, config),
        }
    }

    /// Append a new card to a list
    pub async fn create_card(&self, list_id: u32, title: &str, description: Option<String>) -> DomainResult<Card> {
        let mut card = Card::new(validated_title(title)?);
        card.description = description;
        self.ordering.create_at_end(list_id, card).await
    }

    pub async fn get_card(&self, id: u32) -> DomainResult<Card> {
        self.ordering
            .repository()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("card {} not found", id)))
    }

    /// Live cards of a list in display order
    pub async fn cards_in_list(&self, list_id: u32) -> DomainResult<Vec<Card>> {
        self.ordering.siblings(list_id).await
    }

    /// Change content fields; list and position are untouched
    pub async fn update_card(&self, id: u32, update: CardUpdate) -> DomainResult<Card> {
        let mut card = self.get_card(id).await?;

        if let Some(title) = update.title {
            card.title = validated_title(&title)?;
        }
        if let Some(description) = update.description {
            card.description = Some(description);
        }
        if let Some(start) = update.start_date {
            card.start_date = Some(start);
        }
        if let Some(deadline) = update.deadline_date {
            card.deadline_date = Some(deadline);
        }
        if let (Some(start), Some(deadline)) = (card.start_date, card.deadline_date) {
            if deadline < start {
                return Err(DomainError::invalid("deadline_date must not precede start_date"));
            }
        }
        if let Some(done) = update.is_completed {
            card.is_completed = done;
        }

        self.ordering.repository().update(&card).await
    }

    pub async fn set_archive(&self, id: u32, archived: bool) -> DomainResult<Card> {
        self.ordering.set_archived(id, archived).await
    }

    pub async fn reorder_card(&self, id: u32, new_index: usize) -> DomainResult<Vec<Card>> {
        self.ordering.reorder(id, new_index).await
    }

    /// Move a card to `to_list_id`, which must be on `to_board_id`
    pub async fn move_card(&self, id: u32, to_list_id: u32, to_board_id: u32, new_index: usize) -> DomainResult<Vec<Card>> {
        self.ordering
            .move_to(id, Destination::owned_by(to_list_id, to_board_id), new_index)
            .await
    }

    /// Copy a card into `to_list_id`, which must be on `to_board_id`
    pub async fn copy_card(
        &self,
        id: u32,
        to_list_id: u32,
        to_board_id: u32,
        new_index: usize,
        new_title: Option<String>,
    ) -> DomainResult<Card> {
        self.ordering
            .copy_to(id, Destination::owned_by(to_list_id, to_board_id), new_index, new_title)
            .await
    }
}

pub(super) fn validated_title(title: &str) -> DomainResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::invalid("Title must not be empty"));
    }
    Ok(title.to_string())
}
