//! Card Positioning Operations
//!
//! Sibling queries and batch writes for cards ordered within a list.

use async_trait::async_trait;
use rusqlite::params;

use crate::domain::{BoardList, Card, DomainError, DomainResult};
use super::super::db::not_initialized;
use super::super::list::find_list;
use super::super::traits::SiblingRepository;
use super::card_repo::{insert_card, row_to_card, CardRepository, CARD_COLUMNS};

#[async_trait]
impl SiblingRepository<Card> for CardRepository {
    async fn find_container(&self, container_id: u32) -> DomainResult<Option<BoardList>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_list(conn, container_id)
    }

    async fn list_siblings(&self, container_id: u32, include_archived: bool) -> DomainResult<Vec<Card>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let query = if include_archived {
            format!(
                "SELECT {} FROM cards WHERE list_id = ? ORDER BY position ASC, id ASC",
                CARD_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM cards WHERE list_id = ? AND is_archived = 0 ORDER BY position ASC, id ASC",
                CARD_COLUMNS
            )
        };

        let mut stmt = conn.prepare(&query)?;
        let cards = stmt
            .query_map(params![container_id], row_to_card)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    async fn count_siblings(&self, container_id: u32) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM cards WHERE list_id = ? AND is_archived = 0",
            params![container_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    async fn update_placement(&self, item: &Card) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE cards SET list_id = ?, position = ? WHERE id = ?",
            params![item.list_id, item.position, item.id],
        )?;
        if changed == 0 {
            return Err(DomainError::not_found(format!("card {} not found", item.id)));
        }
        Ok(())
    }

    async fn bulk_update(&self, items: &[Card]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        // Dropping the transaction without commit rolls every row back
        let tx = conn.transaction()?;
        for card in items {
            tx.execute(
                "UPDATE cards SET list_id = ?, position = ? WHERE id = ?",
                params![card.list_id, card.position, card.id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn insert_batch(&self, items: &[Card]) -> DomainResult<Vec<Card>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let mut created = Vec::with_capacity(items.len());
        for card in items {
            created.push(insert_card(&tx, card)?);
        }
        tx.commit()?;
        Ok(created)
    }
}
