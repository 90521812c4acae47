//! List Positioning Operations
//!
//! Sibling queries and batch writes for lists ordered within a board.

use async_trait::async_trait;
use rusqlite::params;

use crate::domain::{Board, BoardList, Card, DomainError, DomainResult, OrderedItem};
use super::super::board_repo::find_board;
use super::super::db::not_initialized;
use super::super::card::insert_card;
use super::super::traits::{ListStore, SiblingRepository};
use super::list_repo::{insert_list, row_to_list, ListRepository, LIST_COLUMNS};

#[async_trait]
impl SiblingRepository<BoardList> for ListRepository {
    async fn find_container(&self, container_id: u32) -> DomainResult<Option<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_board(conn, container_id)
    }

    async fn list_siblings(&self, container_id: u32, include_archived: bool) -> DomainResult<Vec<BoardList>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let query = if include_archived {
            format!(
                "SELECT {} FROM board_lists WHERE board_id = ? ORDER BY position ASC, id ASC",
                LIST_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM board_lists WHERE board_id = ? AND is_archived = 0 ORDER BY position ASC, id ASC",
                LIST_COLUMNS
            )
        };

        let mut stmt = conn.prepare(&query)?;
        let lists = stmt
            .query_map(params![container_id], row_to_list)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    async fn count_siblings(&self, container_id: u32) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM board_lists WHERE board_id = ? AND is_archived = 0",
            params![container_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    async fn update_placement(&self, item: &BoardList) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE board_lists SET board_id = ?, position = ? WHERE id = ?",
            params![item.board_id, item.position, item.id],
        )?;
        if changed == 0 {
            return Err(DomainError::not_found(format!("list {} not found", item.id)));
        }
        Ok(())
    }

    async fn bulk_update(&self, items: &[BoardList]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        // Dropping the transaction without commit rolls every row back
        let tx = conn.transaction()?;
        for list in items {
            tx.execute(
                "UPDATE board_lists SET board_id = ?, position = ? WHERE id = ?",
                params![list.board_id, list.position, list.id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn insert_batch(&self, items: &[BoardList]) -> DomainResult<Vec<BoardList>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let mut created = Vec::with_capacity(items.len());
        for list in items {
            created.push(insert_list(&tx, list)?);
        }
        tx.commit()?;
        Ok(created)
    }
}

#[async_trait]
impl ListStore for ListRepository {
    async fn insert_with_cards(&self, list: &BoardList, cards: &[Card]) -> DomainResult<(BoardList, Vec<Card>)> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let created_list = insert_list(&tx, list)?;
        let mut created_cards = Vec::with_capacity(cards.len());
        for card in cards {
            let mut card = card.clone();
            let position = card.position;
            card.place(created_list.id, position);
            created_cards.push(insert_card(&tx, &card)?);
        }
        tx.commit()?;
        Ok((created_list, created_cards))
    }
}
