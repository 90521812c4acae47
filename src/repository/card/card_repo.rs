//! Card Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Card CRUD operations.
//! Ordering operations are in card_positioning.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{Card, DomainError, DomainResult};
use super::super::db::{not_initialized, SharedConnection};
use super::super::traits::Repository;

pub(super) const CARD_COLUMNS: &str = "id, list_id, title, description, position, is_archived, archived_at, start_date, deadline_date, is_completed";

/// SQLite implementation of Card repository
pub struct CardRepository {
    pub(super) conn: SharedConnection,
}

impl CardRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Card> for CardRepository {
    async fn create(&self, entity: &Card) -> DomainResult<Card> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        insert_card(conn, entity)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Card>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_card(conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Card>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM cards ORDER BY list_id, position ASC, id ASC",
            CARD_COLUMNS
        ))?;
        let cards = stmt.query_map([], row_to_card)?.collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    async fn update(&self, entity: &Card) -> DomainResult<Card> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        // Placement is written only by update_placement
        conn.execute(
            "UPDATE cards SET title = ?, description = ?, is_archived = ?, archived_at = ?, start_date = ?, deadline_date = ?, is_completed = ? WHERE id = ?",
            params![
                entity.title,
                entity.description,
                entity.is_archived,
                entity.archived_at,
                entity.start_date,
                entity.deadline_date,
                entity.is_completed,
                entity.id
            ],
        )?;
        find_card(conn, entity.id)?
            .ok_or_else(|| DomainError::not_found(format!("card {} not found", entity.id)))
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("DELETE FROM cards WHERE id = ?", params![id])?;
        Ok(())
    }
}

pub(crate) fn insert_card(conn: &Connection, entity: &Card) -> DomainResult<Card> {
    conn.execute(
        "INSERT INTO cards (list_id, title, description, position, is_archived, archived_at, start_date, deadline_date, is_completed) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            entity.list_id,
            entity.title,
            entity.description,
            entity.position,
            entity.is_archived,
            entity.archived_at,
            entity.start_date,
            entity.deadline_date,
            entity.is_completed
        ],
    )?;

    let mut card = entity.clone();
    card.id = conn.last_insert_rowid() as u32;
    Ok(card)
}

pub(super) fn find_card(conn: &Connection, id: u32) -> DomainResult<Option<Card>> {
    let card = conn
        .query_row(
            &format!("SELECT {} FROM cards WHERE id = ?", CARD_COLUMNS),
            params![id],
            row_to_card,
        )
        .optional()?;
    Ok(card)
}

/// Convert a database row to Card
pub(super) fn row_to_card(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        list_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        position: row.get(4)?,
        is_archived: row.get(5)?,
        archived_at: row.get(6)?,
        start_date: row.get(7)?,
        deadline_date: row.get(8)?,
        is_completed: row.get(9)?,
    })
}
