//! List Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for BoardList CRUD operations.
//! Ordering operations are in list_positioning.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{BoardList, DomainError, DomainResult};
use super::super::db::{not_initialized, SharedConnection};
use super::super::traits::Repository;

pub(crate) const LIST_COLUMNS: &str = "id, board_id, name, position, cover_url, is_archived, archived_at";

/// SQLite implementation of BoardList repository
pub struct ListRepository {
    pub(super) conn: SharedConnection,
}

impl ListRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<BoardList> for ListRepository {
    async fn create(&self, entity: &BoardList) -> DomainResult<BoardList> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        insert_list(conn, entity)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<BoardList>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_list(conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<BoardList>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM board_lists ORDER BY board_id, position ASC, id ASC",
            LIST_COLUMNS
        ))?;
        let lists = stmt.query_map([], row_to_list)?.collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    async fn update(&self, entity: &BoardList) -> DomainResult<BoardList> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        // Placement is written only by update_placement
        conn.execute(
            "UPDATE board_lists SET name = ?, cover_url = ?, is_archived = ?, archived_at = ? WHERE id = ?",
            params![
                entity.name,
                entity.cover_url,
                entity.is_archived,
                entity.archived_at,
                entity.id
            ],
        )?;
        find_list(conn, entity.id)?
            .ok_or_else(|| DomainError::not_found(format!("list {} not found", entity.id)))
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        // Cards go with their list through ON DELETE CASCADE
        conn.execute("DELETE FROM board_lists WHERE id = ?", params![id])?;
        Ok(())
    }
}

pub(super) fn insert_list(conn: &Connection, entity: &BoardList) -> DomainResult<BoardList> {
    conn.execute(
        "INSERT INTO board_lists (board_id, name, position, cover_url, is_archived, archived_at) VALUES (?, ?, ?, ?, ?, ?)",
        params![
            entity.board_id,
            entity.name,
            entity.position,
            entity.cover_url,
            entity.is_archived,
            entity.archived_at
        ],
    )?;

    let mut list = entity.clone();
    list.id = conn.last_insert_rowid() as u32;
    Ok(list)
}

/// Look up a list on an already locked connection
pub(crate) fn find_list(conn: &Connection, id: u32) -> DomainResult<Option<BoardList>> {
    let list = conn
        .query_row(
            &format!("SELECT {} FROM board_lists WHERE id = ?", LIST_COLUMNS),
            params![id],
            row_to_list,
        )
        .optional()?;
    Ok(list)
}

/// Convert a database row to BoardList
pub(crate) fn row_to_list(row: &Row<'_>) -> rusqlite::Result<BoardList> {
    Ok(BoardList {
        id: row.get(0)?,
        board_id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
        cover_url: row.get(4)?,
        is_archived: row.get(5)?,
        archived_at: row.get(6)?,
    })
}
