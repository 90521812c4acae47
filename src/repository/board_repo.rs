//! Workspace and Board Repositories
//!
//! Containers of lists. Only what the ordering services need to find and
//! create containers lives here.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

use crate::domain::{Board, DomainResult, Workspace};
use super::db::{not_initialized, SharedConnection};
use super::traits::Repository;

pub struct WorkspaceRepository {
    conn: SharedConnection,
}

impl WorkspaceRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Create a new workspace
    pub async fn create(&self, name: &str) -> DomainResult<Workspace> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("INSERT INTO workspaces (name) VALUES (?)", params![name])?;
        let id = conn.last_insert_rowid() as u32;
        Ok(Workspace::new(id, name.to_string()))
    }

    pub async fn find_by_id(&self, id: u32) -> DomainResult<Option<Workspace>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let workspace = conn
            .query_row("SELECT id, name FROM workspaces WHERE id = ?", params![id], |row| {
                Ok(Workspace::new(row.get(0)?, row.get(1)?))
            })
            .optional()?;
        Ok(workspace)
    }
}

/// SQLite implementation of Board repository
pub struct BoardRepository {
    conn: SharedConnection,
}

impl BoardRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub async fn list_by_workspace(&self, workspace_id: u32) -> DomainResult<Vec<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(
            "SELECT id, workspace_id, name, description, created_at FROM boards WHERE workspace_id = ? ORDER BY id",
        )?;
        let boards = stmt
            .query_map(params![workspace_id], row_to_board)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(boards)
    }
}

#[async_trait]
impl Repository<Board> for BoardRepository {
    async fn create(&self, entity: &Board) -> DomainResult<Board> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let now = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO boards (workspace_id, name, description, created_at) VALUES (?, ?, ?, ?)",
            params![entity.workspace_id, entity.name, entity.description, now],
        )?;

        let mut board = entity.clone();
        board.id = conn.last_insert_rowid() as u32;
        board.created_at = Some(now);
        Ok(board)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_board(conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(
            "SELECT id, workspace_id, name, description, created_at FROM boards ORDER BY id",
        )?;
        let boards = stmt.query_map([], row_to_board)?.collect::<Result<Vec<_>, _>>()?;
        Ok(boards)
    }

    async fn update(&self, entity: &Board) -> DomainResult<Board> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "UPDATE boards SET workspace_id = ?, name = ?, description = ? WHERE id = ?",
            params![entity.workspace_id, entity.name, entity.description, entity.id],
        )?;
        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("DELETE FROM boards WHERE id = ?", params![id])?;
        Ok(())
    }
}

/// Look up a board on an already locked connection
pub(super) fn find_board(conn: &rusqlite::Connection, id: u32) -> DomainResult<Option<Board>> {
    let board = conn
        .query_row(
            "SELECT id, workspace_id, name, description, created_at FROM boards WHERE id = ?",
            params![id],
            row_to_board,
        )
        .optional()?;
    Ok(board)
}

fn row_to_board(row: &Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
    })
}
