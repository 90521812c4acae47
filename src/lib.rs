//! Trellis Backend
//!
//! Fractional-position ordering for boards, lists and cards.
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - ordering: Position arithmetic, reindexing and move coordination
//! - services: Card and list ordering over the SQLite store

pub mod config;
pub mod domain;
pub mod ordering;
pub mod repository;
pub mod services;

use std::sync::Arc;

pub use config::{AppConfig, OrderingConfig};
pub use domain::{DomainError, DomainResult, ErrorKind};

use domain::{Board, Workspace};
use repository::{init_db, BoardRepository, CardRepository, DbState, ListRepository, Repository, WorkspaceRepository};
use services::{CardService, ListService};

/// Application state shared across callers
pub struct AppState {
    pub db_state: DbState,
    pub config: AppConfig,
    pub workspaces: WorkspaceRepository,
    pub boards: BoardRepository,
    pub cards: CardService,
    pub lists: ListService,
}

impl AppState {
    /// Start file logging (when configured), open the database and wire the
    /// services onto one shared connection.
    pub async fn bootstrap(config: AppConfig) -> DomainResult<Self> {
        config.ordering.validate()?;

        if let Some(log_dir) = &config.log_dir {
            // A logger installed by an earlier bootstrap keeps running
            if let Err(e) = rolling_logger::init_logger(log_dir.clone(), "Trellis") {
                log::warn!("File logging not started: {}", e);
            }
        }

        let db_state = init_db(&config.database_path).await?;
        let conn = db_state.connection();

        let card_repo = Arc::new(CardRepository::new(conn.clone()));
        let list_repo = Arc::new(ListRepository::new(conn.clone()));

        let state = Self {
            workspaces: WorkspaceRepository::new(conn.clone()),
            boards: BoardRepository::new(conn),
            cards: CardService::new(card_repo.clone(), config.ordering),
            lists: ListService::new(list_repo, card_repo, config.ordering),
            db_state,
            config,
        };
        let _ = rolling_logger::info("Trellis state ready");
        Ok(state)
    }

    pub async fn create_workspace(&self, name: &str) -> DomainResult<Workspace> {
        self.workspaces.create(name).await
    }

    pub async fn create_board(&self, workspace_id: u32, name: &str) -> DomainResult<Board> {
        if self.workspaces.find_by_id(workspace_id).await?.is_none() {
            return Err(DomainError::not_found(format!("workspace {} not found", workspace_id)));
        }
        self.boards.create(&Board::new(0, workspace_id, name.to_string())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_in_memory() {
        let state = AppState::bootstrap(AppConfig::in_memory()).await.unwrap();
        let ws = state.create_workspace("Home").await.unwrap();
        let board = state.create_board(ws.id, "Chores").await.unwrap();

        let todo = state.lists.create_list(board.id, "Todo", None).await.unwrap();
        let card = state.cards.create_card(todo.id, "Dishes", None).await.unwrap();
        assert_eq!(card.position(), 100.0);
        assert_eq!(state.cards.cards_in_list(todo.id).await.unwrap(), vec![card]);
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_bad_ordering() {
        let mut config = AppConfig::in_memory();
        config.ordering.spacing = -1.0;
        let err = AppState::bootstrap(config).await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_create_board_needs_workspace() {
        let state = AppState::bootstrap(AppConfig::in_memory()).await.unwrap();
        let err = state.create_board(9, "Orphan").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
