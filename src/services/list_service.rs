//! List Service
//!
//! Lists ordered within boards. Copying a list also copies its live cards,
//! written together with the new list.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::OrderingConfig;
use crate::domain::{BoardList, Card, DomainError, DomainResult, Entity, OrderedItem};
use crate::ordering::{Destination, MoveCoordinator};
use crate::repository::{CardRepository, ListRepository, ListStore, SiblingRepository};
use super::card_service::validated_title;

/// Content changes to a list; `None` leaves the field alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListUpdate {
    pub name: Option<String>,
    pub cover_url: Option<String>,
}

/// Result of copying a list together with its cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListCopy {
    pub list: BoardList,
    pub cards: Vec<Card>,
}

pub struct ListService<L = ListRepository, C = CardRepository>
where
    L: ListStore,
    C: SiblingRepository<Card>,
{
    ordering: MoveCoordinator<BoardList, L>,
    cards: Arc<C>,
}

impl<L, C> ListService<L, C>
where
    L: ListStore,
    C: SiblingRepository<Card>,
{
    pub fn new(lists: Arc<L>, cards: Arc<C>, config: OrderingConfig) -> Self {
        Self {
            ordering: MoveCoordinator::new(lists, config),
            cards,
        }
    }

    /// Append a new list to a board
    pub async fn create_list(&self, board_id: u32, name: &str, cover_url: Option<String>) -> DomainResult<BoardList> {
        let mut list = BoardList::new(validated_title(name)?);
        list.cover_url = cover_url;
        self.ordering.create_at_end(board_id, list).await
    }

    pub async fn get_list(&self, id: u32) -> DomainResult<BoardList> {
        self.ordering
            .repository()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("list {} not found", id)))
    }

    /// Live lists of a board in display order
    pub async fn lists_in_board(&self, board_id: u32) -> DomainResult<Vec<BoardList>> {
        self.ordering.siblings(board_id).await
    }

    /// Change content fields; board and position are untouched
    pub async fn update_list(&self, id: u32, update: ListUpdate) -> DomainResult<BoardList> {
        let mut list = self.get_list(id).await?;
        if let Some(name) = update.name {
            list.name = validated_title(&name)?;
        }
        if let Some(cover_url) = update.cover_url {
            list.cover_url = Some(cover_url);
        }
        self.ordering.repository().update(&list).await
    }

    pub async fn set_archive(&self, id: u32, archived: bool) -> DomainResult<BoardList> {
        self.ordering.set_archived(id, archived).await
    }

    pub async fn reorder_list(&self, id: u32, new_index: usize) -> DomainResult<Vec<BoardList>> {
        self.ordering.reorder(id, new_index).await
    }

    /// Move a list to another board; `workspace_id`, when given, must own it
    pub async fn move_list(
        &self,
        id: u32,
        to_board_id: u32,
        workspace_id: Option<u32>,
        new_index: usize,
    ) -> DomainResult<Vec<BoardList>> {
        self.ordering
            .move_to(id, destination(to_board_id, workspace_id), new_index)
            .await
    }

    /// Copy a list with its live cards, at their positions, into
    /// `to_board_id`. The list and the cards are written in one transaction.
    pub async fn copy_list(
        &self,
        id: u32,
        to_board_id: u32,
        workspace_id: Option<u32>,
        new_index: usize,
        new_name: Option<String>,
    ) -> DomainResult<ListCopy> {
        let planned = self
            .ordering
            .prepare_copy(id, destination(to_board_id, workspace_id), new_index, new_name)
            .await?;

        let copies: Vec<Card> = self
            .cards
            .list_siblings(id, false)
            .await?
            .iter()
            .map(|card| card.duplicate(card.title.clone()))
            .collect();

        let (list, cards) = self.ordering.repository().insert_with_cards(&planned, &copies).await?;
        log::info!(
            "Copied list {} to board {} as {} with {} cards",
            id,
            to_board_id,
            list.id(),
            cards.len()
        );

        let list = self.ordering.reindex_if_crowded(list).await?;
        Ok(ListCopy { list, cards })
    }
}

fn destination(board_id: u32, workspace_id: Option<u32>) -> Destination {
    match workspace_id {
        Some(workspace) => Destination::owned_by(board_id, workspace),
        None => Destination::new(board_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Board, ErrorKind};
    use crate::repository::{init_db, BoardRepository, Repository, WorkspaceRepository};
    use std::path::Path;

    struct Fixture {
        lists: Arc<ListRepository>,
        cards: Arc<CardRepository>,
        service: ListService,
        /// (workspace, board) pairs
        boards: [(u32, u32); 2],
    }

    async fn setup() -> Fixture {
        let db = init_db(Path::new(":memory:")).await.unwrap();
        let conn = db.connection();
        let workspaces = WorkspaceRepository::new(conn.clone());
        let board_repo = BoardRepository::new(conn.clone());

        let mut boards = [(0, 0); 2];
        for (slot, name) in boards.iter_mut().zip(["Main", "Side"]) {
            let ws = workspaces.create(name).await.unwrap();
            let board = board_repo.create(&Board::new(0, ws.id, name.to_string())).await.unwrap();
            *slot = (ws.id, board.id);
        }

        let lists = Arc::new(ListRepository::new(conn.clone()));
        let cards = Arc::new(CardRepository::new(conn));
        let service = ListService::new(lists.clone(), cards.clone(), OrderingConfig::default());
        Fixture { lists, cards, service, boards }
    }

    fn card_in(list_id: u32, title: &str, position: f64) -> Card {
        let mut card = Card::new(title);
        card.place(list_id, position);
        card
    }

    #[tokio::test]
    async fn test_create_and_reorder_lists() {
        let fx = setup().await;
        let board = fx.boards[0].1;
        let todo = fx.service.create_list(board, "Todo", None).await.unwrap();
        fx.service.create_list(board, "Doing", None).await.unwrap();
        let done = fx.service.create_list(board, "Done", None).await.unwrap();
        assert_eq!(todo.position(), 100.0);
        assert_eq!(done.position(), 300.0);

        let ordered = fx.service.reorder_list(done.id, 1).await.unwrap();
        let names: Vec<&str> = ordered.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Todo", "Done", "Doing"]);
        assert_eq!(ordered[1].position(), 150.0);
    }

    #[tokio::test]
    async fn test_move_list_checks_workspace() {
        let fx = setup().await;
        let [(main_ws, main), (side_ws, side)] = fx.boards;
        let todo = fx.service.create_list(main, "Todo", None).await.unwrap();

        let err = fx.service.move_list(todo.id, side, Some(main_ws), 0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.message(), "target board does not belong to target workspace");

        let moved = fx.service.move_list(todo.id, side, Some(side_ws), 0).await.unwrap();
        assert_eq!(moved[0].board_id(), side);
        assert!(fx.service.lists_in_board(main).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_copy_list_copies_live_cards() {
        let fx = setup().await;
        let board = fx.boards[0].1;
        let todo = fx.service.create_list(board, "Todo", Some("cover".into())).await.unwrap();
        fx.cards.create(&card_in(todo.id, "A", 100.0)).await.unwrap();
        let b = fx.cards.create(&card_in(todo.id, "B", 200.0)).await.unwrap();
        let mut hidden = card_in(todo.id, "hidden", 300.0);
        hidden.set_archived(true, Some(1));
        fx.cards.create(&hidden).await.unwrap();

        let copy = fx.service.copy_list(todo.id, board, None, 1, None).await.unwrap();
        assert_eq!(copy.list.name, "Todo (copy)");
        assert_eq!(copy.list.cover_url.as_deref(), Some("cover"));
        assert_eq!(copy.list.position(), 200.0);

        let stored = fx.cards.list_siblings(copy.list.id, true).await.unwrap();
        let titles: Vec<&str> = stored.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(stored, copy.cards);
        assert_eq!(stored[1].position(), 200.0);

        // Source cards stay where they were
        assert_eq!(fx.cards.find_by_id(b.id).await.unwrap().unwrap().list_id(), todo.id);
        assert_eq!(fx.cards.list_siblings(todo.id, true).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_rejected_copy_writes_nothing() {
        let fx = setup().await;
        let [(main_ws, main), (_, side)] = fx.boards;
        let todo = fx.service.create_list(main, "Todo", None).await.unwrap();
        fx.cards.create(&card_in(todo.id, "A", 100.0)).await.unwrap();

        let err = fx.service.copy_list(todo.id, side, Some(main_ws), 0, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(fx.lists.list().await.unwrap().len(), 1);
        assert_eq!(fx.cards.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_list_name() {
        let fx = setup().await;
        let todo = fx.service.create_list(fx.boards[0].1, "Todo", None).await.unwrap();
        let updated = fx
            .service
            .update_list(todo.id, ListUpdate { name: Some("Backlog".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.name, "Backlog");
        assert_eq!(updated.position(), todo.position());

        let err = fx
            .service
            .update_list(todo.id, ListUpdate { name: Some(" ".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
