//! Move coordination
//!
//! Single entry point for create-at-end, reorder, move and copy of one kind of
//! ordered item. Every precondition is checked before the first write.

use std::sync::Arc;

use crate::config::OrderingConfig;
use crate::domain::{copy_title, Container, DomainError, DomainResult, OrderedItem};
use crate::repository::SiblingRepository;
use super::engine::PositionEngine;
use super::reindex::Reindexer;

/// Target container of a move or copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub container_id: u32,
    /// Owner the caller says the container belongs to, e.g. the board of a
    /// target list. Checked when present.
    pub expected_owner: Option<u32>,
}

impl Destination {
    pub fn new(container_id: u32) -> Self {
        Self {
            container_id,
            expected_owner: None,
        }
    }

    pub fn owned_by(container_id: u32, owner_id: u32) -> Self {
        Self {
            container_id,
            expected_owner: Some(owner_id),
        }
    }
}

pub struct MoveCoordinator<T: OrderedItem, R: SiblingRepository<T>> {
    repo: Arc<R>,
    engine: PositionEngine<T>,
    reindexer: Reindexer<T, R>,
}

impl<T: OrderedItem, R: SiblingRepository<T>> MoveCoordinator<T, R> {
    pub fn new(repo: Arc<R>, config: OrderingConfig) -> Self {
        let engine = PositionEngine::new(config);
        Self {
            reindexer: Reindexer::new(repo.clone(), engine.clone()),
            engine,
            repo,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    pub fn engine(&self) -> &PositionEngine<T> {
        &self.engine
    }

    /// Live items of a container, ascending
    pub async fn siblings(&self, container_id: u32) -> DomainResult<Vec<T>> {
        self.load_container(container_id, "").await?;
        self.repo.list_siblings(container_id, false).await
    }

    /// Persist `item` as the last item of `container_id`
    pub async fn create_at_end(&self, container_id: u32, mut item: T) -> DomainResult<T> {
        self.load_container(container_id, "").await?;

        let count = self.repo.count_siblings(container_id).await?;
        let last = self
            .repo
            .list_siblings(container_id, true)
            .await?
            .last()
            .map(|sibling| sibling.position());
        let position = self.engine.append_position(count, last);

        item.place(container_id, position);
        let created = self.repo.create(&item).await?;
        log::debug!(
            "Created {} {} in {} {} at {}",
            T::KIND,
            created.id(),
            <T::Container as Container>::KIND,
            container_id,
            position
        );
        Ok(created)
    }

    /// Move an item to `new_index` within its own container. Returns the
    /// container's live items in their new order.
    pub async fn reorder(&self, item_id: u32, new_index: usize) -> DomainResult<Vec<T>> {
        let mut item = self.load_live_item(item_id).await?;
        let container_id = item.container_id();

        let siblings = self.siblings_without(container_id, item_id).await?;
        check_index(new_index, siblings.len())?;

        let position = self.engine.compute_insertion_position(&siblings, new_index);
        item.place(container_id, position);
        self.repo.update_placement(&item).await?;
        self.reindex_if_crowded(item).await?;

        self.repo.list_siblings(container_id, false).await
    }

    /// Re-parent an item into `destination` at `new_index`. Returns the
    /// destination's live items in their new order.
    pub async fn move_to(&self, item_id: u32, destination: Destination, new_index: usize) -> DomainResult<Vec<T>> {
        let mut item = self.load_live_item(item_id).await?;
        let source_id = item.container_id();
        self.load_container(source_id, "source ").await?;
        self.resolve_destination(&destination).await?;

        let target_id = destination.container_id;
        let siblings = self.siblings_without(target_id, item_id).await?;
        check_index(new_index, siblings.len())?;

        let position = self.engine.compute_insertion_position(&siblings, new_index);
        item.place(target_id, position);
        self.repo.update_placement(&item).await?;
        self.reindex_if_crowded(item).await?;
        log::info!(
            "Moved {} {} from {} {} to {} {} at index {}",
            T::KIND,
            item_id,
            <T::Container as Container>::KIND,
            source_id,
            <T::Container as Container>::KIND,
            target_id,
            new_index
        );

        self.repo.list_siblings(target_id, false).await
    }

    /// Create a copy of an item in `destination` at `new_index`, titled
    /// `new_title` or "<title> (copy)". The source is not modified.
    pub async fn copy_to(
        &self,
        item_id: u32,
        destination: Destination,
        new_index: usize,
        new_title: Option<String>,
    ) -> DomainResult<T> {
        let copy = self.prepare_copy(item_id, destination, new_index, new_title).await?;
        let created = self.repo.create(&copy).await?;
        log::info!(
            "Copied {} {} to {} {} as {}",
            T::KIND,
            item_id,
            <T::Container as Container>::KIND,
            created.container_id(),
            created.id()
        );
        self.reindex_if_crowded(created).await
    }

    /// Check a copy request and build the unsaved copy at its key. Nothing is
    /// written; the caller persists it and then calls
    /// [`Self::reindex_if_crowded`].
    pub async fn prepare_copy(
        &self,
        item_id: u32,
        destination: Destination,
        new_index: usize,
        new_title: Option<String>,
    ) -> DomainResult<T> {
        let source = self.load_item(item_id).await?;
        self.load_container(source.container_id(), "source ").await?;
        self.resolve_destination(&destination).await?;

        if let Some(title) = &new_title {
            if title.trim().is_empty() {
                return Err(DomainError::invalid("Copy title must not be empty"));
            }
        }

        let target_id = destination.container_id;
        let siblings = self.repo.list_siblings(target_id, false).await?;
        check_index(new_index, siblings.len())?;

        let position = self.engine.compute_insertion_position(&siblings, new_index);
        let title = new_title.unwrap_or_else(|| copy_title(source.title()));
        let mut copy = source.duplicate(title);
        copy.place(target_id, position);
        Ok(copy)
    }

    /// Archive or restore an item. A restored item keeps its old key.
    pub async fn set_archived(&self, item_id: u32, archived: bool) -> DomainResult<T> {
        let mut item = self.load_item(item_id).await?;
        if item.is_archived() == archived {
            return Ok(item);
        }

        item.set_archived(archived, Some(chrono::Utc::now().timestamp_millis()));
        let saved = self.repo.update(&item).await?;
        if archived {
            return Ok(saved);
        }
        self.reindex_if_crowded(saved).await
    }

    /// Reindex the container of a just written `item` when any two of its
    /// keys, archived items included, are closer than `min_gap`. Returns
    /// `item` with its current key.
    pub async fn reindex_if_crowded(&self, item: T) -> DomainResult<T> {
        let container_id = item.container_id();
        let all = self.repo.list_siblings(container_id, true).await?;
        if !self.engine.needs_reindex(&all) {
            return Ok(item);
        }

        log::info!(
            "Keys in {} {} closer than {}, reindexing",
            <T::Container as Container>::KIND,
            container_id,
            self.engine.config().min_gap
        );
        let reindexed = self.reindexer.reindex(container_id).await?;
        Ok(Self::refreshed(item, reindexed))
    }

    /// Pick the post-reindex copy of `item`
    fn refreshed(item: T, reindexed: Vec<T>) -> T {
        let id = item.id();
        reindexed
            .into_iter()
            .find(|sibling| sibling.id() == id)
            .unwrap_or(item)
    }

    async fn siblings_without(&self, container_id: u32, item_id: u32) -> DomainResult<Vec<T>> {
        let mut siblings = self.repo.list_siblings(container_id, false).await?;
        siblings.retain(|sibling| sibling.id() != item_id);
        Ok(siblings)
    }

    async fn load_item(&self, item_id: u32) -> DomainResult<T> {
        self.repo
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("{} {} not found", T::KIND, item_id)))
    }

    async fn load_live_item(&self, item_id: u32) -> DomainResult<T> {
        let item = self.load_item(item_id).await?;
        if item.is_archived() {
            return Err(DomainError::invalid(format!(
                "{} {} is archived and cannot be repositioned",
                T::KIND,
                item_id
            )));
        }
        Ok(item)
    }

    async fn load_container(&self, container_id: u32, role: &str) -> DomainResult<T::Container> {
        self.repo.find_container(container_id).await?.ok_or_else(|| {
            DomainError::not_found(format!(
                "{}{} {} not found",
                role,
                <T::Container as Container>::KIND,
                container_id
            ))
        })
    }

    async fn resolve_destination(&self, destination: &Destination) -> DomainResult<T::Container> {
        let target = self.load_container(destination.container_id, "target ").await?;
        if let Some(owner) = destination.expected_owner {
            if target.owner_id() != owner {
                return Err(DomainError::invalid(format!(
                    "target {} does not belong to target {}",
                    <T::Container as Container>::KIND,
                    <T::Container as Container>::OWNER_KIND
                )));
            }
        }
        Ok(target)
    }
}

fn check_index(index: usize, len: usize) -> DomainResult<()> {
    if index > len {
        return Err(DomainError::invalid(format!(
            "Invalid new index {}: expected 0..={}",
            index, len
        )));
    }
    Ok(())
}
