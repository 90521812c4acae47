//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{BoardList, Card, DomainResult, Entity, OrderedItem};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity, returning it with its assigned id
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity, returning it as stored.
    ///
    /// For ordered entities this writes content only: the stored container
    /// and position are kept and change through
    /// [`SiblingRepository::update_placement`].
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Extension for repositories whose entities are ordered within a container
///
/// This is the collaborator the ordering engine consumes. Sibling listings are
/// always ascending by position (ties broken by id).
#[async_trait]
pub trait SiblingRepository<T: OrderedItem>: Repository<T> {
    /// Find the container an item lives in
    async fn find_container(&self, container_id: u32) -> DomainResult<Option<T::Container>>;

    /// Siblings of a container ordered by position
    async fn list_siblings(&self, container_id: u32, include_archived: bool) -> DomainResult<Vec<T>>;

    /// Number of live (non-archived) siblings
    async fn count_siblings(&self, container_id: u32) -> DomainResult<usize>;

    /// Write only the container and position of one existing item
    async fn update_placement(&self, item: &T) -> DomainResult<()>;

    /// Update every item's container and position atomically: all rows are
    /// written or none are.
    async fn bulk_update(&self, items: &[T]) -> DomainResult<()>;

    /// Insert several new items atomically, returning them with ids
    async fn insert_batch(&self, items: &[T]) -> DomainResult<Vec<T>>;
}

/// List storage that can write a new list together with its cards
#[async_trait]
pub trait ListStore: SiblingRepository<BoardList> {
    /// Insert `list` and `cards` in one atomic write. Every card is put into
    /// the new list and keeps its position.
    async fn insert_with_cards(&self, list: &BoardList, cards: &[Card]) -> DomainResult<(BoardList, Vec<Card>)>;
}
