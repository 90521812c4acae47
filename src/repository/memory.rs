//! In-memory repository
//!
//! Non-persistent implementation of [`SiblingRepository`] for any ordered
//! entity. Counts writes and can be told to fail, so ordering behaviour can be
//! checked without SQLite.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::{DomainError, DomainResult, Entity, OrderedItem};
use super::traits::{Repository, SiblingRepository};

struct Store<T: OrderedItem> {
    items: HashMap<u32, T>,
    containers: HashMap<u32, T::Container>,
    next_id: u32,
}

pub struct MemoryRepository<T: OrderedItem> {
    store: Mutex<Store<T>>,
    row_writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl<T: OrderedItem> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store {
                items: HashMap::new(),
                containers: HashMap::new(),
                next_id: 1,
            }),
            row_writes: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Register a container so items can be placed into it
    pub fn add_container(&self, container: T::Container) -> DomainResult<()> {
        self.lock()?.containers.insert(container.id(), container);
        Ok(())
    }

    /// Insert an item as-is, keeping its id, container and position
    pub fn seed(&self, item: T) -> DomainResult<()> {
        let mut store = self.lock()?;
        store.next_id = store.next_id.max(item.id() + 1);
        store.items.insert(item.id(), item);
        Ok(())
    }

    /// Rows written since creation (or the last reset)
    pub fn row_writes(&self) -> usize {
        self.row_writes.load(Ordering::SeqCst)
    }

    pub fn reset_row_writes(&self) {
        self.row_writes.store(0, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with an Internal error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> DomainResult<MutexGuard<'_, Store<T>>> {
        self.store
            .lock()
            .map_err(|_| DomainError::internal("memory store poisoned"))
    }

    fn check_writable(&self) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::internal("simulated storage failure"));
        }
        Ok(())
    }

    fn insert_locked(store: &mut Store<T>, item: &T) -> T {
        let mut created = item.clone();
        created.assign_id(store.next_id);
        store.next_id += 1;
        store.items.insert(created.id(), created.clone());
        created
    }
}

impl<T: OrderedItem> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: OrderedItem + 'static> Repository<T> for MemoryRepository<T> {
    async fn create(&self, entity: &T) -> DomainResult<T> {
        self.check_writable()?;
        let mut store = self.lock()?;
        self.row_writes.fetch_add(1, Ordering::SeqCst);
        Ok(Self::insert_locked(&mut store, entity))
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<T>> {
        Ok(self.lock()?.items.get(&id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<T>> {
        let mut items: Vec<T> = self.lock()?.items.values().cloned().collect();
        items.sort_by_key(|item| item.id());
        Ok(items)
    }

    async fn update(&self, entity: &T) -> DomainResult<T> {
        self.check_writable()?;
        let mut store = self.lock()?;
        let (container_id, position) = match store.items.get(&entity.id()) {
            Some(existing) => (existing.container_id(), existing.position()),
            None => return Err(DomainError::not_found(format!("{} {} not found", T::KIND, entity.id()))),
        };

        let mut stored = entity.clone();
        stored.place(container_id, position);
        self.row_writes.fetch_add(1, Ordering::SeqCst);
        store.items.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        self.check_writable()?;
        self.lock()?.items.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl<T: OrderedItem + 'static> SiblingRepository<T> for MemoryRepository<T>
where
    T::Container: 'static,
{
    async fn find_container(&self, container_id: u32) -> DomainResult<Option<T::Container>> {
        Ok(self.lock()?.containers.get(&container_id).cloned())
    }

    async fn list_siblings(&self, container_id: u32, include_archived: bool) -> DomainResult<Vec<T>> {
        let mut siblings: Vec<T> = self
            .lock()?
            .items
            .values()
            .filter(|item| item.container_id() == container_id)
            .filter(|item| include_archived || !item.is_archived())
            .cloned()
            .collect();
        siblings.sort_by(|a, b| {
            a.position()
                .total_cmp(&b.position())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(siblings)
    }

    async fn count_siblings(&self, container_id: u32) -> DomainResult<usize> {
        Ok(self
            .lock()?
            .items
            .values()
            .filter(|item| item.container_id() == container_id && !item.is_archived())
            .count())
    }

    async fn update_placement(&self, item: &T) -> DomainResult<()> {
        self.check_writable()?;
        let mut store = self.lock()?;
        match store.items.get_mut(&item.id()) {
            Some(existing) => existing.place(item.container_id(), item.position()),
            None => return Err(DomainError::not_found(format!("{} {} not found", T::KIND, item.id()))),
        }
        self.row_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn bulk_update(&self, items: &[T]) -> DomainResult<()> {
        self.check_writable()?;
        let mut store = self.lock()?;
        if let Some(missing) = items.iter().find(|item| !store.items.contains_key(&item.id())) {
            return Err(DomainError::internal(format!("{} {} vanished during batch", T::KIND, missing.id())));
        }
        for item in items {
            if let Some(existing) = store.items.get_mut(&item.id()) {
                existing.place(item.container_id(), item.position());
            }
        }
        self.row_writes.fetch_add(items.len(), Ordering::SeqCst);
        Ok(())
    }

    async fn insert_batch(&self, items: &[T]) -> DomainResult<Vec<T>> {
        self.check_writable()?;
        let mut store = self.lock()?;
        self.row_writes.fetch_add(items.len(), Ordering::SeqCst);
        Ok(items.iter().map(|item| Self::insert_locked(&mut store, item)).collect())
    }
}
