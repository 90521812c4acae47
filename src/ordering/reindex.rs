//! Reindexing
//!
//! Rewrites every key of one container to evenly spaced values, keeping the
//! current order. Only run when adjacent keys have become too close.

use std::sync::Arc;

use crate::domain::{Container, DomainResult, OrderedItem};
use crate::repository::SiblingRepository;
use super::engine::PositionEngine;

pub struct Reindexer<T: OrderedItem, R: SiblingRepository<T>> {
    repo: Arc<R>,
    engine: PositionEngine<T>,
}

impl<T: OrderedItem, R: SiblingRepository<T>> Reindexer<T, R> {
    pub fn new(repo: Arc<R>, engine: PositionEngine<T>) -> Self {
        Self { repo, engine }
    }

    /// Renumber all siblings of `container_id`, archived ones included, to
    /// `spacing, 2 * spacing, ...` in one atomic batch. Returns the renumbered
    /// items in order.
    ///
    /// Running it again on an unchanged container writes the same keys.
    pub async fn reindex(&self, container_id: u32) -> DomainResult<Vec<T>> {
        let mut siblings = self.repo.list_siblings(container_id, true).await?;

        let count = siblings.len();
        for (item, position) in siblings.iter_mut().zip(self.engine.spaced_positions(count)) {
            item.place(container_id, position);
        }

        self.repo.bulk_update(&siblings).await?;
        log::info!(
            "Reindexed {} {}s in {} {}",
            siblings.len(),
            T::KIND,
            <T::Container as Container>::KIND,
            container_id
        );
        Ok(siblings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrderingConfig;
    use crate::domain::{BoardList, Card, ErrorKind};
    use crate::repository::{MemoryRepository, Repository};

    fn seeded(positions: &[f64]) -> Arc<MemoryRepository<Card>> {
        let repo = Arc::new(MemoryRepository::new());
        let mut list = BoardList::new("Todo");
        list.id = 1;
        repo.add_container(list).unwrap();
        for (i, p) in positions.iter().enumerate() {
            let mut card = Card::new(format!("c{}", i));
            card.id = i as u32 + 1;
            card.place(1, *p);
            repo.seed(card).unwrap();
        }
        repo
    }

    fn reindexer(repo: &Arc<MemoryRepository<Card>>) -> Reindexer<Card, MemoryRepository<Card>> {
        Reindexer::new(repo.clone(), PositionEngine::new(OrderingConfig::default()))
    }

    #[tokio::test]
    async fn test_reindex_spaces_evenly_in_order() {
        let repo = seeded(&[12.5, 12.50001, 0.3]);
        let items = reindexer(&repo).reindex(1).await.unwrap();

        let ids: Vec<u32> = items.iter().map(|c| c.id).collect();
        let keys: Vec<f64> = items.iter().map(|c| c.position).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(keys, vec![100.0, 200.0, 300.0]);

        let stored = repo.find_by_id(2).await.unwrap().unwrap();
        assert_eq!(stored.position, 300.0);
    }

    #[tokio::test]
    async fn test_reindex_is_idempotent() {
        let repo = seeded(&[5.0, 5.00001, 9.0, 40.0]);
        let r = reindexer(&repo);
        let first = r.reindex(1).await.unwrap();
        let second = r.reindex(1).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_reindex_is_one_batch() {
        let repo = seeded(&[1.0, 2.0, 3.0, 4.0]);
        repo.reset_row_writes();
        reindexer(&repo).reindex(1).await.unwrap();
        assert_eq!(repo.row_writes(), 4);
    }

    #[tokio::test]
    async fn test_failed_reindex_leaves_keys_untouched() {
        let repo = seeded(&[1.0, 1.00001]);
        repo.set_fail_writes(true);

        let err = reindexer(&repo).reindex(1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let keys: Vec<f64> = repo.list_siblings(1, true).await.unwrap().iter().map(|c| c.position).collect();
        assert_eq!(keys, vec![1.0, 1.00001]);
    }

    #[tokio::test]
    async fn test_reindex_includes_archived() {
        let repo = seeded(&[10.0, 20.0]);
        let mut hidden = repo.find_by_id(1).await.unwrap().unwrap();
        hidden.set_archived(true, Some(1));
        repo.update(&hidden).await.unwrap();

        let items = reindexer(&repo).reindex(1).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().position, 100.0);
    }
}
