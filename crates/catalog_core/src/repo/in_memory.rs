//! Generic in-memory repository.
//!
//! # Responsibility
//! - Store entities in one ordered collection.
//! - Answer searches through the shared filter -> sort -> paginate pipeline.
//!
//! # Invariants
//! - Iteration order is insertion order; `update` keeps an entity's position.
//! - Single writer at a time; writes take `&mut self`.

use crate::model::entity::Entity;
use crate::repo::{NotFoundError, RepoResult, Repository, SearchableRepository};
use crate::search::params::SearchParams;
use crate::search::pipeline::{run_search, SearchSpec};
use crate::search::result::SearchResult;
use log::{debug, warn};

/// Vector-backed repository parameterized by an entity search spec.
#[derive(Debug, Clone)]
pub struct InMemoryRepository<E, S> {
    items: Vec<E>,
    spec: S,
}

impl<E, S> InMemoryRepository<E, S>
where
    E: Entity,
    S: SearchSpec<E>,
{
    pub fn new(spec: S) -> Self {
        Self {
            items: Vec::new(),
            spec,
        }
    }

    /// Stored entities in insertion order.
    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn spec(&self) -> &S {
        &self.spec
    }

    fn position(&self, id: &E::Id) -> Option<usize> {
        self.items.iter().position(|item| item.entity_id() == id)
    }
}

impl<E, S> Default for InMemoryRepository<E, S>
where
    E: Entity,
    S: SearchSpec<E> + Default,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<E, S> Repository<E> for InMemoryRepository<E, S>
where
    E: Entity,
    S: SearchSpec<E>,
{
    fn insert(&mut self, entity: E) -> RepoResult<()> {
        entity.ensure_valid()?;
        self.items.push(entity);
        debug!(
            "event=repo_insert module=repo status=ok store=memory entity={} count=1",
            E::NAME
        );
        Ok(())
    }

    fn bulk_insert(&mut self, entities: Vec<E>) -> RepoResult<()> {
        for entity in &entities {
            entity.ensure_valid()?;
        }
        let count = entities.len();
        self.items.extend(entities);
        debug!(
            "event=repo_bulk_insert module=repo status=ok store=memory entity={} count={}",
            E::NAME,
            count
        );
        Ok(())
    }

    fn update(&mut self, entity: E) -> RepoResult<()> {
        entity.ensure_valid()?;
        let Some(index) = self.position(entity.entity_id()) else {
            warn!(
                "event=repo_update module=repo status=not_found store=memory entity={}",
                E::NAME
            );
            return Err(NotFoundError::of::<E>(entity.entity_id()).into());
        };
        self.items[index] = entity;
        debug!(
            "event=repo_update module=repo status=ok store=memory entity={}",
            E::NAME
        );
        Ok(())
    }

    fn delete(&mut self, id: &E::Id) -> RepoResult<()> {
        let Some(index) = self.position(id) else {
            warn!(
                "event=repo_delete module=repo status=not_found store=memory entity={}",
                E::NAME
            );
            return Err(NotFoundError::of::<E>(id).into());
        };
        self.items.remove(index);
        debug!(
            "event=repo_delete module=repo status=ok store=memory entity={}",
            E::NAME
        );
        Ok(())
    }

    fn find_by_id(&self, id: &E::Id) -> RepoResult<Option<E>> {
        Ok(self.position(id).map(|index| self.items[index].clone()))
    }

    fn find_all(&self) -> RepoResult<Vec<E>> {
        Ok(self.items.clone())
    }
}

impl<E, S> SearchableRepository<E> for InMemoryRepository<E, S>
where
    E: Entity,
    S: SearchSpec<E>,
{
    type Filter = S::Filter;

    fn sortable_fields(&self) -> &[&'static str] {
        self.spec.sortable_fields()
    }

    fn search(&self, params: &SearchParams<Self::Filter>) -> RepoResult<SearchResult<E>> {
        let result = run_search(&self.spec, &self.items, params);
        debug!(
            "event=repo_search module=repo status=ok store=memory entity={} total={} page={} per_page={}",
            E::NAME,
            result.total(),
            result.current_page(),
            result.per_page()
        );
        Ok(result)
    }
}
