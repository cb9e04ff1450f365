//! Repository traits for the glossary
//!
//! Storage backends implement these traits. Each call is one bounded
//! unit of work against the backing store; implementations must make every
//! mutation atomic, enforce case-insensitive uniqueness of the term key, and
//! remove dependent relations in the same unit of work as a deleted term.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::relation::{Relation, RelationCreateInput, RelationId, RelationUpdateInput};
use super::term::{Term, TermCreateInput, TermId, TermQuery, TermUpdateInput};
use crate::error::GlossaryError;

/// Repository for term records
#[async_trait]
pub trait TermRepository: Send + Sync {
    /// Terms ordered by key, filtered and paged by `query`
    async fn list(&self, query: &TermQuery) -> Result<Vec<Term>, GlossaryError>;

    /// Find a term by id
    async fn find_by_id(&self, id: TermId) -> Result<Option<Term>, GlossaryError>;

    /// Case-insensitive exact match on the term key
    async fn find_by_keyword(&self, keyword: &str) -> Result<Option<Term>, GlossaryError>;

    /// Insert a new term; `Conflict` when the key is taken
    async fn insert(&self, input: &TermCreateInput, now: DateTime<Utc>) -> Result<Term, GlossaryError>;

    /// Apply a partial update; `None` when the id is absent
    async fn update(
        &self,
        id: TermId,
        input: &TermUpdateInput,
        now: DateTime<Utc>,
    ) -> Result<Option<Term>, GlossaryError>;

    /// Delete a term and every relation touching it; `false` when absent
    async fn delete(&self, id: TermId) -> Result<bool, GlossaryError>;
}

/// Repository for relation records
#[async_trait]
pub trait RelationRepository: Send + Sync {
    /// Every relation, unfiltered
    async fn list_all(&self) -> Result<Vec<Relation>, GlossaryError>;

    /// Find a relation by id
    async fn find_by_id(&self, id: RelationId) -> Result<Option<Relation>, GlossaryError>;

    /// Insert a relation; both endpoints must exist
    async fn insert(&self, input: &RelationCreateInput) -> Result<Relation, GlossaryError>;

    /// Apply a partial update; `None` when the id is absent
    async fn update(
        &self,
        id: RelationId,
        input: &RelationUpdateInput,
    ) -> Result<Option<Relation>, GlossaryError>;

    /// Delete a relation; `false` when absent
    async fn delete(&self, id: RelationId) -> Result<bool, GlossaryError>;
}
