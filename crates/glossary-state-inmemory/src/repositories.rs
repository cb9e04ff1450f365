use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use glossary_core::{
    domain::relation::{Relation, RelationCreateInput, RelationId, RelationUpdateInput},
    domain::repository::{RelationRepository, TermRepository},
    domain::term::{Term, TermCreateInput, TermId, TermQuery, TermUpdateInput},
    GlossaryError,
};

/// Term and relation tables plus their id sequences
#[derive(Debug, Default)]
pub struct GlossaryTables {
    terms: BTreeMap<i64, Term>,
    relations: BTreeMap<i64, Relation>,
    last_term_id: i64,
    last_relation_id: i64,
}

impl GlossaryTables {
    fn key_taken(&self, key: &str, except: Option<TermId>) -> bool {
        self.terms
            .values()
            .any(|term| Some(term.id) != except && term.key_matches(key))
    }

    fn check_endpoints(&self, ids: &[TermId]) -> Result<(), GlossaryError> {
        match ids.iter().find(|id| !self.terms.contains_key(&id.0)) {
            Some(missing) => Err(GlossaryError::validation(format!(
                "referenced term {} does not exist",
                missing
            ))),
            None => Ok(()),
        }
    }
}

fn conflict(key: &str) -> GlossaryError {
    GlossaryError::Conflict(format!("term '{}' already exists", key))
}

/// In-memory implementation of the TermRepository
pub struct InMemoryTermRepository {
    tables: Arc<RwLock<GlossaryTables>>,
}

impl InMemoryTermRepository {
    /// Create a new in-memory term repository
    pub fn new(tables: Arc<RwLock<GlossaryTables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl TermRepository for InMemoryTermRepository {
    async fn list(&self, query: &TermQuery) -> Result<Vec<Term>, GlossaryError> {
        let tables = self.tables.read().await;

        let mut matching: Vec<&Term> = tables
            .terms
            .values()
            .filter(|term| query.filter().map_or(true, |q| term.matches_query(q)))
            .collect();
        matching.sort_by(|a, b| {
            a.term
                .to_lowercase()
                .cmp(&b.term.to_lowercase())
                .then_with(|| a.term.cmp(&b.term))
        });

        Ok(matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: TermId) -> Result<Option<Term>, GlossaryError> {
        let tables = self.tables.read().await;
        Ok(tables.terms.get(&id.0).cloned())
    }

    async fn find_by_keyword(&self, keyword: &str) -> Result<Option<Term>, GlossaryError> {
        let tables = self.tables.read().await;
        Ok(tables.terms.values().find(|term| term.key_matches(keyword)).cloned())
    }

    async fn insert(&self, input: &TermCreateInput, now: DateTime<Utc>) -> Result<Term, GlossaryError> {
        let mut tables = self.tables.write().await;
        if tables.key_taken(&input.term, None) {
            return Err(conflict(&input.term));
        }

        tables.last_term_id += 1;
        let term = Term::from_input(TermId(tables.last_term_id), input, now);
        tables.terms.insert(term.id.0, term.clone());
        Ok(term)
    }

    async fn update(
        &self,
        id: TermId,
        input: &TermUpdateInput,
        now: DateTime<Utc>,
    ) -> Result<Option<Term>, GlossaryError> {
        let mut tables = self.tables.write().await;
        if !tables.terms.contains_key(&id.0) {
            return Ok(None);
        }
        if let Some(key) = input.term.as_ref().into_option() {
            if tables.key_taken(key, Some(id)) {
                return Err(conflict(key));
            }
        }

        let Some(term) = tables.terms.get_mut(&id.0) else {
            return Ok(None);
        };
        input.apply_to(term, now);
        Ok(Some(term.clone()))
    }

    async fn delete(&self, id: TermId) -> Result<bool, GlossaryError> {
        let mut tables = self.tables.write().await;
        if tables.terms.remove(&id.0).is_none() {
            return Ok(false);
        }

        let before = tables.relations.len();
        tables
            .relations
            .retain(|_, relation| relation.source_id != id && relation.target_id != id);
        debug!(
            term_id = %id,
            removed_relations = before - tables.relations.len(),
            "Cascaded term delete"
        );
        Ok(true)
    }
}

/// In-memory implementation of the RelationRepository
pub struct InMemoryRelationRepository {
    tables: Arc<RwLock<GlossaryTables>>,
}

impl InMemoryRelationRepository {
    /// Create a new in-memory relation repository
    pub fn new(tables: Arc<RwLock<GlossaryTables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl RelationRepository for InMemoryRelationRepository {
    async fn list_all(&self) -> Result<Vec<Relation>, GlossaryError> {
        let tables = self.tables.read().await;
        Ok(tables.relations.values().cloned().collect())
    }

    async fn find_by_id(&self, id: RelationId) -> Result<Option<Relation>, GlossaryError> {
        let tables = self.tables.read().await;
        Ok(tables.relations.get(&id.0).cloned())
    }

    async fn insert(&self, input: &RelationCreateInput) -> Result<Relation, GlossaryError> {
        let mut tables = self.tables.write().await;
        // Endpoints may have been deleted since the store checked them
        tables.check_endpoints(&[input.source_id, input.target_id])?;

        tables.last_relation_id += 1;
        let relation = Relation {
            id: RelationId(tables.last_relation_id),
            source_id: input.source_id,
            target_id: input.target_id,
            relation_type: input.relation_type,
        };
        tables.relations.insert(relation.id.0, relation.clone());
        Ok(relation)
    }

    async fn update(
        &self,
        id: RelationId,
        input: &RelationUpdateInput,
    ) -> Result<Option<Relation>, GlossaryError> {
        let mut tables = self.tables.write().await;
        if !tables.relations.contains_key(&id.0) {
            return Ok(None);
        }
        tables.check_endpoints(&input.endpoints())?;

        let Some(relation) = tables.relations.get_mut(&id.0) else {
            return Ok(None);
        };
        input.apply_to(relation);
        Ok(Some(relation.clone()))
    }

    async fn delete(&self, id: RelationId) -> Result<bool, GlossaryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.relations.remove(&id.0).is_some())
    }
}
