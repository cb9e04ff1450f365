//! Application services - the stores that enforce glossary invariants
//! on top of the repository traits.

use std::sync::Arc;

pub mod graph_assembler;
pub mod relation_store;
pub mod term_store;

pub use graph_assembler::{GraphAssembler, GRAPH_NODE_LIMIT};
pub use relation_store::RelationStore;
pub use term_store::TermStore;

use crate::domain::repository::{RelationRepository, TermRepository};

/// Service facade shared by every protocol front-end
#[derive(Clone)]
pub struct GlossaryService {
    terms: TermStore,
    relations: RelationStore,
    graph: GraphAssembler,
}

impl GlossaryService {
    /// Wire the stores over a pair of repositories from the same backend
    pub fn new(term_repo: Arc<dyn TermRepository>, relation_repo: Arc<dyn RelationRepository>) -> Self {
        let terms = TermStore::new(term_repo.clone());
        let relations = RelationStore::new(relation_repo, term_repo);
        let graph = GraphAssembler::new(terms.clone(), relations.clone());
        Self {
            terms,
            relations,
            graph,
        }
    }

    pub fn terms(&self) -> &TermStore {
        &self.terms
    }

    pub fn relations(&self) -> &RelationStore {
        &self.relations
    }

    pub fn graph(&self) -> &GraphAssembler {
        &self.graph
    }
}

#[cfg(test)]
pub(crate) mod mocks {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use mockall::mock;

    use crate::domain::relation::{Relation, RelationCreateInput, RelationId, RelationUpdateInput};
    use crate::domain::repository::{RelationRepository, TermRepository};
    use crate::domain::term::{Term, TermCreateInput, TermId, TermQuery, TermUpdateInput};
    use crate::error::GlossaryError;

    mock! {
        pub TermRepo {}

        #[async_trait]
        impl TermRepository for TermRepo {
            async fn list(&self, query: &TermQuery) -> Result<Vec<Term>, GlossaryError>;
            async fn find_by_id(&self, id: TermId) -> Result<Option<Term>, GlossaryError>;
            async fn find_by_keyword(&self, keyword: &str) -> Result<Option<Term>, GlossaryError>;
            async fn insert(&self, input: &TermCreateInput, now: DateTime<Utc>) -> Result<Term, GlossaryError>;
            async fn update(&self, id: TermId, input: &TermUpdateInput, now: DateTime<Utc>) -> Result<Option<Term>, GlossaryError>;
            async fn delete(&self, id: TermId) -> Result<bool, GlossaryError>;
        }
    }

    mock! {
        pub RelationRepo {}

        #[async_trait]
        impl RelationRepository for RelationRepo {
            async fn list_all(&self) -> Result<Vec<Relation>, GlossaryError>;
            async fn find_by_id(&self, id: RelationId) -> Result<Option<Relation>, GlossaryError>;
            async fn insert(&self, input: &RelationCreateInput) -> Result<Relation, GlossaryError>;
            async fn update(&self, id: RelationId, input: &RelationUpdateInput) -> Result<Option<Relation>, GlossaryError>;
            async fn delete(&self, id: RelationId) -> Result<bool, GlossaryError>;
        }
    }
}
