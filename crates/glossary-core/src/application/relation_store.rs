use std::sync::Arc;
use tracing::info;

use crate::domain::relation::{Relation, RelationCreateInput, RelationId, RelationUpdateInput};
use crate::domain::repository::{RelationRepository, TermRepository};
use crate::domain::term::TermId;
use crate::error::{GlossaryError, GlossaryResult};

/// Relation Store - directed typed edges between existing terms
#[derive(Clone)]
pub struct RelationStore {
    relations: Arc<dyn RelationRepository>,
    terms: Arc<dyn TermRepository>,
}

impl RelationStore {
    /// Create a new relation store
    ///
    /// The term repository is only read, to check that endpoints exist.
    pub fn new(relations: Arc<dyn RelationRepository>, terms: Arc<dyn TermRepository>) -> Self {
        Self { relations, terms }
    }

    /// Every relation; no filtering or paging
    pub async fn list_all(&self) -> GlossaryResult<Vec<Relation>> {
        self.relations.list_all().await
    }

    pub async fn get(&self, id: RelationId) -> GlossaryResult<Relation> {
        self.relations
            .find_by_id(id)
            .await?
            .ok_or_else(|| GlossaryError::not_found(format!("Relation {}", id)))
    }

    /// Create a relation between two existing terms
    pub async fn create(&self, input: RelationCreateInput) -> GlossaryResult<Relation> {
        self.ensure_terms_exist(&[input.source_id, input.target_id]).await?;

        let relation = self.relations.insert(&input).await?;
        info!(
            relation_id = %relation.id,
            source_id = %relation.source_id,
            target_id = %relation.target_id,
            relation_type = %relation.relation_type,
            "Relation created"
        );
        Ok(relation)
    }

    /// Apply a partial update to a relation
    pub async fn update(&self, id: RelationId, input: RelationUpdateInput) -> GlossaryResult<Relation> {
        // Missing relation wins over bad endpoints
        self.get(id).await?;
        self.ensure_terms_exist(&input.endpoints()).await?;

        let relation = self
            .relations
            .update(id, &input)
            .await?
            .ok_or_else(|| GlossaryError::not_found(format!("Relation {}", id)))?;
        info!(relation_id = %id, "Relation updated");
        Ok(relation)
    }

    pub async fn delete(&self, id: RelationId) -> GlossaryResult<()> {
        if !self.relations.delete(id).await? {
            return Err(GlossaryError::not_found(format!("Relation {}", id)));
        }
        info!(relation_id = %id, "Relation deleted");
        Ok(())
    }

    async fn ensure_terms_exist(&self, ids: &[TermId]) -> GlossaryResult<()> {
        for id in ids {
            if self.terms.find_by_id(*id).await?.is_none() {
                return Err(GlossaryError::validation(format!(
                    "referenced term {} does not exist",
                    id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::mocks::{MockRelationRepo, MockTermRepo};
    use crate::domain::relation::RelationType;
    use crate::domain::term::{Term, TermCreateInput};
    use chrono::Utc;

    fn term(id: i64) -> Term {
        let input = TermCreateInput {
            term: format!("term-{}", id),
            definition: "d".to_string(),
            ..Default::default()
        };
        Term::from_input(TermId(id), &input, Utc::now())
    }

    fn terms_with(ids: &'static [i64]) -> MockTermRepo {
        let mut terms = MockTermRepo::new();
        terms
            .expect_find_by_id()
            .returning(move |id| Ok(ids.contains(&id.0).then(|| term(id.0))));
        terms
    }

    #[tokio::test]
    async fn create_checks_both_endpoints_before_insert() {
        // Relation repository has no expectations: insert must not be called
        let store = RelationStore::new(Arc::new(MockRelationRepo::new()), Arc::new(terms_with(&[1])));
        let input = RelationCreateInput::parse(1, 99, "is-a").unwrap();

        let err = store.create(input).await.unwrap_err();
        assert!(matches!(err, GlossaryError::ValidationError(msg) if msg.contains("99")));
    }

    #[tokio::test]
    async fn create_allows_self_loops() {
        let mut relations = MockRelationRepo::new();
        relations.expect_insert().times(1).returning(|input| {
            Ok(Relation {
                id: RelationId(5),
                source_id: input.source_id,
                target_id: input.target_id,
                relation_type: input.relation_type,
            })
        });
        let store = RelationStore::new(Arc::new(relations), Arc::new(terms_with(&[1])));

        let relation = store
            .create(RelationCreateInput::parse(1, 1, "synonym-of").unwrap())
            .await
            .unwrap();
        assert_eq!(relation.source_id, relation.target_id);
        assert_eq!(relation.relation_type, RelationType::SynonymOf);
    }

    #[tokio::test]
    async fn update_of_missing_relation_is_not_found() {
        let mut relations = MockRelationRepo::new();
        relations.expect_find_by_id().returning(|_| Ok(None));
        let store = RelationStore::new(Arc::new(relations), Arc::new(MockTermRepo::new()));

        let err = store
            .update(RelationId(8), RelationUpdateInput::default())
            .await
            .unwrap_err();
        assert_eq!(err, GlossaryError::NotFound("Relation 8".to_string()));
    }

    #[tokio::test]
    async fn delete_missing_relation_is_not_found() {
        let mut relations = MockRelationRepo::new();
        relations.expect_delete().returning(|_| Ok(false));
        let store = RelationStore::new(Arc::new(relations), Arc::new(MockTermRepo::new()));

        assert!(matches!(
            store.delete(RelationId(1)).await,
            Err(GlossaryError::NotFound(_))
        ));
    }
}
