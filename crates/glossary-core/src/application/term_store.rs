use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::repository::TermRepository;
use crate::domain::term::{Term, TermCreateInput, TermId, TermQuery, TermUpdateInput};
use crate::error::{GlossaryError, GlossaryResult};

/// Term Store - lookup, search and lifecycle of term records
#[derive(Clone)]
pub struct TermStore {
    repo: Arc<dyn TermRepository>,
}

impl TermStore {
    /// Create a new term store over a repository
    pub fn new(repo: Arc<dyn TermRepository>) -> Self {
        Self { repo }
    }

    /// List terms ordered by key, optionally filtered by a search string
    pub async fn list(&self, query: &TermQuery) -> GlossaryResult<Vec<Term>> {
        query.validate()?;
        let terms = self.repo.list(query).await?;
        debug!(
            query = query.filter().unwrap_or_default(),
            limit = query.limit,
            offset = query.offset,
            count = terms.len(),
            "Listed terms"
        );
        Ok(terms)
    }

    pub async fn get_by_id(&self, id: TermId) -> GlossaryResult<Term> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| GlossaryError::not_found(format!("Term {}", id)))
    }

    /// Case-insensitive exact lookup on the term key
    pub async fn get_by_keyword(&self, keyword: &str) -> GlossaryResult<Term> {
        self.repo
            .find_by_keyword(keyword)
            .await?
            .ok_or_else(|| GlossaryError::not_found(format!("Term '{}'", keyword)))
    }

    /// Create a term and return it as committed
    pub async fn create(&self, input: TermCreateInput) -> GlossaryResult<Term> {
        input.validate()?;
        let created = self.repo.insert(&input, Utc::now()).await?;

        info!(term_id = %created.id, term = %created.term, "Term created");

        // Re-read so the caller sees committed state
        self.get_by_keyword(&created.term).await
    }

    /// Apply a partial update and return the term as committed
    pub async fn update(&self, id: TermId, input: TermUpdateInput) -> GlossaryResult<Term> {
        input.validate()?;
        let updated = self
            .repo
            .update(id, &input, Utc::now())
            .await?
            .ok_or_else(|| GlossaryError::not_found(format!("Term {}", id)))?;

        info!(term_id = %id, "Term updated");

        self.get_by_keyword(&updated.term).await
    }

    /// Delete a term together with every relation that references it
    pub async fn delete(&self, id: TermId) -> GlossaryResult<()> {
        if !self.repo.delete(id).await? {
            return Err(GlossaryError::not_found(format!("Term {}", id)));
        }
        info!(term_id = %id, "Term deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::mocks::MockTermRepo;
    use crate::domain::patch::Patch;
    use mockall::predicate::eq;

    fn cat_input() -> TermCreateInput {
        TermCreateInput {
            term: "Cat".to_string(),
            definition: "a feline".to_string(),
            tags: vec!["bird-watching".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_refetches_by_keyword() {
        let mut repo = MockTermRepo::new();
        repo.expect_insert()
            .times(1)
            .returning(|input, now| Ok(Term::from_input(TermId(1), input, now)));
        repo.expect_find_by_keyword()
            .with(eq("Cat"))
            .times(1)
            .returning(|_| {
                Ok(Some(Term::from_input(TermId(1), &cat_input(), Utc::now())))
            });

        let store = TermStore::new(Arc::new(repo));
        let term = store.create(cat_input()).await.unwrap();
        assert_eq!(term.id, TermId(1));
        assert_eq!(term.tags, vec!["bird-watching".to_string()]);
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_repository() {
        // No expectations: any repository call panics
        let store = TermStore::new(Arc::new(MockTermRepo::new()));
        let input = TermCreateInput {
            term: "Cat".to_string(),
            definition: String::new(),
            ..Default::default()
        };
        let err = store.create(input).await.unwrap_err();
        assert!(matches!(err, GlossaryError::ValidationError(_)));
    }

    #[tokio::test]
    async fn conflict_is_passed_through() {
        let mut repo = MockTermRepo::new();
        repo.expect_insert()
            .returning(|_, _| Err(GlossaryError::Conflict("term 'Cat' already exists".into())));

        let store = TermStore::new(Arc::new(repo));
        let err = store.create(cat_input()).await.unwrap_err();
        assert!(matches!(err, GlossaryError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_of_missing_term_is_not_found() {
        let mut repo = MockTermRepo::new();
        repo.expect_update().returning(|_, _, _| Ok(None));

        let store = TermStore::new(Arc::new(repo));
        let input = TermUpdateInput {
            definition: Patch::Set("new".to_string()),
            ..Default::default()
        };
        let err = store.update(TermId(42), input).await.unwrap_err();
        assert_eq!(err, GlossaryError::NotFound("Term 42".to_string()));
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let mut repo = MockTermRepo::new();
        let mut calls = 0;
        repo.expect_delete().times(2).returning(move |_| {
            calls += 1;
            Ok(calls == 1)
        });

        let store = TermStore::new(Arc::new(repo));
        assert!(store.delete(TermId(2)).await.is_ok());
        assert!(matches!(
            store.delete(TermId(2)).await,
            Err(GlossaryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn out_of_range_limit_is_rejected() {
        let store = TermStore::new(Arc::new(MockTermRepo::new()));
        let err = store.list(&TermQuery::all(0)).await.unwrap_err();
        assert!(matches!(err, GlossaryError::ValidationError(_)));
    }
}
