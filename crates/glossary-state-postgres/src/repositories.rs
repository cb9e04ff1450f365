use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;
use tracing::{debug, error};

use glossary_core::{
    domain::relation::{Relation, RelationCreateInput, RelationId, RelationType, RelationUpdateInput},
    domain::repository::{RelationRepository, TermRepository},
    domain::term::{SourceInfo, Term, TermCreateInput, TermId, TermQuery, TermUpdateInput},
    GlossaryError,
};

use crate::PostgresConnection;

const TERM_COLUMNS: &str = "id, term, definition, synonyms, tags, source_title, source_authors, \
     source_year, source_link, created_at, updated_at";

const RELATION_COLUMNS: &str = "id, source_id, target_id, type";

/// Translate a database failure into the glossary taxonomy
fn map_db_error(err: sqlx::Error, context: &str) -> GlossaryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return GlossaryError::Conflict(format!("{}: term already exists", context));
        }
        if db_err.is_foreign_key_violation() {
            return GlossaryError::validation(format!("{}: referenced term does not exist", context));
        }
        if db_err.is_check_violation() {
            return GlossaryError::validation(format!("{}: {}", context, db_err.message()));
        }
    }
    error!(error = %err, "{}", context);
    GlossaryError::StateStoreError(format!("{}: {}", context, err))
}

fn term_from_row(row: &PgRow) -> Result<Term, sqlx::Error> {
    Ok(Term {
        id: TermId(row.try_get("id")?),
        term: row.try_get("term")?,
        definition: row.try_get("definition")?,
        synonyms: row.try_get("synonyms")?,
        tags: row.try_get("tags")?,
        source: SourceInfo {
            title: row.try_get("source_title")?,
            authors: row.try_get("source_authors")?,
            year: row.try_get("source_year")?,
            link: row.try_get("source_link")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn relation_from_row(row: &PgRow) -> Result<Relation, GlossaryError> {
    let read = |e: sqlx::Error| map_db_error(e, "Failed to read relation");
    let raw_type: String = row.try_get("type").map_err(read)?;
    let relation_type = raw_type.parse::<RelationType>().map_err(|_| {
        GlossaryError::StateStoreError(format!("Stored relation has unknown type '{}'", raw_type))
    })?;

    Ok(Relation {
        id: RelationId(row.try_get("id").map_err(read)?),
        source_id: TermId(row.try_get("source_id").map_err(read)?),
        target_id: TermId(row.try_get("target_id").map_err(read)?),
        relation_type,
    })
}

/// Postgres implementation of the TermRepository
#[derive(Clone)]
pub struct PostgresTermRepository {
    conn: PostgresConnection,
}

impl PostgresTermRepository {
    /// Create a new Postgres term repository
    pub fn new(conn: PostgresConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl TermRepository for PostgresTermRepository {
    async fn list(&self, query: &TermQuery) -> Result<Vec<Term>, GlossaryError> {
        let sql = format!(
            "SELECT {} FROM terms
             WHERE $1::text IS NULL
                OR strpos(lower(term), lower($1)) > 0
                OR strpos(lower(definition), lower($1)) > 0
                OR strpos(lower(array_to_string(synonyms, ',')), lower($1)) > 0
                OR strpos(lower(array_to_string(tags, ',')), lower($1)) > 0
             ORDER BY lower(term), term
             LIMIT $2 OFFSET $3",
            TERM_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(query.filter())
            .bind(i64::from(query.limit))
            .bind(i64::from(query.offset))
            .fetch_all(self.conn.pool())
            .await
            .map_err(|e| map_db_error(e, "Failed to list terms"))?;

        rows.iter()
            .map(|row| term_from_row(row).map_err(|e| map_db_error(e, "Failed to read term")))
            .collect()
    }

    async fn find_by_id(&self, id: TermId) -> Result<Option<Term>, GlossaryError> {
        let sql = format!("SELECT {} FROM terms WHERE id = $1", TERM_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.conn.pool())
            .await
            .map_err(|e| map_db_error(e, "Failed to load term"))?;

        row.as_ref()
            .map(term_from_row)
            .transpose()
            .map_err(|e| map_db_error(e, "Failed to read term"))
    }

    async fn find_by_keyword(&self, keyword: &str) -> Result<Option<Term>, GlossaryError> {
        let sql = format!("SELECT {} FROM terms WHERE lower(term) = lower($1)", TERM_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(keyword)
            .fetch_optional(self.conn.pool())
            .await
            .map_err(|e| map_db_error(e, "Failed to load term"))?;

        row.as_ref()
            .map(term_from_row)
            .transpose()
            .map_err(|e| map_db_error(e, "Failed to read term"))
    }

    async fn insert(&self, input: &TermCreateInput, now: DateTime<Utc>) -> Result<Term, GlossaryError> {
        let source = input.source.clone().unwrap_or_default();
        let sql = format!(
            "INSERT INTO terms (term, definition, synonyms, tags, source_title, source_authors,
                                source_year, source_link, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
             RETURNING {}",
            TERM_COLUMNS
        );

        // Uniqueness is left to the lower(term) index; no pre-check
        let row = sqlx::query(&sql)
            .bind(&input.term)
            .bind(&input.definition)
            .bind(&input.synonyms)
            .bind(&input.tags)
            .bind(&source.title)
            .bind(&source.authors)
            .bind(source.year)
            .bind(&source.link)
            .bind(now)
            .fetch_one(self.conn.pool())
            .await
            .map_err(|e| map_db_error(e, &format!("Failed to create term '{}'", input.term)))?;

        term_from_row(&row).map_err(|e| map_db_error(e, "Failed to read term"))
    }

    async fn update(
        &self,
        id: TermId,
        input: &TermUpdateInput,
        now: DateTime<Utc>,
    ) -> Result<Option<Term>, GlossaryError> {
        let mut tx = self
            .conn
            .pool()
            .begin()
            .await
            .map_err(|e| map_db_error(e, "Failed to begin transaction"))?;

        let select = format!("SELECT {} FROM terms WHERE id = $1 FOR UPDATE", TERM_COLUMNS);
        let Some(row) = sqlx::query(&select)
            .bind(id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "Failed to load term"))?
        else {
            return Ok(None);
        };
        let mut term = term_from_row(&row).map_err(|e| map_db_error(e, "Failed to read term"))?;
        input.apply_to(&mut term, now);

        let update = format!(
            "UPDATE terms
             SET term = $2, definition = $3, synonyms = $4, tags = $5, source_title = $6,
                 source_authors = $7, source_year = $8, source_link = $9, updated_at = $10
             WHERE id = $1
             RETURNING {}",
            TERM_COLUMNS
        );
        let row = sqlx::query(&update)
            .bind(id.0)
            .bind(&term.term)
            .bind(&term.definition)
            .bind(&term.synonyms)
            .bind(&term.tags)
            .bind(&term.source.title)
            .bind(&term.source.authors)
            .bind(term.source.year)
            .bind(&term.source.link)
            .bind(term.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, &format!("Failed to update term {}", id)))?;
        let updated = term_from_row(&row).map_err(|e| map_db_error(e, "Failed to read term"))?;

        tx.commit()
            .await
            .map_err(|e| map_db_error(e, "Failed to commit term update"))?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: TermId) -> Result<bool, GlossaryError> {
        let mut tx = self
            .conn
            .pool()
            .begin()
            .await
            .map_err(|e| map_db_error(e, "Failed to begin transaction"))?;

        let relations = sqlx::query("DELETE FROM relations WHERE source_id = $1 OR target_id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "Failed to delete relations"))?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM terms WHERE id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, &format!("Failed to delete term {}", id)))?
            .rows_affected();

        if deleted == 0 {
            // Nothing to cascade from; dropping the transaction rolls back
            return Ok(false);
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error(e, "Failed to commit term delete"))?;
        debug!(term_id = %id, removed_relations = relations, "Cascaded term delete");
        Ok(true)
    }
}

/// Postgres implementation of the RelationRepository
#[derive(Clone)]
pub struct PostgresRelationRepository {
    conn: PostgresConnection,
}

impl PostgresRelationRepository {
    /// Create a new Postgres relation repository
    pub fn new(conn: PostgresConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl RelationRepository for PostgresRelationRepository {
    async fn list_all(&self) -> Result<Vec<Relation>, GlossaryError> {
        let sql = format!("SELECT {} FROM relations ORDER BY id", RELATION_COLUMNS);
        let rows = sqlx::query(&sql)
            .fetch_all(self.conn.pool())
            .await
            .map_err(|e| map_db_error(e, "Failed to list relations"))?;

        rows.iter().map(relation_from_row).collect()
    }

    async fn find_by_id(&self, id: RelationId) -> Result<Option<Relation>, GlossaryError> {
        let sql = format!("SELECT {} FROM relations WHERE id = $1", RELATION_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.conn.pool())
            .await
            .map_err(|e| map_db_error(e, "Failed to load relation"))?;

        row.as_ref().map(relation_from_row).transpose()
    }

    async fn insert(&self, input: &RelationCreateInput) -> Result<Relation, GlossaryError> {
        let sql = format!(
            "INSERT INTO relations (source_id, target_id, type) VALUES ($1, $2, $3) RETURNING {}",
            RELATION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(input.source_id.0)
            .bind(input.target_id.0)
            .bind(input.relation_type.as_str())
            .fetch_one(self.conn.pool())
            .await
            .map_err(|e| map_db_error(e, "Failed to create relation"))?;

        relation_from_row(&row)
    }

    async fn update(
        &self,
        id: RelationId,
        input: &RelationUpdateInput,
    ) -> Result<Option<Relation>, GlossaryError> {
        let mut tx = self
            .conn
            .pool()
            .begin()
            .await
            .map_err(|e| map_db_error(e, "Failed to begin transaction"))?;

        let select = format!("SELECT {} FROM relations WHERE id = $1 FOR UPDATE", RELATION_COLUMNS);
        let Some(row) = sqlx::query(&select)
            .bind(id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "Failed to load relation"))?
        else {
            return Ok(None);
        };
        let mut relation = relation_from_row(&row)?;
        input.apply_to(&mut relation);

        let update = format!(
            "UPDATE relations SET source_id = $2, target_id = $3, type = $4 WHERE id = $1 RETURNING {}",
            RELATION_COLUMNS
        );
        let row = sqlx::query(&update)
            .bind(id.0)
            .bind(relation.source_id.0)
            .bind(relation.target_id.0)
            .bind(relation.relation_type.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, &format!("Failed to update relation {}", id)))?;
        let updated = relation_from_row(&row)?;

        tx.commit()
            .await
            .map_err(|e| map_db_error(e, "Failed to commit relation update"))?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: RelationId) -> Result<bool, GlossaryError> {
        let deleted = sqlx::query("DELETE FROM relations WHERE id = $1")
            .bind(id.0)
            .execute(self.conn.pool())
            .await
            .map_err(|e| map_db_error(e, &format!("Failed to delete relation {}", id)))?
            .rows_affected();
        Ok(deleted > 0)
    }
}
