//! Term records and the inputs that create, change and search them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::patch::Patch;
use crate::error::{GlossaryError, GlossaryResult};

/// Maximum length of a term key, in characters
pub const MAX_TERM_LENGTH: usize = 255;
/// Maximum length of a source title or author list
pub const MAX_SOURCE_TEXT_LENGTH: usize = 512;
/// Maximum length of a source link
pub const MAX_SOURCE_LINK_LENGTH: usize = 1024;
/// Page size used when a listing does not name one
pub const DEFAULT_LIST_LIMIT: u32 = 100;
/// Largest page a single listing may request
///
/// Listings outside `1..=MAX_LIST_LIMIT` are rejected as invalid input rather
/// than clamped, so a caller never silently gets a different page than it
/// asked for. The graph export reads every term and is not bound by it.
pub const MAX_LIST_LIMIT: u32 = 10_000;

/// Server-assigned term identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub i64);

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bibliographic attribution; every attribute is independently optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub year: Option<i32>,
    pub link: Option<String>,
}

impl SourceInfo {
    /// True when no attribute is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.authors.is_none() && self.year.is_none() && self.link.is_none()
    }

    fn validate(&self) -> GlossaryResult<()> {
        check_max_len("source.title", self.title.as_deref(), MAX_SOURCE_TEXT_LENGTH)?;
        check_max_len("source.authors", self.authors.as_deref(), MAX_SOURCE_TEXT_LENGTH)?;
        check_max_len("source.link", self.link.as_deref(), MAX_SOURCE_LINK_LENGTH)
    }
}

/// A defined glossary term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub term: String,
    pub definition: String,
    pub synonyms: Vec<String>,
    pub tags: Vec<String>,
    pub source: SourceInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Term {
    /// Build a freshly created term
    pub fn from_input(id: TermId, input: &TermCreateInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            term: input.term.clone(),
            definition: input.definition.clone(),
            synonyms: input.synonyms.clone(),
            tags: input.tags.clone(),
            source: input.source.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive comparison of the term key
    pub fn key_matches(&self, keyword: &str) -> bool {
        self.term.to_lowercase() == keyword.to_lowercase()
    }

    /// Keyword search over term, definition, synonyms and tags
    ///
    /// Synonyms and tags are matched in their flattened, comma-joined form.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [
            self.term.to_lowercase(),
            self.definition.to_lowercase(),
            flatten(&self.synonyms).to_lowercase(),
            flatten(&self.tags).to_lowercase(),
        ]
        .iter()
        .any(|haystack| haystack.contains(&needle))
    }
}

/// Flattened text form of an ordered string list
pub fn flatten(values: &[String]) -> String {
    values.join(",")
}

/// Fields for creating a term
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermCreateInput {
    pub term: String,
    pub definition: String,
    pub synonyms: Vec<String>,
    pub tags: Vec<String>,
    pub source: Option<SourceInfo>,
}

impl TermCreateInput {
    /// Check field constraints before the input reaches a repository
    pub fn validate(&self) -> GlossaryResult<()> {
        validate_term_key(&self.term)?;
        validate_definition(&self.definition)?;
        if let Some(source) = &self.source {
            source.validate()?;
        }
        Ok(())
    }
}

/// Partial update of a term; only `Set` fields change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermUpdateInput {
    pub term: Patch<String>,
    pub definition: Patch<String>,
    pub synonyms: Patch<Vec<String>>,
    pub tags: Patch<Vec<String>>,
    /// Replaces all four source attributes together
    pub source: Patch<SourceInfo>,
}

impl TermUpdateInput {
    /// Check the provided fields
    pub fn validate(&self) -> GlossaryResult<()> {
        if let Patch::Set(term) = &self.term {
            validate_term_key(term)?;
        }
        if let Patch::Set(definition) = &self.definition {
            validate_definition(definition)?;
        }
        if let Patch::Set(source) = &self.source {
            source.validate()?;
        }
        Ok(())
    }

    /// Apply the provided fields to `term` and refresh `updated_at`
    pub fn apply_to(&self, term: &mut Term, now: DateTime<Utc>) {
        self.term.clone().apply_to(&mut term.term);
        self.definition.clone().apply_to(&mut term.definition);
        self.synonyms.clone().apply_to(&mut term.synonyms);
        self.tags.clone().apply_to(&mut term.tags);
        self.source.clone().apply_to(&mut term.source);
        term.updated_at = now;
    }
}

/// Search and paging parameters for listing terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermQuery {
    pub query: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for TermQuery {
    fn default() -> Self {
        Self {
            query: None,
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

impl TermQuery {
    /// Query with an optional search string and the default page
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Every term up to `limit`
    pub fn all(limit: u32) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// Search string with empty input treated as "no filter"
    pub fn filter(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    pub fn validate(&self) -> GlossaryResult<()> {
        if self.limit == 0 || self.limit > MAX_LIST_LIMIT {
            return Err(GlossaryError::validation(format!(
                "limit must be between 1 and {}",
                MAX_LIST_LIMIT
            )));
        }
        Ok(())
    }
}

fn validate_term_key(term: &str) -> GlossaryResult<()> {
    if term.trim().is_empty() {
        return Err(GlossaryError::validation("term must not be empty"));
    }
    check_max_len("term", Some(term), MAX_TERM_LENGTH)
}

fn validate_definition(definition: &str) -> GlossaryResult<()> {
    if definition.trim().is_empty() {
        return Err(GlossaryError::validation("definition must not be empty"));
    }
    Ok(())
}

fn check_max_len(field: &str, value: Option<&str>, max: usize) -> GlossaryResult<()> {
    match value {
        Some(value) if value.chars().count() > max => Err(GlossaryError::validation(format!(
            "{} must be at most {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample(now: DateTime<Utc>) -> Term {
        let input = TermCreateInput {
            term: "Bluebird".to_string(),
            definition: "a songbird".to_string(),
            synonyms: vec!["blue robin".to_string()],
            tags: vec!["birds".to_string(), "fauna".to_string()],
            source: Some(SourceInfo {
                title: Some("Field Guide".to_string()),
                authors: Some("Audubon".to_string()),
                year: Some(1840),
                link: None,
            }),
        };
        Term::from_input(TermId(1), &input, now)
    }

    #[test]
    fn create_input_requires_term_and_definition() {
        let mut input = TermCreateInput {
            term: "Cat".to_string(),
            definition: "a feline".to_string(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        input.definition = "   ".to_string();
        assert!(matches!(input.validate(), Err(GlossaryError::ValidationError(_))));

        input.definition = "a feline".to_string();
        input.term = String::new();
        assert!(matches!(input.validate(), Err(GlossaryError::ValidationError(_))));

        input.term = "x".repeat(MAX_TERM_LENGTH + 1);
        assert!(matches!(input.validate(), Err(GlossaryError::ValidationError(_))));
    }

    #[test]
    fn source_link_length_is_bounded() {
        let input = TermUpdateInput {
            source: Patch::Set(SourceInfo {
                link: Some("h".repeat(MAX_SOURCE_LINK_LENGTH + 1)),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn definition_only_update_keeps_other_fields() {
        let created = Utc::now();
        let mut term = sample(created);
        let before = term.clone();
        let later = created + chrono::Duration::seconds(5);

        let update = TermUpdateInput {
            definition: Patch::Set("a small thrush".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut term, later);

        assert_eq!(term.definition, "a small thrush");
        assert_eq!(term.term, before.term);
        assert_eq!(term.synonyms, before.synonyms);
        assert_eq!(term.tags, before.tags);
        assert_eq!(term.source, before.source);
        assert_eq!(term.created_at, created);
        assert_eq!(term.updated_at, later);
    }

    #[test]
    fn source_update_replaces_whole_block() {
        let now = Utc::now();
        let mut term = sample(now);
        let update = TermUpdateInput {
            source: Patch::Set(SourceInfo {
                year: Some(2001),
                ..Default::default()
            }),
            ..Default::default()
        };
        update.apply_to(&mut term, now);

        assert_eq!(
            term.source,
            SourceInfo {
                title: None,
                authors: None,
                year: Some(2001),
                link: None,
            }
        );
    }

    #[test]
    fn query_matches_any_field_case_insensitively() {
        let term = sample(Utc::now());
        assert!(term.matches_query("BLUE"));
        assert!(term.matches_query("songbird"));
        assert!(term.matches_query("robin"));
        assert!(term.matches_query("birds,fauna"));
        assert!(!term.matches_query("feline"));
    }

    #[test]
    fn key_match_ignores_case() {
        let term = sample(Utc::now());
        assert!(term.key_matches("bluebird"));
        assert!(term.key_matches("BLUEBIRD"));
        assert!(!term.key_matches("blue"));
    }

    #[test]
    fn query_limits() {
        assert!(TermQuery::default().validate().is_ok());
        assert!(TermQuery::all(MAX_LIST_LIMIT).validate().is_ok());
        assert!(TermQuery::all(0).validate().is_err());
        assert!(TermQuery::all(MAX_LIST_LIMIT + 1).validate().is_err());
        assert_eq!(TermQuery::search("").filter(), None);
        assert_eq!(TermQuery::search("bird").filter(), Some("bird"));
    }
}
