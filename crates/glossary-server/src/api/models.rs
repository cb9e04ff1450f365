//! REST request and response bodies
//!
//! Optional fields follow the nullability convention: a missing key and an
//! explicit `null` both mean "not provided".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use glossary_core::{
    Patch, Relation, RelationCreateInput, RelationUpdateInput, SourceInfo, Term, TermCreateInput,
    TermQuery, TermUpdateInput, DEFAULT_LIST_LIMIT,
};
use glossary_core::{GlossaryError, GraphSnapshot};

/// Bibliographic source block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub link: Option<String>,
}

impl From<SourceBody> for SourceInfo {
    fn from(body: SourceBody) -> Self {
        SourceInfo {
            title: body.title,
            authors: body.authors,
            year: body.year,
            link: body.link,
        }
    }
}

impl From<SourceInfo> for SourceBody {
    fn from(source: SourceInfo) -> Self {
        SourceBody {
            title: source.title,
            authors: source.authors,
            year: source.year,
            link: source.link,
        }
    }
}

/// `GET /api/terms` query string
#[derive(Debug, Default, Deserialize)]
pub struct TermsParams {
    pub query: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<TermsParams> for TermQuery {
    fn from(params: TermsParams) -> Self {
        TermQuery {
            query: params.query,
            limit: params.limit.unwrap_or(DEFAULT_LIST_LIMIT),
            offset: params.offset.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TermCreateBody {
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub synonyms: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<SourceBody>,
}

impl From<TermCreateBody> for TermCreateInput {
    fn from(body: TermCreateBody) -> Self {
        TermCreateInput {
            term: body.term,
            definition: body.definition,
            synonyms: body.synonyms.unwrap_or_default(),
            tags: body.tags.unwrap_or_default(),
            source: body.source.map(SourceInfo::from),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TermUpdateBody {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub synonyms: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<SourceBody>,
}

impl From<TermUpdateBody> for TermUpdateInput {
    fn from(body: TermUpdateBody) -> Self {
        TermUpdateInput {
            term: Patch::from(body.term),
            definition: Patch::from(body.definition),
            synonyms: Patch::from(body.synonyms),
            tags: Patch::from(body.tags),
            source: Patch::from(body.source).map(SourceInfo::from),
        }
    }
}

/// Term as returned by every REST route
///
/// Empty synonym or tag lists render as `null`; `source` is always an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermBody {
    pub id: i64,
    pub term: String,
    pub definition: String,
    pub synonyms: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub source: SourceBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}

impl From<Term> for TermBody {
    fn from(term: Term) -> Self {
        TermBody {
            id: term.id.0,
            term: term.term,
            definition: term.definition,
            synonyms: non_empty(term.synonyms),
            tags: non_empty(term.tags),
            source: term.source.into(),
            created_at: term.created_at,
            updated_at: term.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RelationCreateBody {
    pub source_id: i64,
    pub target_id: i64,
    #[serde(rename = "type")]
    pub relation_type: String,
}

impl TryFrom<RelationCreateBody> for RelationCreateInput {
    type Error = GlossaryError;

    fn try_from(body: RelationCreateBody) -> Result<Self, Self::Error> {
        RelationCreateInput::parse(body.source_id, body.target_id, &body.relation_type)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RelationUpdateBody {
    #[serde(default)]
    pub source_id: Option<i64>,
    #[serde(default)]
    pub target_id: Option<i64>,
    #[serde(default, rename = "type")]
    pub relation_type: Option<String>,
}

impl TryFrom<RelationUpdateBody> for RelationUpdateInput {
    type Error = GlossaryError;

    fn try_from(body: RelationUpdateBody) -> Result<Self, Self::Error> {
        RelationUpdateInput::parse(body.source_id, body.target_id, body.relation_type.as_deref())
    }
}

/// `GET /api/graph` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphBody {
    pub nodes: Vec<TermBody>,
    pub edges: Vec<Relation>,
}

impl From<GraphSnapshot> for GraphBody {
    fn from(snapshot: GraphSnapshot) -> Self {
        GraphBody {
            nodes: snapshot.nodes.into_iter().map(TermBody::from).collect(),
            edges: snapshot.edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_missing_both_mean_not_provided() {
        let explicit: TermUpdateBody =
            serde_json::from_value(json!({"definition": "new", "tags": null})).unwrap();
        let input = TermUpdateInput::from(explicit);
        assert_eq!(input.definition, Patch::Set("new".to_string()));
        assert_eq!(input.tags, Patch::Absent);
        assert_eq!(input.term, Patch::Absent);
        assert_eq!(input.source, Patch::Absent);
    }

    #[test]
    fn empty_list_in_update_clears() {
        let body: TermUpdateBody = serde_json::from_value(json!({"synonyms": []})).unwrap();
        assert_eq!(TermUpdateInput::from(body).synonyms, Patch::Set(Vec::new()));
    }

    #[test]
    fn empty_lists_render_as_null() {
        let now = Utc::now();
        let term = Term::from_input(
            glossary_core::TermId(4),
            &TermCreateInput {
                term: "Cat".to_string(),
                definition: "a feline".to_string(),
                tags: vec!["pets".to_string()],
                ..Default::default()
            },
            now,
        );
        let json = serde_json::to_value(TermBody::from(term)).unwrap();
        assert_eq!(json["synonyms"], serde_json::Value::Null);
        assert_eq!(json["tags"], json!(["pets"]));
        assert_eq!(
            json["source"],
            json!({"title": null, "authors": null, "year": null, "link": null})
        );
    }

    #[test]
    fn relation_type_is_checked_on_conversion() {
        let body: RelationCreateBody =
            serde_json::from_value(json!({"source_id": 1, "target_id": 2, "type": "invented-type"})).unwrap();
        assert!(RelationCreateInput::try_from(body).is_err());
    }
}
