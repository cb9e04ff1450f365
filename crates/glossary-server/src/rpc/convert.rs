//! Conversions between protobuf messages and the contract types
//!
//! Requests follow proto3 conventions: scalars default to their zero value,
//! so an empty string or year 0 means "not set". In update requests only
//! fields that are present change the record.

use glossary_core::{
    GlossaryError, GraphSnapshot, Patch, Relation, RelationCreateInput, RelationId, RelationUpdateInput,
    SourceInfo, Term, TermCreateInput, TermId, TermQuery, TermUpdateInput, DEFAULT_LIST_LIMIT,
};

use super::proto;
use crate::contract::Operation;

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

impl From<proto::SourceInfo> for SourceInfo {
    fn from(message: proto::SourceInfo) -> Self {
        SourceInfo {
            title: non_empty(message.title),
            authors: non_empty(message.authors),
            year: (message.year != 0).then_some(message.year),
            link: non_empty(message.link),
        }
    }
}

impl From<SourceInfo> for proto::SourceInfo {
    fn from(source: SourceInfo) -> Self {
        proto::SourceInfo {
            title: source.title.unwrap_or_default(),
            authors: source.authors.unwrap_or_default(),
            year: source.year.unwrap_or_default(),
            link: source.link.unwrap_or_default(),
        }
    }
}

impl From<Term> for proto::Term {
    fn from(term: Term) -> Self {
        proto::Term {
            id: term.id.0,
            term: term.term,
            definition: term.definition,
            synonyms: term.synonyms,
            tags: term.tags,
            source: Some(term.source.into()),
            created_at: term.created_at.to_rfc3339(),
            updated_at: term.updated_at.to_rfc3339(),
        }
    }
}

impl From<Relation> for proto::Relation {
    fn from(relation: Relation) -> Self {
        proto::Relation {
            id: relation.id.0,
            source_id: relation.source_id.0,
            target_id: relation.target_id.0,
            r#type: relation.relation_type.to_string(),
        }
    }
}

impl From<GraphSnapshot> for proto::Graph {
    fn from(snapshot: GraphSnapshot) -> Self {
        proto::Graph {
            nodes: snapshot.nodes.into_iter().map(proto::Term::from).collect(),
            edges: snapshot.edges.into_iter().map(proto::Relation::from).collect(),
        }
    }
}

impl From<proto::ListTermsRequest> for Operation {
    fn from(request: proto::ListTermsRequest) -> Self {
        Operation::ListTerms(TermQuery {
            query: non_empty(request.query),
            limit: if request.limit == 0 { DEFAULT_LIST_LIMIT } else { request.limit },
            offset: request.offset,
        })
    }
}

impl From<proto::GetTermRequest> for Operation {
    fn from(request: proto::GetTermRequest) -> Self {
        Operation::GetTerm(TermId(request.id))
    }
}

impl From<proto::TermByKeywordRequest> for Operation {
    fn from(request: proto::TermByKeywordRequest) -> Self {
        Operation::GetTermByKeyword(request.keyword)
    }
}

impl From<proto::CreateTermRequest> for Operation {
    fn from(request: proto::CreateTermRequest) -> Self {
        Operation::CreateTerm(TermCreateInput {
            term: request.term,
            definition: request.definition,
            synonyms: request.synonyms,
            tags: request.tags,
            source: request.source.map(SourceInfo::from),
        })
    }
}

impl From<proto::UpdateTermRequest> for Operation {
    fn from(request: proto::UpdateTermRequest) -> Self {
        let input = TermUpdateInput {
            term: Patch::from(request.term),
            definition: Patch::from(request.definition),
            synonyms: Patch::from(request.synonyms.map(|list| list.values)),
            tags: Patch::from(request.tags.map(|list| list.values)),
            source: Patch::from(request.source.map(SourceInfo::from)),
        };
        Operation::UpdateTerm(TermId(request.id), input)
    }
}

impl From<proto::DeleteTermRequest> for Operation {
    fn from(request: proto::DeleteTermRequest) -> Self {
        Operation::DeleteTerm(TermId(request.id))
    }
}

impl TryFrom<proto::CreateRelationRequest> for Operation {
    type Error = GlossaryError;

    fn try_from(request: proto::CreateRelationRequest) -> Result<Self, Self::Error> {
        RelationCreateInput::parse(request.source_id, request.target_id, &request.r#type).map(Operation::CreateRelation)
    }
}

impl From<proto::GetRelationRequest> for Operation {
    fn from(request: proto::GetRelationRequest) -> Self {
        Operation::GetRelation(RelationId(request.id))
    }
}

impl TryFrom<proto::UpdateRelationRequest> for Operation {
    type Error = GlossaryError;

    fn try_from(request: proto::UpdateRelationRequest) -> Result<Self, Self::Error> {
        let input = RelationUpdateInput::parse(request.source_id, request.target_id, request.r#type.as_deref())?;
        Ok(Operation::UpdateRelation(RelationId(request.id), input))
    }
}

impl From<proto::DeleteRelationRequest> for Operation {
    fn from(request: proto::DeleteRelationRequest) -> Self {
        Operation::DeleteRelation(RelationId(request.id))
    }
}
