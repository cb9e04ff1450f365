//! Protocol contract shared by the REST and gRPC front-ends
//!
//! A front-end decodes its wire request into an [`Operation`], hands it to
//! [`execute`], and encodes the result through its [`FrontEnd`]
//! implementation. Neither front-end talks to the stores directly, so the
//! two cannot disagree on filtering, partial updates or error kinds.

use glossary_core::{
    GlossaryError, GlossaryService, GraphSnapshot, Relation, RelationCreateInput, RelationId,
    RelationUpdateInput, Term, TermCreateInput, TermId, TermQuery, TermUpdateInput,
};
use tracing::{debug, error};

/// One logical glossary operation
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Health,
    ListTerms(TermQuery),
    GetTerm(TermId),
    GetTermByKeyword(String),
    CreateTerm(TermCreateInput),
    UpdateTerm(TermId, TermUpdateInput),
    DeleteTerm(TermId),
    CreateRelation(RelationCreateInput),
    GetRelation(RelationId),
    UpdateRelation(RelationId, RelationUpdateInput),
    DeleteRelation(RelationId),
    ListRelations,
    GetGraph,
}

impl Operation {
    /// Operation name, as used for gRPC methods and log fields
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Health => "Health",
            Operation::ListTerms(_) => "ListTerms",
            Operation::GetTerm(_) => "GetTerm",
            Operation::GetTermByKeyword(_) => "GetTermByKeyword",
            Operation::CreateTerm(_) => "CreateTerm",
            Operation::UpdateTerm(..) => "UpdateTerm",
            Operation::DeleteTerm(_) => "DeleteTerm",
            Operation::CreateRelation(_) => "CreateRelation",
            Operation::GetRelation(_) => "GetRelation",
            Operation::UpdateRelation(..) => "UpdateRelation",
            Operation::DeleteRelation(_) => "DeleteRelation",
            Operation::ListRelations => "ListRelations",
            Operation::GetGraph => "GetGraph",
        }
    }
}

/// Canonical result of an operation, before any wire encoding
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Health,
    Term(Term),
    TermCreated(Term),
    Terms(Vec<Term>),
    Relation(Relation),
    RelationCreated(Relation),
    Relations(Vec<Relation>),
    Graph(GraphSnapshot),
    Deleted,
}

/// Run an operation against the stores
pub async fn execute(service: &GlossaryService, operation: Operation) -> Result<Outcome, GlossaryError> {
    let name = operation.name();
    debug!(operation = name, "Executing operation");

    let result = match operation {
        Operation::Health => Ok(Outcome::Health),
        Operation::ListTerms(query) => service.terms().list(&query).await.map(Outcome::Terms),
        Operation::GetTerm(id) => service.terms().get_by_id(id).await.map(Outcome::Term),
        Operation::GetTermByKeyword(keyword) => service
            .terms()
            .get_by_keyword(&keyword)
            .await
            .map(Outcome::Term),
        Operation::CreateTerm(input) => service.terms().create(input).await.map(Outcome::TermCreated),
        Operation::UpdateTerm(id, input) => service.terms().update(id, input).await.map(Outcome::Term),
        Operation::DeleteTerm(id) => service.terms().delete(id).await.map(|_| Outcome::Deleted),
        Operation::CreateRelation(input) => service
            .relations()
            .create(input)
            .await
            .map(Outcome::RelationCreated),
        Operation::GetRelation(id) => service.relations().get(id).await.map(Outcome::Relation),
        Operation::UpdateRelation(id, input) => service
            .relations()
            .update(id, input)
            .await
            .map(Outcome::Relation),
        Operation::DeleteRelation(id) => service.relations().delete(id).await.map(|_| Outcome::Deleted),
        Operation::ListRelations => service.relations().list_all().await.map(Outcome::Relations),
        Operation::GetGraph => service.graph().snapshot().await.map(Outcome::Graph),
    };

    if let Err(err) = &result {
        match ErrorKind::of(err) {
            ErrorKind::Internal => error!(operation = name, error = %err, "Operation failed"),
            _ => debug!(operation = name, error = %err, "Operation rejected"),
        }
    }
    result
}

/// Protocol-independent failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Duplicate,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    pub fn of(err: &GlossaryError) -> Self {
        match err {
            GlossaryError::NotFound(_) => ErrorKind::NotFound,
            GlossaryError::ValidationError(_) => ErrorKind::InvalidInput,
            GlossaryError::Conflict(_) => ErrorKind::Duplicate,
            GlossaryError::Unauthorized(_) => ErrorKind::Unauthorized,
            GlossaryError::StateStoreError(_) | GlossaryError::ConfigurationError(_) => ErrorKind::Internal,
        }
    }
}

/// Wire encoding of outcomes and failures for one protocol
pub trait FrontEnd: Send + Sync + 'static {
    /// Encoded success
    type Success;
    /// Encoded failure
    type Failure;

    fn encode(outcome: Outcome) -> Self::Success;

    fn fail(kind: ErrorKind, err: &GlossaryError) -> Self::Failure;

    fn render(result: Result<Outcome, GlossaryError>) -> Result<Self::Success, Self::Failure> {
        result
            .map(Self::encode)
            .map_err(|err| Self::fail(ErrorKind::of(&err), &err))
    }
}
