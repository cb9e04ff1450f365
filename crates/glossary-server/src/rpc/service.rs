//! `glossary.GlossaryService` implementation

use std::sync::Arc;

use glossary_core::GlossaryError;
use tonic::{Request, Response, Status};
use tracing::error;

use super::proto::{self, glossary_service_server::GlossaryService};
use crate::contract::{execute, ErrorKind, FrontEnd, Operation, Outcome};
use crate::server::GlossaryServer;

/// Encoded success: one protobuf message per outcome shape
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Empty(proto::Empty),
    Term(proto::Term),
    Terms(proto::ListTermsResponse),
    Relation(proto::Relation),
    Relations(proto::ListRelationsResponse),
    Graph(proto::Graph),
}

// Each method names its response message; a reply of another shape is a bug.
macro_rules! reply_message {
    ($($variant:ident => $message:ty),* $(,)?) => {
        $(
            impl TryFrom<Reply> for $message {
                type Error = Status;

                fn try_from(reply: Reply) -> Result<Self, Status> {
                    match reply {
                        Reply::$variant(message) => Ok(message),
                        other => {
                            error!(reply = ?other, expected = stringify!($variant), "Mismatched gRPC reply");
                            Err(Status::internal("Internal error"))
                        }
                    }
                }
            }
        )*
    };
}

reply_message! {
    Empty => proto::Empty,
    Term => proto::Term,
    Terms => proto::ListTermsResponse,
    Relation => proto::Relation,
    Relations => proto::ListRelationsResponse,
    Graph => proto::Graph,
}

/// gRPC encoding of the protocol contract
pub struct RpcFrontEnd;

impl FrontEnd for RpcFrontEnd {
    type Success = Reply;
    type Failure = Status;

    fn encode(outcome: Outcome) -> Reply {
        match outcome {
            Outcome::Health | Outcome::Deleted => Reply::Empty(proto::Empty {}),
            Outcome::Term(term) | Outcome::TermCreated(term) => Reply::Term(term.into()),
            Outcome::Terms(terms) => Reply::Terms(proto::ListTermsResponse {
                items: terms.into_iter().map(proto::Term::from).collect(),
            }),
            Outcome::Relation(relation) | Outcome::RelationCreated(relation) => Reply::Relation(relation.into()),
            Outcome::Relations(relations) => Reply::Relations(proto::ListRelationsResponse {
                items: relations.into_iter().map(proto::Relation::from).collect(),
            }),
            Outcome::Graph(snapshot) => Reply::Graph(snapshot.into()),
        }
    }

    fn fail(kind: ErrorKind, err: &GlossaryError) -> Status {
        match kind {
            ErrorKind::NotFound => Status::not_found(err.to_string()),
            ErrorKind::InvalidInput => Status::invalid_argument(err.to_string()),
            ErrorKind::Duplicate => Status::already_exists(err.to_string()),
            ErrorKind::Unauthorized => Status::unauthenticated(err.to_string()),
            ErrorKind::Internal => Status::internal("Internal error"),
        }
    }
}

/// Handler for `glossary.GlossaryService`; every method runs a contract [`Operation`]
#[derive(Clone)]
pub struct GlossaryRpc {
    server: Arc<GlossaryServer>,
}

impl GlossaryRpc {
    pub fn new(server: Arc<GlossaryServer>) -> Self {
        Self { server }
    }

    async fn call<T>(&self, operation: Operation) -> Result<Response<T>, Status>
    where
        T: TryFrom<Reply, Error = Status>,
    {
        let reply = RpcFrontEnd::render(execute(self.server.service(), operation).await)?;
        T::try_from(reply).map(Response::new)
    }

    async fn try_call<T, R>(&self, request: R) -> Result<Response<T>, Status>
    where
        T: TryFrom<Reply, Error = Status>,
        Operation: TryFrom<R, Error = GlossaryError>,
    {
        let operation = Operation::try_from(request).map_err(|err| RpcFrontEnd::fail(ErrorKind::InvalidInput, &err))?;
        self.call(operation).await
    }
}

#[tonic::async_trait]
impl GlossaryService for GlossaryRpc {
    async fn health(&self, _request: Request<proto::Empty>) -> Result<Response<proto::Empty>, Status> {
        self.call(Operation::Health).await
    }

    async fn list_terms(
        &self,
        request: Request<proto::ListTermsRequest>,
    ) -> Result<Response<proto::ListTermsResponse>, Status> {
        self.call(request.into_inner().into()).await
    }

    async fn get_term(&self, request: Request<proto::GetTermRequest>) -> Result<Response<proto::Term>, Status> {
        self.call(request.into_inner().into()).await
    }

    async fn get_term_by_keyword(
        &self,
        request: Request<proto::TermByKeywordRequest>,
    ) -> Result<Response<proto::Term>, Status> {
        self.call(request.into_inner().into()).await
    }

    async fn create_term(&self, request: Request<proto::CreateTermRequest>) -> Result<Response<proto::Term>, Status> {
        self.call(request.into_inner().into()).await
    }

    async fn update_term(&self, request: Request<proto::UpdateTermRequest>) -> Result<Response<proto::Term>, Status> {
        self.call(request.into_inner().into()).await
    }

    async fn delete_term(&self, request: Request<proto::DeleteTermRequest>) -> Result<Response<proto::Empty>, Status> {
        self.call(request.into_inner().into()).await
    }

    async fn create_relation(
        &self,
        request: Request<proto::CreateRelationRequest>,
    ) -> Result<Response<proto::Relation>, Status> {
        self.try_call(request.into_inner()).await
    }

    async fn get_relation(
        &self,
        request: Request<proto::GetRelationRequest>,
    ) -> Result<Response<proto::Relation>, Status> {
        self.call(request.into_inner().into()).await
    }

    async fn update_relation(
        &self,
        request: Request<proto::UpdateRelationRequest>,
    ) -> Result<Response<proto::Relation>, Status> {
        self.try_call(request.into_inner()).await
    }

    async fn delete_relation(
        &self,
        request: Request<proto::DeleteRelationRequest>,
    ) -> Result<Response<proto::Empty>, Status> {
        self.call(request.into_inner().into()).await
    }

    async fn list_relations(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::ListRelationsResponse>, Status> {
        self.call(Operation::ListRelations).await
    }

    async fn get_graph(&self, _request: Request<proto::Empty>) -> Result<Response<proto::Graph>, Status> {
        self.call(Operation::GetGraph).await
    }
}
