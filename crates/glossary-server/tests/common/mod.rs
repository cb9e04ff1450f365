//! Shared fixtures for the server integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use mockall::mock;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{metadata::MetadataValue, transport::Channel};
use tower::ServiceExt;

use glossary_core::{
    GlossaryError, GlossaryService, Relation, RelationCreateInput, RelationId, RelationRepository,
    RelationUpdateInput, Term, TermCreateInput, TermId, TermQuery, TermRepository, TermUpdateInput,
};
use glossary_server::rpc::proto::glossary_service_client::GlossaryServiceClient;
use glossary_server::{GlossaryServer, ServerConfig};
use glossary_state_inmemory::InMemoryStateStoreProvider;

pub const TOKEN: &str = "test-secret";

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

/// REST router plus the server behind it, for starting a gRPC listener on demand
pub struct TestApp {
    pub server: Arc<GlossaryServer>,
    pub rest: Router,
}

impl TestApp {
    /// Serve gRPC on an ephemeral port and return a connected client
    pub async fn grpc(&self) -> GlossaryServiceClient<Channel> {
        GlossaryServiceClient::new(self.grpc_channel().await)
    }

    pub async fn grpc_channel(&self) -> Channel {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = self.server.rpc_router().unwrap();
        tokio::spawn(async move {
            router.serve_with_incoming(TcpListenerStream::new(listener)).await.unwrap();
        });
        Channel::from_shared(format!("http://{}", addr))
            .unwrap()
            .connect()
            .await
            .unwrap()
    }
}

pub fn test_config(token: Option<&str>) -> ServerConfig {
    ServerConfig {
        database_url: "memory://".to_string(),
        api_auth_token: token.map(str::to_string),
        ..ServerConfig::default()
    }
}

pub fn app_with_service(service: GlossaryService, token: Option<&str>) -> TestApp {
    let server = Arc::new(GlossaryServer::new(test_config(token), service));
    TestApp {
        rest: server.rest_router(),
        server,
    }
}

/// Fresh in-memory glossary
pub fn memory_app(token: Option<&str>) -> TestApp {
    let (terms, relations) = InMemoryStateStoreProvider::new().create_repositories();
    app_with_service(GlossaryService::new(terms, relations), token)
}

/// Repositories that fail the test if any method is called
pub fn untouchable_app(token: Option<&str>) -> TestApp {
    app_with_service(
        GlossaryService::new(Arc::new(MockTermRepo::new()), Arc::new(MockRelationRepo::new())),
        token,
    )
}

/// Send one request; returns status and decoded JSON body (`Null` when empty)
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Wrap a gRPC message, attaching `authorization: Bearer <token>` when given
pub fn grpc_request<T>(message: T, token: Option<&str>) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    if let Some(token) = token {
        let value: MetadataValue<_> = format!("Bearer {}", token).parse().unwrap();
        request.metadata_mut().insert("authorization", value);
    }
    request
}

pub fn term_body(term: &str, definition: &str) -> Value {
    json!({"term": term, "definition": definition})
}
