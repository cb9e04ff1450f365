//! Relation routes

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Response,
    Json,
};
use std::sync::Arc;

use glossary_core::{RelationCreateInput, RelationId, RelationUpdateInput};

use super::errors::ApiError;
use super::models::{RelationCreateBody, RelationUpdateBody};
use super::run;
use crate::contract::Operation;
use crate::server::GlossaryServer;

pub async fn list_relations(State(server): State<Arc<GlossaryServer>>) -> Result<Response, ApiError> {
    run(&server, Operation::ListRelations).await
}

pub async fn get_relation(
    State(server): State<Arc<GlossaryServer>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    run(&server, Operation::GetRelation(RelationId(id))).await
}

/// `POST /api/relations`; the type name is checked before any store call
pub async fn create_relation(
    State(server): State<Arc<GlossaryServer>>,
    body: Result<Json<RelationCreateBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let input = RelationCreateInput::try_from(body)?;
    run(&server, Operation::CreateRelation(input)).await
}

pub async fn update_relation(
    State(server): State<Arc<GlossaryServer>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<RelationUpdateBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let input = RelationUpdateInput::try_from(body)?;
    run(&server, Operation::UpdateRelation(RelationId(id), input)).await
}

pub async fn delete_relation(
    State(server): State<Arc<GlossaryServer>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    run(&server, Operation::DeleteRelation(RelationId(id))).await
}
