//! Term routes

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Response,
    Json,
};
use std::sync::Arc;

use glossary_core::TermId;

use super::errors::ApiError;
use super::models::{TermCreateBody, TermUpdateBody, TermsParams};
use super::run;
use crate::contract::Operation;
use crate::server::GlossaryServer;

/// `GET /api/terms?query&limit&offset`
pub async fn list_terms(
    State(server): State<Arc<GlossaryServer>>,
    params: Result<Query<TermsParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    run(&server, Operation::ListTerms(params.into())).await
}

/// `GET /api/terms/:id`
pub async fn get_term(
    State(server): State<Arc<GlossaryServer>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    run(&server, Operation::GetTerm(TermId(id))).await
}

/// `GET /api/terms/by-keyword/:keyword`
pub async fn get_term_by_keyword(
    State(server): State<Arc<GlossaryServer>>,
    keyword: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(keyword) = keyword?;
    run(&server, Operation::GetTermByKeyword(keyword)).await
}

/// `POST /api/terms`
pub async fn create_term(
    State(server): State<Arc<GlossaryServer>>,
    body: Result<Json<TermCreateBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    run(&server, Operation::CreateTerm(body.into())).await
}

/// `PUT /api/terms/:id`
pub async fn update_term(
    State(server): State<Arc<GlossaryServer>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TermUpdateBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    run(&server, Operation::UpdateTerm(TermId(id), body.into())).await
}

/// `DELETE /api/terms/:id`; relations touching the term go with it
pub async fn delete_term(
    State(server): State<Arc<GlossaryServer>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    run(&server, Operation::DeleteTerm(TermId(id))).await
}
