//! Self-description of the REST API
//!
//! Served without a credential at `/api/openapi.json`, `/api/docs` and
//! `/api/redoc`.

use axum::{
    response::{Html, IntoResponse},
    Json,
};
use serde_json::{json, Map, Value};

/// A documented REST route
pub struct RouteDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub operation: &'static str,
    pub success: u16,
    pub summary: &'static str,
}

/// Every REST route, in the order they are documented
pub const ROUTES: &[RouteDoc] = &[
    RouteDoc { method: "get", path: "/api/health", operation: "Health", success: 200, summary: "Liveness probe" },
    RouteDoc { method: "get", path: "/api/terms", operation: "ListTerms", success: 200, summary: "List or search terms (query, limit, offset)" },
    RouteDoc { method: "post", path: "/api/terms", operation: "CreateTerm", success: 201, summary: "Create a term" },
    RouteDoc { method: "get", path: "/api/terms/{id}", operation: "GetTerm", success: 200, summary: "Get a term by id" },
    RouteDoc { method: "put", path: "/api/terms/{id}", operation: "UpdateTerm", success: 200, summary: "Partially update a term" },
    RouteDoc { method: "delete", path: "/api/terms/{id}", operation: "DeleteTerm", success: 204, summary: "Delete a term and its relations" },
    RouteDoc { method: "get", path: "/api/terms/by-keyword/{keyword}", operation: "GetTermByKeyword", success: 200, summary: "Case-insensitive lookup by term key" },
    RouteDoc { method: "get", path: "/api/relations", operation: "ListRelations", success: 200, summary: "List every relation" },
    RouteDoc { method: "post", path: "/api/relations", operation: "CreateRelation", success: 201, summary: "Create a relation" },
    RouteDoc { method: "get", path: "/api/relations/{id}", operation: "GetRelation", success: 200, summary: "Get a relation by id" },
    RouteDoc { method: "put", path: "/api/relations/{id}", operation: "UpdateRelation", success: 200, summary: "Partially update a relation" },
    RouteDoc { method: "delete", path: "/api/relations/{id}", operation: "DeleteRelation", success: 204, summary: "Delete a relation" },
    RouteDoc { method: "get", path: "/api/graph", operation: "GetGraph", success: 200, summary: "Export all terms and relations" },
];

/// Build the OpenAPI document from [`ROUTES`]
pub fn openapi_document() -> Value {
    let mut paths = Map::new();
    for route in ROUTES {
        let entry = paths
            .entry(route.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let mut responses = json!({
            "401": {"description": "Missing or invalid bearer token"},
            "404": {"description": "Not found"},
            "409": {"description": "Duplicate term"},
            "422": {"description": "Invalid input"},
        });
        responses[route.success.to_string().as_str()] = json!({"description": "Success"});

        if let Value::Object(methods) = entry {
            methods.insert(
                route.method.to_string(),
                json!({
                    "operationId": route.operation,
                    "summary": route.summary,
                    "security": [{"bearerAuth": []}],
                    "responses": responses,
                }),
            );
        }
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Glossary API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": paths,
        "components": {
            "securitySchemes": {
                "bearerAuth": {"type": "http", "scheme": "bearer"}
            }
        }
    })
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(openapi_document())
}

pub async fn docs_page() -> impl IntoResponse {
    let rows: String = ROUTES
        .iter()
        .map(|route| {
            format!(
                "<tr><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td></tr>",
                route.method.to_uppercase(),
                route.path,
                route.operation,
                route.summary
            )
        })
        .collect();

    Html(format!(
        "<!doctype html><html><head><title>Glossary API</title></head><body>\
         <h1>Glossary API</h1><p>OpenAPI document: <a href=\"/api/openapi.json\">/api/openapi.json</a></p>\
         <table><tr><th>Method</th><th>Path</th><th>Operation</th><th>Summary</th></tr>{}</table>\
         </body></html>",
        rows
    ))
}

const REDOC_BUNDLE: &str = "https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js";

/// ReDoc viewer over the OpenAPI document
pub async fn redoc_page() -> impl IntoResponse {
    Html(format!(
        "<!doctype html><html><head><title>Glossary API - ReDoc</title>\
         <meta charset=\"utf-8\"/></head><body>\
         <redoc spec-url=\"/api/openapi.json\"></redoc>\
         <script src=\"{}\"></script></body></html>",
        REDOC_BUNDLE
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = openapi_document();
        for route in ROUTES {
            let operation = &doc["paths"][route.path][route.method]["operationId"];
            assert_eq!(operation, route.operation);
        }
    }
}
