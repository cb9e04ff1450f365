//!
//! Glossary Core - domain model and stores for the glossary service
//!
//! This crate defines terms, relations and graph snapshots, the repository
//! interfaces storage backends implement, and the application services that
//! keep the term and relation tables consistent. Protocol front-ends talk to
//! [`GlossaryService`] only.

#![forbid(unsafe_code)]

/// Domain layer - records, inputs and repository traits
pub mod domain;

/// Application services - Term Store, Relation Store, Graph Assembler
pub mod application;

/// Error types
pub mod error;

pub use application::{GlossaryService, GraphAssembler, RelationStore, TermStore};
pub use domain::graph::GraphSnapshot;
pub use domain::patch::Patch;
pub use domain::relation::{
    Relation, RelationCreateInput, RelationId, RelationType, RelationUpdateInput,
};
pub use domain::repository::{RelationRepository, TermRepository};
pub use domain::term::{
    SourceInfo, Term, TermCreateInput, TermId, TermQuery, TermUpdateInput, DEFAULT_LIST_LIMIT,
    MAX_LIST_LIMIT,
};
pub use error::{GlossaryError, GlossaryResult};
