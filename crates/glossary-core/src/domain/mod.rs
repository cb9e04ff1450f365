//! Domain layer - glossary records, inputs and repository interfaces

pub mod graph;
pub mod patch;
pub mod relation;
pub mod repository;
pub mod term;
