//! In-memory state store for the glossary service
//!
//! This crate provides in-memory implementations of the repository
//! interfaces defined in glossary-core. It backs `memory://` deployments,
//! local development and the test suites; nothing survives a restart.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub mod repositories;
pub use repositories::{GlossaryTables, InMemoryRelationRepository, InMemoryTermRepository};

use glossary_core::domain::repository::{RelationRepository, TermRepository};

/// Provider for in-memory glossary repositories
///
/// Both repositories share one set of tables behind a single lock, so a term
/// delete and its relation cascade are observed together.
#[derive(Clone, Default)]
pub struct InMemoryStateStoreProvider {
    tables: Arc<RwLock<GlossaryTables>>,
}

impl InMemoryStateStoreProvider {
    /// Create a provider with empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the term and relation repositories over the shared tables
    pub fn create_repositories(&self) -> (Arc<dyn TermRepository>, Arc<dyn RelationRepository>) {
        debug!("Creating in-memory glossary repositories");
        (
            Arc::new(InMemoryTermRepository::new(self.tables.clone())),
            Arc::new(InMemoryRelationRepository::new(self.tables.clone())),
        )
    }
}
