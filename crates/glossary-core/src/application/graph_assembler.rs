use tracing::debug;

use super::relation_store::RelationStore;
use super::term_store::TermStore;
use crate::domain::graph::GraphSnapshot;
use crate::domain::term::{TermQuery, MAX_LIST_LIMIT};
use crate::error::GlossaryResult;

/// Upper bound on nodes in a snapshot; effectively "all terms"
pub const GRAPH_NODE_LIMIT: u32 = MAX_LIST_LIMIT;

/// Graph Assembler - flat nodes + edges export
///
/// No cycle detection or connectivity analysis happens here; consumers run
/// their own graph algorithms over the snapshot.
#[derive(Clone)]
pub struct GraphAssembler {
    terms: TermStore,
    relations: RelationStore,
}

impl GraphAssembler {
    pub fn new(terms: TermStore, relations: RelationStore) -> Self {
        Self { terms, relations }
    }

    /// Recompute the snapshot from the stores
    pub async fn snapshot(&self) -> GlossaryResult<GraphSnapshot> {
        let nodes = self.terms.list(&TermQuery::all(GRAPH_NODE_LIMIT)).await?;
        let edges = self.relations.list_all().await?;
        debug!(nodes = nodes.len(), edges = edges.len(), "Assembled graph snapshot");
        Ok(GraphSnapshot { nodes, edges })
    }
}
