use serde::{Deserialize, Serialize};

use super::relation::Relation;
use super::term::Term;

/// Point-in-time export of every term (nodes) and relation (edges)
///
/// Never persisted; assembled on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Term>,
    pub edges: Vec<Relation>,
}
