//! Directed, typed edges between terms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::patch::Patch;
use super::term::TermId;
use crate::error::GlossaryError;

/// Server-assigned relation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationId(pub i64);

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of relation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    IsA,
    PartOf,
    RelatedTo,
    SynonymOf,
    DerivedFrom,
}

impl RelationType {
    /// Every relation kind, in declaration order
    pub const ALL: [RelationType; 5] = [
        RelationType::IsA,
        RelationType::PartOf,
        RelationType::RelatedTo,
        RelationType::SynonymOf,
        RelationType::DerivedFrom,
    ];

    /// Wire and storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::IsA => "is-a",
            RelationType::PartOf => "part-of",
            RelationType::RelatedTo => "related-to",
            RelationType::SynonymOf => "synonym-of",
            RelationType::DerivedFrom => "derived-from",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only conversion from untrusted text to a relation kind.
impl FromStr for RelationType {
    type Err = GlossaryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RelationType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| {
                GlossaryError::validation(format!(
                    "invalid relation type '{}', expected one of: {}",
                    value,
                    RelationType::ALL.map(|kind| kind.as_str()).join(", ")
                ))
            })
    }
}

/// A typed edge from `source_id` to `target_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,
    pub source_id: TermId,
    pub target_id: TermId,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
}

/// Fields for creating a relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationCreateInput {
    pub source_id: TermId,
    pub target_id: TermId,
    pub relation_type: RelationType,
}

impl RelationCreateInput {
    /// Build an input from a raw type name
    pub fn parse(source_id: i64, target_id: i64, relation_type: &str) -> Result<Self, GlossaryError> {
        Ok(Self {
            source_id: TermId(source_id),
            target_id: TermId(target_id),
            relation_type: relation_type.parse()?,
        })
    }
}

/// Partial update of a relation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationUpdateInput {
    pub source_id: Patch<TermId>,
    pub target_id: Patch<TermId>,
    pub relation_type: Patch<RelationType>,
}

impl RelationUpdateInput {
    /// Build an input from raw optional fields
    pub fn parse(
        source_id: Option<i64>,
        target_id: Option<i64>,
        relation_type: Option<&str>,
    ) -> Result<Self, GlossaryError> {
        let relation_type = match relation_type {
            Some(raw) => Patch::Set(raw.parse()?),
            None => Patch::Absent,
        };
        Ok(Self {
            source_id: Patch::from(source_id).map(TermId),
            target_id: Patch::from(target_id).map(TermId),
            relation_type,
        })
    }

    pub fn apply_to(&self, relation: &mut Relation) {
        self.source_id.clone().apply_to(&mut relation.source_id);
        self.target_id.clone().apply_to(&mut relation.target_id);
        self.relation_type.clone().apply_to(&mut relation.relation_type);
    }

    /// Endpoints this update points the relation at
    pub fn endpoints(&self) -> Vec<TermId> {
        [self.source_id.as_ref(), self.target_id.as_ref()]
            .into_iter()
            .filter_map(|patch| patch.into_option().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_type() {
        for kind in RelationType::ALL {
            assert_eq!(kind.as_str().parse::<RelationType>().unwrap(), kind);
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let err = "invented-type".parse::<RelationType>().unwrap_err();
        assert!(matches!(err, GlossaryError::ValidationError(_)));
        // Names are case-sensitive on the wire
        assert!("IS-A".parse::<RelationType>().is_err());
    }

    #[test]
    fn serializes_as_kebab_case() {
        let relation = Relation {
            id: RelationId(3),
            source_id: TermId(1),
            target_id: TermId(2),
            relation_type: RelationType::DerivedFrom,
        };
        let json = serde_json::to_value(&relation).unwrap();
        assert_eq!(json["type"], "derived-from");
        assert_eq!(json["source_id"], 1);
    }

    #[test]
    fn update_parse_and_apply() {
        let update = RelationUpdateInput::parse(None, Some(9), Some("part-of")).unwrap();
        assert_eq!(update.endpoints(), vec![TermId(9)]);

        let mut relation = Relation {
            id: RelationId(1),
            source_id: TermId(1),
            target_id: TermId(2),
            relation_type: RelationType::IsA,
        };
        update.apply_to(&mut relation);
        assert_eq!(relation.source_id, TermId(1));
        assert_eq!(relation.target_id, TermId(9));
        assert_eq!(relation.relation_type, RelationType::PartOf);

        assert!(RelationUpdateInput::parse(None, None, Some("nope")).is_err());
    }
}
