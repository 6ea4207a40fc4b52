//! Semantic types: the ontology meaning attached to a column.

use serde::{Deserialize, Serialize};

/// Where a semantic type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeOrigin {
    /// Assigned directly by a user.
    User,
    /// Proposed by the classifier.
    Predicted,
    /// Restored from a stored model.
    Import,
}

/// An ontology class/property pair proposed or confirmed as the meaning of a
/// column: the column's values are instances of `property_uri` on an
/// instance of `class_uri`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticType {
    pub class_uri: String,
    pub property_uri: String,
    pub origin: TypeOrigin,
    /// Classifier confidence in `[0, 1]`; user assignments carry `1.0`.
    pub confidence: f64,
}

impl SemanticType {
    pub fn predicted(
        class_uri: impl Into<String>,
        property_uri: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            class_uri: class_uri.into(),
            property_uri: property_uri.into(),
            origin: TypeOrigin::Predicted,
            confidence,
        }
    }

    pub fn user(class_uri: impl Into<String>, property_uri: impl Into<String>) -> Self {
        Self {
            class_uri: class_uri.into(),
            property_uri: property_uri.into(),
            origin: TypeOrigin::User,
            confidence: 1.0,
        }
    }
}
