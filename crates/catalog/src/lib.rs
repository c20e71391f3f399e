//! Label type catalog for dataflow diagrams.
//!
//! A catalog holds the label types defined for a diagram (e.g.
//! `Sensitivity` with values `Personal` and `Public`). Behavior validation
//! only reads it: label accesses `Type.Value` are resolved against the
//! catalog's types and their value texts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a label catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// JSON deserialization failed.
    #[error("invalid label catalog JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A label type has an empty name.
    #[error("label type #{index} has an empty name")]
    EmptyTypeName {
        /// Position of the offending type in the catalog.
        index: usize,
    },

    /// Two label types share a name.
    #[error("duplicate label type: {name}")]
    DuplicateType {
        /// The repeated type name.
        name: String,
    },

    /// A label type lists the same value text twice.
    #[error("duplicate value {value:?} in label type {label_type}")]
    DuplicateValue {
        /// Name of the type containing the duplicate.
        label_type: String,
        /// The repeated value text.
        value: String,
    },
}

/// One permitted value of a [`LabelType`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelTypeValue {
    /// Editor-assigned identifier; not used for resolution.
    #[serde(default)]
    pub id: String,
    /// Value text as written after the dot of a label access.
    pub text: String,
}

/// A named label category and its permitted values.
///
/// # Example
/// ```
/// use dfd_behavior_catalog::LabelType;
///
/// let sensitivity = LabelType::new("Sensitivity", ["Personal", "Public"]);
/// assert!(sensitivity.has_value("Public"));
/// assert!(!sensitivity.has_value("Secret"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelType {
    /// Editor-assigned identifier; not used for resolution.
    #[serde(default)]
    pub id: String,
    /// Type name as written before the dot of a label access.
    pub name: String,
    /// Permitted values.
    #[serde(default)]
    pub values: Vec<LabelTypeValue>,
}

impl LabelType {
    /// Build a label type from a name and value texts, with empty ids.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: String::new(),
            name: name.into(),
            values: values
                .into_iter()
                .map(|text| LabelTypeValue {
                    id: String::new(),
                    text: text.into(),
                })
                .collect(),
        }
    }

    /// `true` if `text` is one of this type's values.
    pub fn has_value(&self, text: &str) -> bool {
        self.values.iter().any(|v| v.text == text)
    }
}

/// Read-only set of label types with unique names.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LabelCatalog {
    label_types: Vec<LabelType>,
}

impl LabelCatalog {
    /// Build a catalog, checking that type names are non-empty and unique
    /// and that value texts are unique within each type.
    pub fn new(label_types: Vec<LabelType>) -> Result<Self, CatalogError> {
        for (index, ty) in label_types.iter().enumerate() {
            if ty.name.is_empty() {
                return Err(CatalogError::EmptyTypeName { index });
            }
            if label_types[..index].iter().any(|t| t.name == ty.name) {
                return Err(CatalogError::DuplicateType {
                    name: ty.name.clone(),
                });
            }
            for (vi, value) in ty.values.iter().enumerate() {
                if ty.values[..vi].iter().any(|v| v.text == value.text) {
                    return Err(CatalogError::DuplicateValue {
                        label_type: ty.name.clone(),
                        value: value.text.clone(),
                    });
                }
            }
        }
        Ok(Self { label_types })
    }

    /// All label types, in definition order.
    pub fn label_types(&self) -> &[LabelType] {
        &self.label_types
    }

    /// Look up a label type by exact name.
    pub fn find_type(&self, name: &str) -> Option<&LabelType> {
        self.label_types.iter().find(|t| t.name == name)
    }

    /// Number of label types.
    pub fn len(&self) -> usize {
        self.label_types.len()
    }

    /// `true` if the catalog defines no label type.
    pub fn is_empty(&self) -> bool {
        self.label_types.is_empty()
    }
}

/// Load a catalog from a JSON array of label types:
/// `[{ "id": "...", "name": "Sensitivity", "values": [{ "id": "...", "text": "Public" }] }]`.
pub fn load_catalog_from_str(s: &str) -> Result<LabelCatalog, CatalogError> {
    let label_types: Vec<LabelType> = serde_json::from_str(s)?;
    LabelCatalog::new(label_types)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedDiagram {
    #[serde(default)]
    label_types: Option<Vec<LabelType>>,
}

/// Load the catalog embedded in a saved diagram (`{ "model": ..., "labelTypes": [...] }`).
///
/// Returns `Ok(None)` when the diagram carries no `labelTypes`; every other
/// field of the diagram is ignored.
pub fn load_catalog_from_diagram_str(s: &str) -> Result<Option<LabelCatalog>, CatalogError> {
    let diagram: SavedDiagram = serde_json::from_str(s)?;
    diagram.label_types.map(LabelCatalog::new).transpose()
}
