//! Document envelope shared by all boundary entities.

use serde::{Deserialize, Serialize};

/// A typed document: identity, type tag, and payload.
///
/// Serialized as `{ "docId": ..., "docType": ..., "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document<D> {
    /// Unique document identifier.
    pub doc_id: String,
    /// Entity tag (`workOrder`, `workCenter`, `manufacturingOrder`).
    pub doc_type: String,
    /// Entity payload.
    pub data: D,
}

impl<D> Document<D> {
    /// Wraps a payload.
    pub fn from_parts(doc_id: impl Into<String>, doc_type: impl Into<String>, data: D) -> Self {
        Self {
            doc_id: doc_id.into(),
            doc_type: doc_type.into(),
            data,
        }
    }

    /// Document identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.doc_id
    }
}
