use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// --- Request bodies ---

/// Envelope for VNFD create/update calls: `{"vnfd": {...}}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VnfdRequest {
    pub vnfd: VnfdFields,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VnfdFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<VnfdAttributes>,
}

/// Descriptor body attached to a VNFD record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VnfdAttributes {
    pub vnfd: String,
}

impl VnfdRequest {
    /// Body for creating a record. Name and description are always sent;
    /// the descriptor body only when it is already known.
    pub fn create(name: &str, description: &str, descriptor: Option<String>) -> Self {
        Self {
            vnfd: VnfdFields {
                name: Some(name.to_string()),
                description: Some(description.to_string()),
                attributes: descriptor.map(|vnfd| VnfdAttributes { vnfd }),
            },
        }
    }

    /// Body for attaching a descriptor to an existing record.
    pub fn upload(descriptor: String) -> Self {
        Self {
            vnfd: VnfdFields {
                name: None,
                description: None,
                attributes: Some(VnfdAttributes { vnfd: descriptor }),
            },
        }
    }

    pub fn descriptor(&self) -> Option<&str> {
        self.vnfd.attributes.as_ref().map(|a| a.vnfd.as_str())
    }
}

// --- Responses ---

/// Wrapper for VNFD responses. A body without the envelope parses to an
/// empty record so callers can decide how to treat the missing id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VnfdResponse {
    #[serde(default)]
    pub vnfd: Vnfd,
}

/// A VNFD record as returned by the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vnfd {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Ids are strings, but a numeric id is kept as its decimal text. Any
/// other shape reads as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Catalog error body: `{"TackerError": {"type": ..., "message": ..., "detail": ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(rename = "TackerError")]
    pub tacker_error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
}
