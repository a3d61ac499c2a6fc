//! Parameter metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TypeSpec;

/// Metadata for one function parameter.
///
/// Invariant: `required == default.is_none() && !ty.is_optional()` — an
/// optional-typed parameter is never required even without an explicit
/// default. The builder computes the flag; it is stored so adapters never
/// re-derive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    pub required: bool,

    pub description: String,

    /// Closed value set, when the parameter is an enumerated choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,
}
