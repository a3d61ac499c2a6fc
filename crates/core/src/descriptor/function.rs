//! Function metadata.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParamSpec;

/// Transport methods a function may declare.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        };
        f.write_str(s)
    }
}

impl HttpMethod {
    /// Whether the method carries a request body (POST/PUT/PATCH) rather
    /// than query parameters.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// Surfaces a function can be projected onto.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    Cli,
    Api,
    Tool,
}

impl FromStr for Interface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "cli" => Ok(Interface::Cli),
            "api" => Ok(Interface::Api),
            "tool" => Ok(Interface::Tool),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Interface::Cli => "cli",
            Interface::Api => "api",
            Interface::Tool => "tool",
        };
        f.write_str(s)
    }
}

/// Protocol-neutral metadata for one registered function.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSpec {
    /// Unique across the registry.
    pub name: String,

    /// First sentence of the documentation text.
    pub summary: String,

    /// Positional order of the declaration, preserved.
    pub params: Vec<ParamSpec>,

    pub methods: BTreeSet<HttpMethod>,

    pub interfaces: BTreeSet<Interface>,

    /// Every exposed function must commit to the structured envelope;
    /// registration fails otherwise.
    pub structured_return: bool,
}

impl FunctionSpec {
    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Whether the function targets the given interface.
    pub fn targets(&self, interface: Interface) -> bool {
        self.interfaces.contains(&interface)
    }
}
