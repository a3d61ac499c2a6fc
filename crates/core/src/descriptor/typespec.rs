//! Canonical parameter-type representation.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::error::Error;

/// Canonical, serializable representation of a parameter or return type.
///
/// This is recursive data, not a trait hierarchy: containers nest
/// arbitrarily (`list[dict[str, int]]`), `Optional` marks a value that may
/// be absent, `Union` and `Choice` cover annotated alternatives.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    /// No annotation was supplied.
    Any,
    Str,
    Int,
    Float,
    Bool,
    List(Box<TypeSpec>),
    Dict(Box<TypeSpec>, Box<TypeSpec>),
    Tuple(Vec<TypeSpec>),
    /// A value that may be absent; always serializes with a trailing `?`.
    Optional(Box<TypeSpec>),
    Union(Vec<TypeSpec>),
    /// A closed set of literal values.
    Choice(Vec<Value>),
}

impl TypeSpec {
    /// `Optional(inner)` without the boxing noise at call sites.
    pub fn optional(inner: TypeSpec) -> Self {
        TypeSpec::Optional(Box::new(inner))
    }

    /// `List(element)` without the boxing noise at call sites.
    pub fn list(element: TypeSpec) -> Self {
        TypeSpec::List(Box::new(element))
    }

    /// `Dict(key, value)` without the boxing noise at call sites.
    pub fn dict(key: TypeSpec, value: TypeSpec) -> Self {
        TypeSpec::Dict(Box::new(key), Box::new(value))
    }

    /// Whether this type marks an optional value.
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeSpec::Optional(_))
    }

    /// The type with a single optional marker stripped, or the type itself.
    pub fn unwrap_optional(&self) -> &TypeSpec {
        match self {
            TypeSpec::Optional(inner) => inner,
            other => other,
        }
    }

    /// JSON-schema fragment for this type, used by the request and
    /// agent-tool adapters.
    pub fn json_schema(&self) -> Value {
        match self {
            TypeSpec::Any => json!({}),
            TypeSpec::Str => json!({"type": "string"}),
            TypeSpec::Int => json!({"type": "integer"}),
            TypeSpec::Float => json!({"type": "number"}),
            TypeSpec::Bool => json!({"type": "boolean"}),
            TypeSpec::List(element) => json!({
                "type": "array",
                "items": element.json_schema(),
            }),
            TypeSpec::Dict(_, value) => json!({
                "type": "object",
                "additionalProperties": value.json_schema(),
            }),
            TypeSpec::Tuple(elements) => {
                let items: Vec<Value> = elements.iter().map(TypeSpec::json_schema).collect();
                json!({
                    "type": "array",
                    "prefixItems": items,
                    "minItems": elements.len(),
                    "maxItems": elements.len(),
                })
            }
            TypeSpec::Optional(inner) => inner.json_schema(),
            TypeSpec::Union(options) => {
                let any_of: Vec<Value> = options.iter().map(TypeSpec::json_schema).collect();
                let mut schema = Map::new();
                schema.insert("anyOf".into(), Value::Array(any_of));
                Value::Object(schema)
            }
            TypeSpec::Choice(values) => json!({"enum": values}),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Any => write!(f, "any"),
            TypeSpec::Str => write!(f, "str"),
            TypeSpec::Int => write!(f, "int"),
            TypeSpec::Float => write!(f, "float"),
            TypeSpec::Bool => write!(f, "bool"),
            TypeSpec::List(element) => write!(f, "list[{}]", element),
            TypeSpec::Dict(key, value) => write!(f, "dict[{}, {}]", key, value),
            TypeSpec::Tuple(elements) => {
                write!(f, "tuple[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            TypeSpec::Optional(inner) => write!(f, "{}?", inner),
            TypeSpec::Union(options) => {
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", option)?;
                }
                Ok(())
            }
            TypeSpec::Choice(values) => {
                write!(f, "Literal[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl FromStr for TypeSpec {
    type Err = Error;

    /// Parse the canonical string form. Stable for the
    /// primitive/container/optional shapes; `Union` and `Choice` only
    /// serialize.
    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if let Some(inner) = s.strip_suffix('?') {
            return Ok(TypeSpec::optional(inner.parse()?));
        }
        match s {
            "any" => return Ok(TypeSpec::Any),
            "str" => return Ok(TypeSpec::Str),
            "int" => return Ok(TypeSpec::Int),
            "float" => return Ok(TypeSpec::Float),
            "bool" => return Ok(TypeSpec::Bool),
            _ => {}
        }
        if let Some(body) = strip_container(s, "list") {
            return Ok(TypeSpec::list(body.parse()?));
        }
        if let Some(body) = strip_container(s, "dict") {
            let parts = split_top_level(body);
            if parts.len() != 2 {
                return Err(Error::descriptor(format!(
                    "dict takes exactly two type arguments: `{}`",
                    s
                )));
            }
            return Ok(TypeSpec::dict(parts[0].parse()?, parts[1].parse()?));
        }
        if let Some(body) = strip_container(s, "tuple") {
            let elements = split_top_level(body)
                .into_iter()
                .map(str::parse)
                .collect::<Result<Vec<TypeSpec>, Error>>()?;
            return Ok(TypeSpec::Tuple(elements));
        }
        Err(Error::descriptor(format!("unrecognized type `{}`", s)))
    }
}

fn strip_container<'a>(s: &'a str, kind: &str) -> Option<&'a str> {
    s.strip_prefix(kind)?
        .strip_prefix('[')?
        .strip_suffix(']')
}

/// Split on commas that sit outside any bracket pair.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

impl Serialize for TypeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
