//! Explicit descriptor construction.
//!
//! The builder plays the introspector role: each tool module declares its
//! parameters, documentation and transports right next to the function, and
//! `build` assembles the descriptor while enforcing the registration-time
//! rules (structured return declared, transport methods and interfaces from
//! the allowed sets, parameter invariants).

use std::collections::BTreeSet;

use serde_json::Value;

use super::docparse::parse_doc;
use super::{FunctionSpec, HttpMethod, Interface, ParamSpec, TypeSpec};
use crate::error::{Error, Result};

/// Builder for a [`FunctionSpec`].
pub struct FunctionBuilder {
    name: String,
    doc: String,
    params: Vec<ParamDraft>,
    methods: Vec<String>,
    interfaces: Vec<String>,
    structured_return: bool,
}

struct ParamDraft {
    name: String,
    ty: TypeSpec,
    default: Option<Value>,
    description: Option<String>,
    choices: Option<Vec<Value>>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            params: Vec::new(),
            methods: Vec::new(),
            interfaces: Vec::new(),
            structured_return: false,
        }
    }

    /// Attach the documentation block; the first sentence becomes the
    /// summary and an `Args:` section supplies parameter descriptions.
    pub fn doc(mut self, text: impl Into<String>) -> Self {
        self.doc = text.into();
        self
    }

    /// Declare a parameter with no default. Required unless the type is
    /// optional.
    pub fn param(mut self, name: &str, ty: TypeSpec) -> Self {
        self.params.push(ParamDraft {
            name: name.to_string(),
            ty,
            default: None,
            description: None,
            choices: None,
        });
        self
    }

    /// Declare a parameter with a default value.
    pub fn param_default(mut self, name: &str, ty: TypeSpec, default: Value) -> Self {
        self.params.push(ParamDraft {
            name: name.to_string(),
            ty,
            default: Some(default),
            description: None,
            choices: None,
        });
        self
    }

    /// Declare an enumerated-choice parameter.
    pub fn param_choices(
        mut self,
        name: &str,
        choices: Vec<Value>,
        default: Option<Value>,
    ) -> Self {
        self.params.push(ParamDraft {
            name: name.to_string(),
            ty: TypeSpec::Choice(choices.clone()),
            default,
            description: None,
            choices: Some(choices),
        });
        self
    }

    /// Override the description of an already-declared parameter; takes
    /// precedence over the documentation block.
    pub fn describe_param(mut self, name: &str, text: &str) -> Self {
        if let Some(draft) = self.params.iter_mut().find(|p| p.name == name) {
            draft.description = Some(text.to_string());
        }
        self
    }

    /// Declare the transport methods. Defaults to GET when never called.
    pub fn methods(mut self, methods: &[&str]) -> Self {
        self.methods = methods.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Declare the target interfaces. Defaults to all three when never
    /// called.
    pub fn interfaces(mut self, interfaces: &[&str]) -> Self {
        self.interfaces = interfaces.iter().map(|i| i.to_string()).collect();
        self
    }

    /// Commit to the structured `{result, success, message}` envelope.
    /// `build` fails without this declaration.
    pub fn returns_structured(mut self) -> Self {
        self.structured_return = true;
        self
    }

    pub fn build(self) -> Result<FunctionSpec> {
        if !self.structured_return {
            return Err(Error::MissingReturnType(self.name));
        }

        let mut methods = BTreeSet::new();
        for raw in &self.methods {
            let method: HttpMethod = raw.parse().map_err(|method| Error::InvalidMethod {
                function: self.name.clone(),
                method,
            })?;
            methods.insert(method);
        }
        if methods.is_empty() {
            methods.insert(HttpMethod::Get);
        }

        let mut interfaces = BTreeSet::new();
        for raw in &self.interfaces {
            let interface: Interface =
                raw.parse().map_err(|interface| Error::InvalidInterface {
                    function: self.name.clone(),
                    interface,
                })?;
            interfaces.insert(interface);
        }
        if interfaces.is_empty() {
            interfaces.extend([Interface::Cli, Interface::Api, Interface::Tool]);
        }

        let doc = parse_doc(&self.doc);
        let mut seen = BTreeSet::new();
        let mut params = Vec::with_capacity(self.params.len());
        for draft in self.params {
            if !seen.insert(draft.name.clone()) {
                return Err(Error::descriptor(format!(
                    "function `{}` declares parameter `{}` twice",
                    self.name, draft.name
                )));
            }
            let required = draft.default.is_none() && !draft.ty.is_optional();
            let description = draft
                .description
                .or_else(|| doc.params.get(&draft.name).cloned())
                .unwrap_or_else(|| format!("Parameter {}", draft.name));
            params.push(ParamSpec {
                name: draft.name,
                ty: draft.ty,
                default: draft.default,
                required,
                description,
                choices: draft.choices,
            });
        }

        Ok(FunctionSpec {
            name: self.name,
            summary: doc.summary,
            params,
            methods,
            interfaces,
            structured_return: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOC: &str = "\
Add two integers.

Args:
    a: Left operand
    b: Right operand
";

    fn add_builder() -> FunctionBuilder {
        FunctionBuilder::new("add")
            .doc(DOC)
            .param("a", TypeSpec::Int)
            .param("b", TypeSpec::Int)
    }

    #[test]
    fn builds_a_complete_descriptor() {
        let spec = add_builder()
            .methods(&["GET", "POST"])
            .interfaces(&["cli", "api"])
            .returns_structured()
            .build()
            .unwrap();

        assert_eq!(spec.name, "add");
        assert_eq!(spec.summary, "Add two integers.");
        assert_eq!(spec.params.len(), 2);
        assert_eq!(spec.params[0].name, "a");
        assert_eq!(spec.params[0].description, "Left operand");
        assert!(spec.params[0].required);
        assert!(spec.methods.contains(&HttpMethod::Post));
        assert!(spec.targets(Interface::Cli));
        assert!(!spec.targets(Interface::Tool));
    }

    #[test]
    fn missing_structured_return_fails_with_function_name() {
        let err = add_builder().build().unwrap_err();
        assert!(matches!(err, Error::MissingReturnType(ref name) if name == "add"));
    }

    #[test]
    fn unknown_transport_method_fails_with_function_name() {
        let err = add_builder()
            .methods(&["GET", "TRACE"])
            .returns_structured()
            .build()
            .unwrap_err();
        match err {
            Error::InvalidMethod { function, method } => {
                assert_eq!(function, "add");
                assert_eq!(method, "TRACE");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_interface_fails() {
        let err = add_builder()
            .interfaces(&["cli", "grpc"])
            .returns_structured()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInterface { .. }));
    }

    #[test]
    fn required_follows_default_and_optionality() {
        let spec = FunctionBuilder::new("probe")
            .param("target", TypeSpec::Str)
            .param_default("retries", TypeSpec::Int, json!(3))
            .param("timeout", TypeSpec::optional(TypeSpec::Float))
            .returns_structured()
            .build()
            .unwrap();

        assert!(spec.param("target").unwrap().required);
        assert!(!spec.param("retries").unwrap().required);
        // optional type: never required, even without a default
        assert!(!spec.param("timeout").unwrap().required);
    }

    #[test]
    fn missing_description_gets_the_deterministic_fallback() {
        let spec = FunctionBuilder::new("probe")
            .param("target", TypeSpec::Str)
            .returns_structured()
            .build()
            .unwrap();
        assert_eq!(spec.param("target").unwrap().description, "Parameter target");
    }

    #[test]
    fn explicit_description_wins_over_doc_text() {
        let spec = add_builder()
            .describe_param("a", "Augend")
            .returns_structured()
            .build()
            .unwrap();
        assert_eq!(spec.param("a").unwrap().description, "Augend");
    }

    #[test]
    fn choice_param_carries_values_and_type() {
        let spec = FunctionBuilder::new("render")
            .param_choices(
                "format",
                vec![json!("mermaid"), json!("dot")],
                Some(json!("mermaid")),
            )
            .returns_structured()
            .build()
            .unwrap();
        let param = spec.param("format").unwrap();
        assert_eq!(param.choices.as_ref().unwrap().len(), 2);
        assert!(!param.required);
        assert_eq!(param.ty.to_string(), "Literal[\"mermaid\", \"dot\"]");
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        let err = FunctionBuilder::new("dup")
            .param("x", TypeSpec::Int)
            .param("x", TypeSpec::Str)
            .returns_structured()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("dup"));
    }

    #[test]
    fn defaults_apply_when_nothing_is_declared() {
        let spec = FunctionBuilder::new("bare")
            .returns_structured()
            .build()
            .unwrap();
        assert!(spec.methods.contains(&HttpMethod::Get));
        assert_eq!(spec.interfaces.len(), 3);
    }
}
