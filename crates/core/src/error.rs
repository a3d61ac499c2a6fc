//! Error types for toolspan.

use thiserror::Error;

/// Result type alias using toolspan's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Workspace-wide error type.
///
/// Registration-time variants are programmer errors and always carry the
/// offending function name; invocation-time variants split into a client
/// class and a server class, see [`Error::is_client`].
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Registration-time errors (fatal at start-up)
    // =========================================================================
    #[error("function `{0}` is already registered")]
    DuplicateFunction(String),

    #[error("function `{0}` does not declare a structured return")]
    MissingReturnType(String),

    #[error("function `{function}` declares unsupported transport method `{method}`")]
    InvalidMethod { function: String, method: String },

    #[error("function `{function}` declares unknown interface `{interface}`")]
    InvalidInterface { function: String, interface: String },

    #[error("descriptor error: {0}")]
    Descriptor(String),

    // =========================================================================
    // Module loading
    // =========================================================================
    #[error("module load failed: {0}")]
    ModuleLoad(String),

    // =========================================================================
    // Invocation-time errors
    // =========================================================================
    /// Client class: bad or missing argument, type mismatch, unknown choice.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("function not found: {0}")]
    FunctionNotFound(String),

    /// Server class: any other failure inside the registered function.
    #[error("execution failed: {0}")]
    Execution(String),

    // =========================================================================
    // Infrastructure
    // =========================================================================
    #[error("gateway error: {0}")]
    Gateway(String),

    #[error("model provider error: {0}")]
    Model(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a descriptor-construction error.
    pub fn descriptor(msg: impl Into<String>) -> Self {
        Self::Descriptor(msg.into())
    }

    /// Create a module-load error.
    pub fn module_load(msg: impl Into<String>) -> Self {
        Self::ModuleLoad(msg.into())
    }

    /// Create an invalid-parameters error.
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// Create an execution error.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a gateway error.
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create a model-provider error.
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Whether the failure is client-caused (bad request) rather than a
    /// fault in the function or the infrastructure. Each adapter translates
    /// this split into its own vocabulary: 4xx vs 5xx over HTTP, an error
    /// string in the tool envelope, a prefixed message on the CLI.
    pub fn is_client(&self) -> bool {
        matches!(self, Error::InvalidParams(_) | Error::FunctionNotFound(_))
    }
}
