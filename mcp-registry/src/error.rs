//! Errors surfaced by the registry and request manager.

/// Failure modes of looking up or invoking registered entities.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// No tool is registered under this name.
    #[error("unknown tool `{0}`")]
    UnknownTool(String),
    /// No resource is registered under this URI.
    #[error("unknown resource `{0}`")]
    UnknownResource(String),
    /// No prompt is registered under this name.
    #[error("unknown prompt `{0}`")]
    UnknownPrompt(String),
    /// The request id named in a cancellation notification is not in flight.
    #[error("unknown or already-completed request `{0}`")]
    UnknownRequest(String),
    /// The tool's arguments did not match its declared input schema shape.
    #[error("invalid arguments for tool `{tool}`: {reason}")]
    InvalidArguments {
        /// The tool that rejected its arguments.
        tool: String,
        /// Why the arguments were rejected.
        reason: String,
    },
    /// A tool was registered under a name that is already taken.
    #[error("a tool named `{0}` is already registered")]
    DuplicateTool(String),
}
