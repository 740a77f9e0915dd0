#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Tool/resource/prompt registration, per-call execution context, and
//! the in-flight request manager that backs cancellation.
//!
//! # Modules
//!
//! - [`context`] — [`context::Context`] and [`context::CancelFlag`]
//! - [`error`] — [`error::RegistryError`]
//! - [`prompt`] — [`prompt::Prompt`] and [`prompt::PromptRegistry`]
//! - [`request_manager`] — [`request_manager::RequestManager`]
//! - [`resource`] — [`resource::Resource`] and [`resource::ResourceRegistry`]
//! - [`tool`] — [`tool::ToolDescriptor`] and [`tool::ToolHandler`]
//! - [`tool_registry`] — [`tool_registry::ToolRegistry`]

pub mod context;
pub mod error;
pub mod prompt;
pub mod request_manager;
pub mod resource;
pub mod tool;
pub mod tool_registry;

pub use context::{CancelFlag, Context};
pub use error::RegistryError;
pub use prompt::{Prompt, PromptArgument, PromptRegistry};
pub use request_manager::RequestManager;
pub use resource::{Resource, ResourceRegistry};
pub use tool::{FrameSender, RegisteredTool, ToolDescriptor, ToolHandler};
pub use tool_registry::ToolRegistry;
