//! The live table of registered tools.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::RegistryError;
use crate::tool::{RegisteredTool, ToolDescriptor, ToolHandler};

/// Maps tool name to its descriptor and handler. Registration happens
/// once at startup; lookups happen on every `tools/call`, so this is a
/// [`DashMap`] rather than a `Mutex<HashMap<_>>` to avoid serializing
/// concurrent calls on the same lock.
#[derive(Default)]
pub struct ToolRegistry {
    tools: DashMap<String, Arc<RegisteredTool>>,
}

impl ToolRegistry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTool`] if a tool of this name is
    /// already registered — registration failures must be deterministic
    /// and loud at startup, not a silent last-write-wins overwrite.
    pub fn register(&self, descriptor: ToolDescriptor, handler: Arc<dyn ToolHandler>) -> Result<(), RegistryError> {
        match self.tools.entry(descriptor.name.clone()) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateTool(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(RegisteredTool { descriptor, handler }));
                Ok(())
            }
        }
    }

    /// Descriptors for every registered tool, for `tools/list`.
    #[must_use]
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|entry| entry.value().descriptor.clone()).collect()
    }

    /// Looks up a tool by name, for `tools/call`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownTool`] if no tool is registered
    /// under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<RegisteredTool>, RegistryError> {
        self.tools
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| RegistryError::UnknownTool(name.to_owned()))
    }

    /// Number of registered tools, for `/mcp-info`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True when no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mcp_payments::Pricing;
    use serde_json::json;

    use super::*;
    use crate::context::Context;
    use crate::tool::FrameSender;

    struct NoopTool;

    #[async_trait::async_trait]
    impl ToolHandler for NoopTool {
        async fn call(&self, _ctx: Context, _arguments: serde_json::Value, _frames: FrameSender) {}
    }

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.to_owned(),
            description: String::new(),
            input_schema: json!({}),
            pricing: Pricing::Free,
        }
    }

    #[test]
    fn registering_a_duplicate_name_fails_without_overwriting() {
        let registry = ToolRegistry::new();
        registry.register(descriptor("echo"), Arc::new(NoopTool)).expect("first registration succeeds");

        let err = registry
            .register(descriptor("echo"), Arc::new(NoopTool))
            .expect_err("duplicate registration should fail");
        assert!(matches!(err, RegistryError::DuplicateTool(name) if name == "echo"));
        assert_eq!(registry.len(), 1);
    }
}
