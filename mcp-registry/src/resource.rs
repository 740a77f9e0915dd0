//! Static resource registry backing `resources/list` and `resources/read`.

use serde_json::Value;

/// One resource a client can read, e.g. a schema document or config
/// snapshot. Content is supplied eagerly at registration time — this
/// server has no notion of resources that change after startup.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Stable URI identifying this resource.
    pub uri: String,
    /// Human-readable name.
    pub name: String,
    /// MIME type of `content`.
    pub mime_type: String,
    /// The resource body.
    pub content: Value,
}

/// A flat, read-only collection of [`Resource`]s.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
}

impl ResourceRegistry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one resource, replacing any earlier one at the same URI.
    pub fn register(&mut self, resource: Resource) {
        self.resources.retain(|existing| existing.uri != resource.uri);
        self.resources.push(resource);
    }

    /// All registered resources, for `resources/list`.
    #[must_use]
    pub fn list(&self) -> &[Resource] {
        &self.resources
    }

    /// Looks up one resource by URI, for `resources/read`.
    #[must_use]
    pub fn get(&self, uri: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.uri == uri)
    }
}
