//! Static prompt registry backing `prompts/list` and `prompts/get`.

/// One named argument a prompt template accepts.
#[derive(Debug, Clone)]
pub struct PromptArgument {
    /// Argument name, substituted into the template.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Whether the caller must supply this argument.
    pub required: bool,
}

/// A reusable prompt template, returned verbatim to the client — this
/// server does no template interpolation itself.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique prompt name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Accepted arguments.
    pub arguments: Vec<PromptArgument>,
    /// The template text.
    pub template: String,
}

/// A flat, read-only collection of [`Prompt`]s.
#[derive(Debug, Default)]
pub struct PromptRegistry {
    prompts: Vec<Prompt>,
}

impl PromptRegistry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one prompt, replacing any earlier one of the same name.
    pub fn register(&mut self, prompt: Prompt) {
        self.prompts.retain(|existing| existing.name != prompt.name);
        self.prompts.push(prompt);
    }

    /// All registered prompts, for `prompts/list`.
    #[must_use]
    pub fn list(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Looks up one prompt by name, for `prompts/get`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|prompt| prompt.name == name)
    }
}
