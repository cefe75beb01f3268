/// A selectable model, shown in the `/model` menu.
pub struct ModelPreset {
    /// Model identifier for the API
    pub name: &'static str,
    /// User-friendly display name
    pub label: &'static str,
    /// When to use this model
    pub description: &'static str,
}

pub const DEFAULT_MODEL: &str = "grok-code-fast-1";

/// Available model presets. Adding an entry here is enough for it to appear
/// in the menu.
pub const MODEL_PRESETS: &[ModelPreset] = &[
    ModelPreset {
        name: "grok-code-fast-1",
        label: "Grok Code Fast",
        description: "Optimized for fast coding tasks with balanced performance",
    },
    ModelPreset {
        name: "grok-2-latest",
        label: "Grok 2 Latest",
        description: "Latest Grok 2 model with enhanced reasoning capabilities",
    },
    ModelPreset {
        name: "grok-2-1212",
        label: "Grok 2 (Dec 2024)",
        description: "Grok 2 December 2024 snapshot with improved accuracy",
    },
    ModelPreset {
        name: "grok-beta",
        label: "Grok Beta",
        description: "Beta version with experimental features and capabilities",
    },
];

pub fn find_preset(name: &str) -> Option<&'static ModelPreset> {
    MODEL_PRESETS.iter().find(|preset| preset.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_is_a_preset() {
        assert!(find_preset(DEFAULT_MODEL).is_some());
    }

    #[test]
    fn test_unknown_model() {
        assert!(find_preset("gpt-4o").is_none());
    }
}
