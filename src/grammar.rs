use std::sync::Arc;

use tracing::debug;

use crate::{
    character_category::CharacterCategory,
    config::Config,
    error::NormalizerResult,
    plugin::PluginConfig,
};

/// The part of a dictionary grammar the normalizer depends on.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    character_category: Option<Arc<CharacterCategory>>,
}

impl Grammar {
    /// A grammar without a character category table.
    pub fn new() -> Self {
        Grammar::default()
    }

    pub fn with_character_category(mut self, character_category: Arc<CharacterCategory>) -> Self {
        self.character_category = Some(character_category);
        self
    }

    pub fn character_category(&self) -> Option<&Arc<CharacterCategory>> {
        self.character_category.as_ref()
    }

    /// The chain used when only a grammar is given.
    pub fn default_input_text_plugins(&self) -> Vec<PluginConfig> {
        PluginConfig::default_chain()
    }
}

/// A dictionary as seen by the normalizer: its grammar and its configured
/// input text plugins.
pub trait Dictionary {
    fn grammar(&self) -> &Grammar;
    fn input_text_plugins(&self) -> &[PluginConfig];
}

/// A [`Dictionary`] assembled from a [`Config`].
#[derive(Debug, Clone)]
pub struct ConfiguredDictionary {
    grammar: Grammar,
    input_text_plugins: Vec<PluginConfig>,
}

impl ConfiguredDictionary {
    pub fn new(grammar: Grammar, input_text_plugins: Vec<PluginConfig>) -> Self {
        ConfiguredDictionary {
            grammar,
            input_text_plugins,
        }
    }

    pub fn from_config(config: &Config) -> NormalizerResult<Self> {
        let character_category = match &config.character_definition_file {
            Some(path) => Arc::new(CharacterCategory::load(path)?),
            None => CharacterCategory::default_shared(),
        };

        let input_text_plugins = config
            .input_text_plugin
            .clone()
            .unwrap_or_else(PluginConfig::default_chain);
        debug!(
            "Configured input text plugins: {:?}",
            input_text_plugins
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
        );

        Ok(Self::new(
            Grammar::new().with_character_category(character_category),
            input_text_plugins,
        ))
    }
}

impl Dictionary for ConfiguredDictionary {
    fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn input_text_plugins(&self) -> &[PluginConfig] {
        &self.input_text_plugins
    }
}
