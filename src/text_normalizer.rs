use std::sync::Arc;

use tracing::debug;

use crate::{
    character_category::CharacterCategory,
    error::NormalizerResult,
    grammar::{Dictionary, Grammar},
    input_text::{InputTextBuilder, NormalizedText},
    plugin::{InputTextPlugin, PluginConfig},
};

/// Text normalizer equivalent to the one applied before tokenization.
///
/// The plugin chain is built once and is read-only afterwards, so one
/// normalizer can be shared between threads.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    character_category: Option<Arc<CharacterCategory>>,
    plugins: Vec<InputTextPlugin>,
}

impl TextNormalizer {
    /// From a grammar and an explicit plugin list.
    pub fn with_plugins(grammar: &Grammar, plugins: &[PluginConfig]) -> NormalizerResult<Self> {
        let plugins = plugins
            .iter()
            .map(|config| config.build(grammar))
            .collect::<NormalizerResult<Vec<_>>>()?;

        debug!(
            "Text normalizer chain: {:?}",
            plugins.iter().map(|p| p.name()).collect::<Vec<_>>()
        );

        Ok(TextNormalizer {
            character_category: grammar.character_category().cloned(),
            plugins,
        })
    }

    /// From a grammar alone, with the grammar's default chain.
    pub fn new(grammar: &Grammar) -> NormalizerResult<Self> {
        Self::with_plugins(grammar, &grammar.default_input_text_plugins())
    }

    /// With the grammar and the plugin chain configured for `dictionary`.
    pub fn from_dictionary(dictionary: &impl Dictionary) -> NormalizerResult<Self> {
        Self::with_plugins(dictionary.grammar(), dictionary.input_text_plugins())
    }

    /// The embedded character definition with the default chain
    /// `[Default, ProlongedSoundMark, IgnoreYomigana]`.
    pub fn default_normalizer() -> NormalizerResult<Self> {
        let grammar = Grammar::new().with_character_category(CharacterCategory::default_shared());
        Self::new(&grammar)
    }

    pub fn character_category(&self) -> Option<&Arc<CharacterCategory>> {
        self.character_category.as_ref()
    }

    pub fn plugins(&self) -> &[InputTextPlugin] {
        &self.plugins
    }

    /// Normalize given text
    pub fn normalize(&self, text: &str) -> String {
        self.normalize_with_offsets(text).into_string()
    }

    /// Normalizes `text`, keeping the mapping back to its byte offsets.
    pub fn normalize_with_offsets(&self, text: &str) -> NormalizedText {
        let mut builder = InputTextBuilder::new(text);
        for plugin in &self.plugins {
            plugin.rewrite(&mut builder);
        }
        builder.build()
    }
}
