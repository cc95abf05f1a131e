// 入力テキストの書き換え規則
//
// 適用順に意味がある: Default で幅・互換文字を揃えてから
// ProlongedSoundMark, IgnoreYomigana を適用する

mod default;
mod ignore_yomigana;
mod prolonged_sound_mark;
pub mod rewrite_def;

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{NormalizerError, NormalizerResult},
    grammar::Grammar,
    input_text::InputTextBuilder,
};

pub use default::DefaultPlugin;
pub use ignore_yomigana::IgnoreYomiganaPlugin;
pub use prolonged_sound_mark::ProlongedSoundMarkPlugin;
pub use rewrite_def::RewriteDef;

/// Configuration of one plugin of the chain, as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum PluginConfig {
    Default {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rewrite_def: Option<PathBuf>,
    },
    ProlongedSoundMark {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prolonged_sound_marks: Option<Vec<char>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        replacement_symbol: Option<char>,
    },
    IgnoreYomigana {
        #[serde(default = "default_left_brackets")]
        left_brackets: Vec<char>,
        #[serde(default = "default_right_brackets")]
        right_brackets: Vec<char>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_yomigana_length: Option<usize>,
    },
}

fn default_left_brackets() -> Vec<char> {
    vec!['(', '（']
}

fn default_right_brackets() -> Vec<char> {
    vec![')', '）']
}

impl PluginConfig {
    pub fn default_plugin() -> Self {
        Self::Default { rewrite_def: None }
    }

    pub fn prolonged_sound_mark() -> Self {
        Self::ProlongedSoundMark {
            prolonged_sound_marks: None,
            replacement_symbol: None,
        }
    }

    pub fn ignore_yomigana() -> Self {
        Self::IgnoreYomigana {
            left_brackets: default_left_brackets(),
            right_brackets: default_right_brackets(),
            max_yomigana_length: None,
        }
    }

    /// `[Default, ProlongedSoundMark, IgnoreYomigana]`
    pub fn default_chain() -> Vec<Self> {
        vec![
            Self::default_plugin(),
            Self::prolonged_sound_mark(),
            Self::ignore_yomigana(),
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default { .. } => "Default",
            Self::ProlongedSoundMark { .. } => "ProlongedSoundMark",
            Self::IgnoreYomigana { .. } => "IgnoreYomigana",
        }
    }

    /// Builds the plugin. Fails if the grammar has no character category
    /// table, since every plugin classifies characters through it.
    pub fn build(&self, grammar: &Grammar) -> NormalizerResult<InputTextPlugin> {
        let character_category = grammar
            .character_category()
            .map(Arc::clone)
            .ok_or(NormalizerError::MissingCharacterCategory {
                plugin: self.name(),
            })?;

        debug!("Building {} plugin: {:?}", self.name(), self);

        let plugin = match self {
            Self::Default { rewrite_def } => {
                let rewrite_def = match rewrite_def {
                    Some(path) => Arc::new(RewriteDef::load(path)?),
                    None => RewriteDef::default_shared(),
                };
                InputTextPlugin::Default(DefaultPlugin::new(rewrite_def))
            }

            Self::ProlongedSoundMark {
                prolonged_sound_marks,
                replacement_symbol,
            } => {
                let mut plugin = ProlongedSoundMarkPlugin::new(character_category);
                if let Some(marks) = prolonged_sound_marks {
                    plugin = plugin.with_marks(marks.iter().copied());
                }
                if let Some(symbol) = replacement_symbol {
                    plugin = plugin.with_replacement_symbol(*symbol);
                }
                InputTextPlugin::ProlongedSoundMark(plugin)
            }

            Self::IgnoreYomigana {
                left_brackets,
                right_brackets,
                max_yomigana_length,
            } => {
                let mut plugin = IgnoreYomiganaPlugin::new(
                    character_category,
                    left_brackets.iter().copied(),
                    right_brackets.iter().copied(),
                );
                if let Some(length) = max_yomigana_length {
                    plugin = plugin.with_max_yomigana_length(*length);
                }
                InputTextPlugin::IgnoreYomigana(plugin)
            }
        };

        Ok(plugin)
    }
}

/// A constructed rewrite rule, ready to be applied.
#[derive(Debug, Clone)]
pub enum InputTextPlugin {
    Default(DefaultPlugin),
    ProlongedSoundMark(ProlongedSoundMarkPlugin),
    IgnoreYomigana(IgnoreYomiganaPlugin),
}

impl InputTextPlugin {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default(_) => "Default",
            Self::ProlongedSoundMark(_) => "ProlongedSoundMark",
            Self::IgnoreYomigana(_) => "IgnoreYomigana",
        }
    }

    pub fn rewrite(&self, builder: &mut InputTextBuilder) {
        match self {
            Self::Default(plugin) => plugin.rewrite(builder),
            Self::ProlongedSoundMark(plugin) => plugin.rewrite(builder),
            Self::IgnoreYomigana(plugin) => plugin.rewrite(builder),
        }
    }
}
