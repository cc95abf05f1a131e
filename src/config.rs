use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{read_resource, NormalizerResult},
    plugin::PluginConfig,
};

/// Normalizer settings read from a JSON file.
///
/// ```json
/// {
///   "characterDefinitionFile": "char.def",
///   "inputTextPlugin": [
///     { "type": "Default" },
///     { "type": "ProlongedSoundMark", "replacementSymbol": "ー" },
///     { "type": "IgnoreYomigana", "maxYomiganaLength": 4 }
///   ]
/// }
/// ```
///
/// Missing `characterDefinitionFile` means the embedded definition, missing
/// `inputTextPlugin` means the default chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_definition_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_text_plugin: Option<Vec<PluginConfig>>,
}

impl Config {
    /// Reads a config file. Relative resource paths in it are taken relative
    /// to the directory of the file.
    pub fn load(path: &Path) -> NormalizerResult<Config> {
        debug!("Loading config from {}", path.display());

        let mut config = Self::from_json(&read_resource(path)?)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_json(json: &str) -> NormalizerResult<Config> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(path) = &mut self.character_definition_file {
            *path = base.join(&*path);
        }

        for plugin in self.input_text_plugin.iter_mut().flatten() {
            if let PluginConfig::Default {
                rewrite_def: Some(path),
            } = plugin
            {
                *path = base.join(&*path);
            }
        }
    }
}
