use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizerError {
    // 文字種定義を必要とするプラグインが、文字種定義のない文法から構築された
    #[error("{plugin} plugin requires a character category table, but the grammar has none")]
    MissingCharacterCategory { plugin: &'static str },

    #[error("Malformed character definition at line {line}: {reason}")]
    MalformedCategoryResource { line: usize, reason: String },

    #[error("Malformed rewrite definition at line {line}: {reason}")]
    MalformedRewriteResource { line: usize, reason: String },

    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] serde_json::Error),
}

pub type NormalizerResult<T> = Result<T, NormalizerError>;

pub(crate) fn read_resource(path: &std::path::Path) -> NormalizerResult<String> {
    std::fs::read_to_string(path).map_err(|source| NormalizerError::Io {
        path: path.to_path_buf(),
        source,
    })
}
