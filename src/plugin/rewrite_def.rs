use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::Arc,
};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{read_resource, NormalizerError, NormalizerResult};

static DEFAULT_REWRITE_DEF: &str = include_str!("../resources/rewrite.def");

static DEFAULT_REWRITE: Lazy<Arc<RewriteDef>> = Lazy::new(|| {
    Arc::new(RewriteDef::parse(DEFAULT_REWRITE_DEF).expect("embedded rewrite.def is malformed"))
});

/// Tables driving [`DefaultPlugin`](super::DefaultPlugin).
///
/// - one column: a character that is only lower-cased, never NFKC-normalized
/// - two columns: `FROM TO`, replaced before any normalization, longest
///   match first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteDef {
    ignore_normalize: HashSet<char>,
    replace: HashMap<String, String>,
    // replace のキーの最大文字数
    max_key_length: usize,
}

impl RewriteDef {
    pub fn default_shared() -> Arc<RewriteDef> {
        Arc::clone(&DEFAULT_REWRITE)
    }

    pub fn load(path: &Path) -> NormalizerResult<RewriteDef> {
        debug!("Loading rewrite definition from {}", path.display());
        Self::parse(&read_resource(path)?)
    }

    pub fn parse(def: &str) -> NormalizerResult<RewriteDef> {
        let mut rewrite = RewriteDef::default();

        for (i, line) in def.lines().enumerate() {
            let error = |reason: String| NormalizerError::MalformedRewriteResource {
                line: i + 1,
                reason,
            };

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let cols: Vec<&str> = line.split_whitespace().collect();
            match cols[..] {
                [c] => {
                    let mut chars = c.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => {
                            rewrite.ignore_normalize.insert(c);
                        }
                        _ => return Err(error(format!("{:?} is not a character", c))),
                    }
                }

                [from, to] => {
                    if rewrite.replace.contains_key(from) {
                        return Err(error(format!("{:?} is already defined", from)));
                    }
                    rewrite.max_key_length = rewrite.max_key_length.max(from.chars().count());
                    rewrite.replace.insert(from.to_owned(), to.to_owned());
                }

                _ => return Err(error(format!("Invalid format: {:?}", line))),
            }
        }

        Ok(rewrite)
    }

    pub fn max_key_length(&self) -> usize {
        self.max_key_length
    }

    pub fn replacement(&self, key: &str) -> Option<&str> {
        self.replace.get(key).map(|s| s.as_str())
    }

    // s がちょうど 1 文字で、正規化対象外か
    pub fn ignores(&self, s: &str) -> bool {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.ignore_normalize.contains(&c),
            _ => false,
        }
    }
}
