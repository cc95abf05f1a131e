use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::input_text::InputTextBuilder;

use super::rewrite_def::RewriteDef;

/// Canonicalizes width and compatibility variants.
///
/// For each position, in order:
/// 1. the longest key of the replace table starting there is replaced
///    (e.g. `ｶﾞ` -> `ガ`, `ウ゛` -> `ヴ`);
/// 2. otherwise the codepoint is lower-cased, and unless the lower-cased form
///    is in the ignore table, NFKC-normalized and lower-cased again
///    (`℃` -> `°c`, `№` -> `no`).
///
/// A merge key cut off by the end of the text does not match, so its base
/// character goes through step 2 alone.
#[derive(Debug, Clone)]
pub struct DefaultPlugin {
    rewrite_def: Arc<RewriteDef>,
}

impl DefaultPlugin {
    pub fn new(rewrite_def: Arc<RewriteDef>) -> Self {
        DefaultPlugin { rewrite_def }
    }

    pub fn rewrite(&self, builder: &mut InputTextBuilder) {
        let chars: Vec<char> = builder.chars().collect();
        let mut rewrites = Vec::new();

        let mut i = 0;
        while i < chars.len() {
            if let Some((len, replacement)) = self.longest_replacement(&chars[i..]) {
                rewrites.push((i..(i + len), replacement.to_owned()));
                i += len;
                continue;
            }

            let original = chars[i];
            let lower: String = original.to_lowercase().collect();
            let normalized = if self.rewrite_def.ignores(&lower) {
                lower
            } else {
                // NFKC は大文字を生むことがある
                lower.nfkc().flat_map(char::to_lowercase).collect()
            };

            if normalized.chars().ne(std::iter::once(original)) {
                rewrites.push((i..(i + 1), normalized));
            }
            i += 1;
        }

        builder.replace_all(rewrites);
    }

    fn longest_replacement(&self, chars: &[char]) -> Option<(usize, &str)> {
        let max = self.rewrite_def.max_key_length().min(chars.len());
        (1..=max).rev().find_map(|len| {
            let key: String = chars[..len].iter().collect();
            self.rewrite_def
                .replacement(&key)
                .map(|replacement| (len, replacement))
        })
    }
}
