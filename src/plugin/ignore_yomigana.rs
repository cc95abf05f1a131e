use std::{collections::HashSet, sync::Arc};

use crate::{
    character_category::{CategoryType, CharacterCategory},
    input_text::InputTextBuilder,
};

/// Removes a katakana reading written in brackets right after kanji
/// (`小鳥遊（タカナシ）` -> `小鳥遊`).
///
/// The bracketed span is removed only if the character before the opening
/// bracket is KANJI and everything up to the closing bracket is KATAKANA.
/// Empty brackets and readings longer than `max_yomigana_length` are kept.
#[derive(Debug, Clone)]
pub struct IgnoreYomiganaPlugin {
    character_category: Arc<CharacterCategory>,
    left_brackets: HashSet<char>,
    right_brackets: HashSet<char>,
    max_yomigana_length: Option<usize>,
}

impl IgnoreYomiganaPlugin {
    pub fn new(
        character_category: Arc<CharacterCategory>,
        left_brackets: impl IntoIterator<Item = char>,
        right_brackets: impl IntoIterator<Item = char>,
    ) -> Self {
        IgnoreYomiganaPlugin {
            character_category,
            left_brackets: left_brackets.into_iter().collect(),
            right_brackets: right_brackets.into_iter().collect(),
            max_yomigana_length: None,
        }
    }

    pub fn with_max_yomigana_length(mut self, length: usize) -> Self {
        self.max_yomigana_length = Some(length);
        self
    }

    pub fn rewrite(&self, builder: &mut InputTextBuilder) {
        let chars: Vec<char> = builder.chars().collect();
        let mut rewrites = Vec::new();

        let mut i = 1;
        while i < chars.len() {
            if self.left_brackets.contains(&chars[i])
                && self.character_category.has(chars[i - 1], CategoryType::Kanji)
            {
                if let Some(end) = self.yomigana_end(&chars, i) {
                    rewrites.push((i..end, String::new()));
                    i = end;
                    continue;
                }
            }
            i += 1;
        }

        builder.replace_all(rewrites);
    }

    // chars[open] の括弧から始まる読み仮名の終端 (閉じ括弧の次) を返す
    fn yomigana_end(&self, chars: &[char], open: usize) -> Option<usize> {
        let mut i = open + 1;
        while i < chars.len() {
            let c = chars[i];
            if self.right_brackets.contains(&c) {
                break;
            }
            if !self.character_category.has(c, CategoryType::Katakana) {
                return None;
            }
            i += 1;
        }

        // 閉じ括弧がない
        if i == chars.len() {
            return None;
        }

        let length = i - open - 1;
        if length == 0 || self.max_yomigana_length.is_some_and(|max| length > max) {
            return None;
        }

        Some(i + 1)
    }
}
