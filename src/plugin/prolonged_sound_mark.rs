use std::{collections::HashSet, sync::Arc};

use crate::{
    character_category::{CategoryType, CharacterCategory},
    input_text::InputTextBuilder,
};

/// Collapses runs of two or more prolonged sound marks (`ーーー` -> `ー`).
///
/// Marks are the PROLONGED_SOUND_MARK category unless an explicit set is
/// given. A run is replaced by `replacement_symbol`, or by its first mark
/// when none is set; the kept mark maps to the span of the whole run.
#[derive(Debug, Clone)]
pub struct ProlongedSoundMarkPlugin {
    character_category: Arc<CharacterCategory>,
    marks: Option<HashSet<char>>,
    replacement_symbol: Option<char>,
}

impl ProlongedSoundMarkPlugin {
    pub fn new(character_category: Arc<CharacterCategory>) -> Self {
        ProlongedSoundMarkPlugin {
            character_category,
            marks: None,
            replacement_symbol: None,
        }
    }

    pub fn with_marks(mut self, marks: impl IntoIterator<Item = char>) -> Self {
        self.marks = Some(marks.into_iter().collect());
        self
    }

    pub fn with_replacement_symbol(mut self, symbol: char) -> Self {
        self.replacement_symbol = Some(symbol);
        self
    }

    fn is_mark(&self, c: char) -> bool {
        match &self.marks {
            Some(marks) => marks.contains(&c),
            None => self
                .character_category
                .has(c, CategoryType::ProlongedSoundMark),
        }
    }

    pub fn rewrite(&self, builder: &mut InputTextBuilder) {
        let chars: Vec<char> = builder.chars().collect();
        let mut rewrites = Vec::new();

        let mut i = 0;
        while i < chars.len() {
            if !self.is_mark(chars[i]) {
                i += 1;
                continue;
            }

            let start = i;
            while i < chars.len() && self.is_mark(chars[i]) {
                i += 1;
            }

            if i - start > 1 {
                let symbol = self.replacement_symbol.unwrap_or(chars[start]);
                rewrites.push((start..i, symbol.to_string()));
            }
        }

        builder.replace_all(rewrites);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin() -> ProlongedSoundMarkPlugin {
        ProlongedSoundMarkPlugin::new(CharacterCategory::default_shared())
    }

    fn rewrite(
        plugin: &ProlongedSoundMarkPlugin,
        text: &str,
    ) -> (String, Vec<std::ops::Range<usize>>) {
        let mut builder = InputTextBuilder::new(text);
        plugin.rewrite(&mut builder);
        let spans = (0..builder.len())
            .map(|i| builder.original_offset_of(i).unwrap())
            .collect();
        (builder.text(), spans)
    }

    #[test]
    fn test_collapse_run() {
        let (text, spans) = rewrite(&plugin(), "うわーーーい");
        assert_eq!(text, "うわーい");
        assert_eq!(spans, vec![0..3, 3..6, 6..15, 15..18]);
    }

    #[test]
    fn test_single_mark_is_untouched() {
        assert_eq!(rewrite(&plugin(), "ラーメン").0, "ラーメン");
        assert_eq!(rewrite(&plugin(), "ー").0, "ー");
    }

    #[test]
    fn test_runs_at_both_ends() {
        assert_eq!(rewrite(&plugin(), "ーーあーー").0, "ーあー");
    }

    #[test]
    fn test_mixed_run_keeps_first_mark() {
        assert_eq!(rewrite(&plugin(), "あ〜ーー").0, "あ〜");
    }

    #[test]
    fn test_replacement_symbol() {
        let plugin = plugin().with_replacement_symbol('ー');
        assert_eq!(rewrite(&plugin, "あ〜〜").0, "あー");
        assert_eq!(rewrite(&plugin, "あ〜").0, "あ〜");
    }

    #[test]
    fn test_explicit_marks() {
        let plugin = plugin().with_marks(['〜']);
        assert_eq!(rewrite(&plugin, "あ〜〜ーー").0, "あ〜ーー");
    }
}
