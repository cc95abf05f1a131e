use std::ops::Range;

use tracing::trace;

use super::NormalizedText;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    fn at(offset: usize) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }
}

/// Mutable text under rewriting.
///
/// Positions are codepoint indices into the current text. Every codepoint
/// carries the byte span of the original input it was derived from, so the
/// map and the text can never get out of step.
#[derive(Debug, Clone)]
pub struct InputTextBuilder<'a> {
    original: &'a str,
    chars: Vec<(char, Span)>,
}

impl<'a> InputTextBuilder<'a> {
    pub fn new(original: &'a str) -> Self {
        let chars = original
            .char_indices()
            .map(|(i, c)| {
                (
                    c,
                    Span {
                        start: i,
                        end: i + c.len_utf8(),
                    },
                )
            })
            .collect();

        InputTextBuilder { original, chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().map(|&(c, _)| c)
    }

    pub fn text(&self) -> String {
        self.chars().collect()
    }

    /// Byte span of the original input that position `index` derives from.
    pub fn original_offset_of(&self, index: usize) -> Option<Range<usize>> {
        self.chars
            .get(index)
            .map(|&(_, span)| span.start..span.end)
    }

    /// Replaces the codepoints in `range` by `replacement`.
    ///
    /// Every new codepoint maps to the union of the replaced spans. An empty
    /// `replacement` deletes the range.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn replace(&mut self, range: Range<usize>, replacement: &str) {
        assert!(
            range.start <= range.end && range.end <= self.chars.len(),
            "Invalid range {:?} for text of length {}",
            range,
            self.chars.len()
        );

        let span = if range.is_empty() {
            // 挿入位置の直前 (なければ直後) の境界に幅 0 で対応させる
            match (range.start.checked_sub(1), self.chars.get(range.start)) {
                (Some(prev), _) => Span::at(self.chars[prev].1.end),
                (None, Some(&(_, next))) => Span::at(next.start),
                (None, None) => Span::at(0),
            }
        } else {
            Span {
                start: self.chars[range.start].1.start,
                end: self.chars[range.end - 1].1.end,
            }
        };

        trace!(
            "replace {:?} ({:?}) with {:?}",
            range,
            &self.original[span.start..span.end],
            replacement
        );

        self.chars
            .splice(range, replacement.chars().map(|c| (c, span)));
    }

    /// Applies non-overlapping rewrites given in ascending order of position,
    /// all expressed against the current text.
    pub fn replace_all(&mut self, rewrites: Vec<(Range<usize>, String)>) {
        debug_assert!(rewrites
            .windows(2)
            .all(|w| w[0].0.end <= w[1].0.start));

        // 後ろから適用すれば前方の位置はずれない
        for (range, replacement) in rewrites.into_iter().rev() {
            self.replace(range, &replacement);
        }
    }

    pub fn build(self) -> NormalizedText {
        let (text, spans): (String, Vec<Span>) = self.chars.into_iter().unzip();
        NormalizedText::new(
            self.original.to_owned(),
            text,
            spans.into_iter().map(|s| s.start..s.end).collect(),
        )
    }
}
