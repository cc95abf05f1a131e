use std::{fmt, ops::Range};

/// Result of normalization: the rewritten text and, for every codepoint of
/// it, the byte span of the original input it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    original: String,
    text: String,
    spans: Vec<Range<usize>>,

    // 正規化後の文字位置 -> バイト位置 (末尾を含むので長さは文字数 + 1)
    byte_offsets: Vec<usize>,
    // 元テキストの文字境界のバイト位置 (末尾を含む)
    original_boundaries: Vec<usize>,
}

impl NormalizedText {
    pub(super) fn new(original: String, text: String, spans: Vec<Range<usize>>) -> Self {
        debug_assert_eq!(text.chars().count(), spans.len());

        let byte_offsets = boundaries(&text);
        let original_boundaries = boundaries(&original);

        NormalizedText {
            original,
            text,
            spans,
            byte_offsets,
            original_boundaries,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Number of codepoints of the normalized text.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Byte span of the original input for the normalized codepoint at
    /// `position`.
    pub fn original_offset_of(&self, position: usize) -> Option<Range<usize>> {
        self.spans.get(position).cloned()
    }

    /// Same as [`original_offset_of`](Self::original_offset_of), in
    /// codepoints of the original input.
    pub fn original_char_offset_of(&self, position: usize) -> Option<Range<usize>> {
        let span = self.original_offset_of(position)?;
        Some(self.original_char_index(span.start)..self.original_char_index(span.end))
    }

    /// Byte range of the original input covered by the normalized codepoint
    /// range `range`. An empty range maps to the boundary it sits on.
    pub fn original_range(&self, range: Range<usize>) -> Option<Range<usize>> {
        if range.start > range.end || range.end > self.spans.len() {
            return None;
        }

        if range.is_empty() {
            let at = match self.spans.get(range.start) {
                Some(span) => span.start,
                None => self.spans.last().map_or(0, |span| span.end),
            };
            return Some(at..at);
        }

        Some(self.spans[range.start].start..self.spans[range.end - 1].end)
    }

    /// Codepoint index of the normalized text starting at byte `offset`, if
    /// `offset` is a character boundary (the end of the text included).
    pub fn char_index_of_byte(&self, offset: usize) -> Option<usize> {
        self.byte_offsets.binary_search(&offset).ok()
    }

    /// Byte offset in the normalized text of codepoint `position`.
    pub fn byte_of_char_index(&self, position: usize) -> Option<usize> {
        self.byte_offsets.get(position).copied()
    }

    fn original_char_index(&self, byte: usize) -> usize {
        // span の両端は常に元テキストの文字境界
        self.original_boundaries.partition_point(|&b| b < byte)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn boundaries(s: &str) -> Vec<usize> {
    s.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .collect()
}
