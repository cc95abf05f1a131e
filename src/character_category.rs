use std::{fmt, path::Path, str::FromStr, sync::Arc};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{read_resource, NormalizerError, NormalizerResult};

static DEFAULT_CHAR_DEF: &str = include_str!("resources/char.def");

static DEFAULT_CHARACTER_CATEGORY: Lazy<Arc<CharacterCategory>> = Lazy::new(|| {
    Arc::new(CharacterCategory::parse(DEFAULT_CHAR_DEF).expect("embedded char.def is malformed"))
});

// 文字種
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryType {
    Default,
    Space,
    Kanji,
    Symbol,
    Numeric,
    Alpha,
    Hiragana,
    Katakana,
    KanjiNumeric,
    Greek,
    Cyrillic,
    ProlongedSoundMark,
    User1,
    User2,
    User3,
    User4,
    NoOovBow,
    NoOovBow2,
}

impl CategoryType {
    pub const ALL: [CategoryType; 18] = [
        Self::Default,
        Self::Space,
        Self::Kanji,
        Self::Symbol,
        Self::Numeric,
        Self::Alpha,
        Self::Hiragana,
        Self::Katakana,
        Self::KanjiNumeric,
        Self::Greek,
        Self::Cyrillic,
        Self::ProlongedSoundMark,
        Self::User1,
        Self::User2,
        Self::User3,
        Self::User4,
        Self::NoOovBow,
        Self::NoOovBow2,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Space => "SPACE",
            Self::Kanji => "KANJI",
            Self::Symbol => "SYMBOL",
            Self::Numeric => "NUMERIC",
            Self::Alpha => "ALPHA",
            Self::Hiragana => "HIRAGANA",
            Self::Katakana => "KATAKANA",
            Self::KanjiNumeric => "KANJINUMERIC",
            Self::Greek => "GREEK",
            Self::Cyrillic => "CYRILLIC",
            Self::ProlongedSoundMark => "PROLONGED_SOUND_MARK",
            Self::User1 => "USER1",
            Self::User2 => "USER2",
            Self::User3 => "USER3",
            Self::User4 => "USER4",
            Self::NoOovBow => "NOOOVBOW",
            Self::NoOovBow2 => "NOOOVBOW2",
        }
    }

    fn bit(&self) -> u32 {
        1 << (*self as u32)
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.name() == name)
            .copied()
            .ok_or_else(|| format!("Unknown character category: {}", name))
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`CategoryType`]s. One codepoint may belong to several categories
/// (e.g. `ー` is both KATAKANA and PROLONGED_SOUND_MARK).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CategorySet(u32);

impl CategorySet {
    pub const EMPTY: CategorySet = CategorySet(0);

    pub fn single(category: CategoryType) -> Self {
        CategorySet(category.bit())
    }

    pub fn contains(&self, category: CategoryType) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn insert(&mut self, category: CategoryType) {
        self.0 |= category.bit();
    }

    pub fn union(&self, other: CategorySet) -> CategorySet {
        CategorySet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = CategoryType> + '_ {
        CategoryType::ALL
            .iter()
            .copied()
            .filter(move |c| self.contains(*c))
    }
}

impl FromIterator<CategoryType> for CategorySet {
    fn from_iter<I: IntoIterator<Item = CategoryType>>(iter: I) -> Self {
        let mut set = CategorySet::EMPTY;
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl fmt::Debug for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Codepoint classification loaded from a char.def resource.
///
/// Ranges of the definition are flattened into sorted, disjoint segments so
/// that lookup is a binary search. Codepoints not covered by any range are
/// classified as `{DEFAULT}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterCategory {
    // segments[i] は boundaries[i] <= c < boundaries[i + 1] を表す
    boundaries: Vec<u32>,
    segments: Vec<CategorySet>,
}

impl CharacterCategory {
    /// The embedded default definition, parsed once per process.
    pub fn default_shared() -> Arc<CharacterCategory> {
        Arc::clone(&DEFAULT_CHARACTER_CATEGORY)
    }

    pub fn load(path: &Path) -> NormalizerResult<CharacterCategory> {
        debug!("Loading character definition from {}", path.display());
        Self::parse(&read_resource(path)?)
    }

    pub fn parse(def: &str) -> NormalizerResult<CharacterCategory> {
        let mut ranges = Vec::new();

        for (i, line) in def.lines().enumerate() {
            if let Some(range) = parse_line(line).map_err(|reason| {
                NormalizerError::MalformedCategoryResource {
                    line: i + 1,
                    reason,
                }
            })? {
                ranges.push(range);
            }
        }

        Ok(Self::from_ranges(&ranges))
    }

    fn from_ranges(ranges: &[(u32, u32, CategorySet)]) -> CharacterCategory {
        let mut points: Vec<u32> = ranges
            .iter()
            .flat_map(|&(begin, end, _)| [begin, end + 1])
            .collect();
        points.sort_unstable();
        points.dedup();

        let mut boundaries = Vec::with_capacity(points.len());
        let mut segments: Vec<CategorySet> = Vec::with_capacity(points.len());
        for &point in &points {
            let set = ranges
                .iter()
                .filter(|&&(begin, end, _)| begin <= point && point <= end)
                .fold(CategorySet::EMPTY, |acc, &(_, _, set)| acc.union(set));

            // 隣接する同じ集合の区間は纏める
            if segments.last() == Some(&set) {
                continue;
            }
            boundaries.push(point);
            segments.push(set);
        }

        CharacterCategory {
            boundaries,
            segments,
        }
    }

    /// Categories of `c`. Never empty.
    pub fn classify(&self, c: char) -> CategorySet {
        let u = c as u32;
        let i = self.boundaries.partition_point(|&b| b <= u);
        match i.checked_sub(1).map(|i| self.segments[i]) {
            Some(set) if !set.is_empty() => set,
            _ => CategorySet::single(CategoryType::Default),
        }
    }

    pub fn has(&self, c: char, category: CategoryType) -> bool {
        self.classify(c).contains(category)
    }
}

// 0xSTART[..0xEND] CAT [CAT ...] [# comment]
fn parse_line(line: &str) -> Result<Option<(u32, u32, CategorySet)>, String> {
    static REGEX_RANGE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^0x(?P<begin>[0-9A-Fa-f]+)(?:\.\.0x(?P<end>[0-9A-Fa-f]+))?$").unwrap()
    });

    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut cols = line.split_whitespace();
    let range = match cols.next() {
        Some(range) if range.starts_with("0x") => range,
        // 文字種の定義行は読み飛ばす
        _ => return Ok(None),
    };

    let caps = REGEX_RANGE
        .captures(range)
        .ok_or_else(|| format!("Invalid range: {:?}", range))?;
    let begin = parse_hex(&caps["begin"])?;
    let end = match caps.name("end") {
        Some(end) => parse_hex(end.as_str())?,
        None => begin,
    };
    if begin > end || end > char::MAX as u32 {
        return Err(format!("Invalid range: {:?}", range));
    }

    let categories = cols
        .take_while(|col| !col.starts_with('#'))
        .map(|col| col.parse::<CategoryType>())
        .collect::<Result<CategorySet, _>>()?;
    if categories.is_empty() {
        return Err(format!("No category for range {:?}", range));
    }

    Ok(Some((begin, end, categories)))
}

fn parse_hex(s: &str) -> Result<u32, String> {
    u32::from_str_radix(s, 16).map_err(|e| format!("Invalid codepoint {:?}: {}", s, e))
}
