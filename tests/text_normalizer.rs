use std::{fs, thread};

use anyhow::Result;

use input_text_normalizer::{
    character_category::CharacterCategory,
    config::Config,
    grammar::{ConfiguredDictionary, Dictionary, Grammar},
    plugin::PluginConfig,
    NormalizerError, TextNormalizer,
};

fn dictionary() -> Result<ConfiguredDictionary> {
    Ok(ConfiguredDictionary::from_config(&Config::default())?)
}

static SAMPLES: &[&str] = &[
    "",
    "ÂＢΓД㈱ｶﾞウ゛⼼Ⅲ",
    "うわーーーい",
    "小鳥遊（タカナシ）",
    "小鳥遊(たかなし)",
    "ﾊﾟｰﾃｨｰｰ",
    "㍻のＴｏｋｙｏ（トウキョウ）ーー",
    "ｶ",
    "ｰｰ(ｱ)",
    "漢字（カンジ",
    "℃",
    "㎆",
    "㍱",
    "№",
    "ｶ゛ﾎ゜",
];

#[test]
fn test_instantiation() -> Result<()> {
    let dic = dictionary()?;

    TextNormalizer::from_dictionary(&dic)?;
    TextNormalizer::new(dic.grammar())?;
    TextNormalizer::with_plugins(dic.grammar(), dic.input_text_plugins())?;
    TextNormalizer::default_normalizer()?;

    Ok(())
}

#[test]
fn test_fail_to_instantiate_without_character_category() {
    let grammar = Grammar::new();

    assert!(matches!(
        TextNormalizer::new(&grammar),
        Err(NormalizerError::MissingCharacterCategory { plugin: "Default" })
    ));
    assert!(matches!(
        TextNormalizer::with_plugins(&grammar, &[PluginConfig::ignore_yomigana()]),
        Err(NormalizerError::MissingCharacterCategory {
            plugin: "IgnoreYomigana"
        })
    ));
}

#[test]
fn test_normalize_text() -> Result<()> {
    let tn = TextNormalizer::default_normalizer()?;

    assert_eq!(tn.normalize("ÂＢΓД㈱ｶﾞウ゛⼼Ⅲ"), "âbγд(株)ガヴ⼼ⅲ");

    Ok(())
}

#[test]
fn test_normalize_text_with_default_plugin_only() -> Result<()> {
    let grammar = Grammar::new().with_character_category(CharacterCategory::default_shared());
    let tn = TextNormalizer::with_plugins(&grammar, &[PluginConfig::default_plugin()])?;

    assert_eq!(tn.normalize("ÂＢΓД㈱ｶﾞウ゛⼼Ⅲ"), "âbγд(株)ガヴ⼼ⅲ");
    // Default だけでは長音記号も読み仮名もそのまま
    assert_eq!(tn.normalize("うわーーーい"), "うわーーーい");
    assert_eq!(tn.normalize("小鳥遊（タカナシ）"), "小鳥遊(タカナシ)");

    Ok(())
}

#[test]
fn test_normalize_text_with_default_config() -> Result<()> {
    let dic = dictionary()?;
    let tn = TextNormalizer::from_dictionary(&dic)?;

    let names: Vec<_> = tn.plugins().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["Default", "ProlongedSoundMark", "IgnoreYomigana"]);

    assert_eq!(tn.normalize("ÂＢΓД㈱ｶﾞウ゛⼼Ⅲ"), "âbγд(株)ガヴ⼼ⅲ");
    assert_eq!(tn.normalize("うわーーーい"), "うわーい");
    assert_eq!(tn.normalize("小鳥遊（タカナシ）"), "小鳥遊");

    Ok(())
}

#[test]
fn test_edge_cases() -> Result<()> {
    let tn = TextNormalizer::default_normalizer()?;

    assert_eq!(tn.normalize(""), "");
    assert_eq!(tn.normalize("小鳥遊（たかなし）"), "小鳥遊(たかなし)");
    assert_eq!(tn.normalize("小鳥遊（タカ・ナシ1）"), "小鳥遊(タカ・ナシ1)");
    assert_eq!(tn.normalize("ラーメン"), "ラーメン");
    assert_eq!(tn.normalize("漢字（カンジ"), "漢字(カンジ");
    assert_eq!(tn.normalize("ｶ"), "カ");
    // 半角で書かれていても Default の後なら同じように扱われる
    assert_eq!(tn.normalize("ﾊﾟｰﾃｨｰｰ"), "パーティー");
    assert_eq!(tn.normalize("東京(ﾄｳｷｮｳ)"), "東京");

    Ok(())
}

#[test]
fn test_deterministic() -> Result<()> {
    let tn = TextNormalizer::default_normalizer()?;

    for &sample in SAMPLES {
        assert_eq!(
            tn.normalize_with_offsets(sample),
            tn.normalize_with_offsets(sample)
        );
    }

    Ok(())
}

#[test]
fn test_default_plugin_is_idempotent() -> Result<()> {
    let grammar = Grammar::new().with_character_category(CharacterCategory::default_shared());
    let tn = TextNormalizer::with_plugins(&grammar, &[PluginConfig::default_plugin()])?;

    for &sample in SAMPLES {
        let once = tn.normalize(sample);
        assert_eq!(tn.normalize(&once), once, "{:?}", sample);
    }

    Ok(())
}

#[test]
fn test_offset_map_coverage() -> Result<()> {
    let tn = TextNormalizer::default_normalizer()?;

    for &sample in SAMPLES {
        let normalized = tn.normalize_with_offsets(sample);
        assert_eq!(normalized.original(), sample);
        assert_eq!(normalized.len(), normalized.text().chars().count());

        let mut last = 0..0;
        for i in 0..normalized.len() {
            let span = normalized.original_offset_of(i).unwrap();
            assert!(span.start <= span.end && span.end <= sample.len());
            assert!(sample.is_char_boundary(span.start) && sample.is_char_boundary(span.end));
            assert!(last.start <= span.start && last.end <= span.end, "{:?}", sample);
            last = span;
        }
        assert_eq!(normalized.original_offset_of(normalized.len()), None);
    }

    Ok(())
}

#[test]
fn test_offsets_through_the_chain() -> Result<()> {
    let tn = TextNormalizer::default_normalizer()?;
    let normalized = tn.normalize_with_offsets("ｽｰｰﾌﾟ小鳥遊（タカナシ）㈱");

    assert_eq!(normalized.text(), "スープ小鳥遊(株)");

    // ｽ
    assert_eq!(normalized.original_char_offset_of(0), Some(0..1));
    // ｰｰ -> ー
    assert_eq!(normalized.original_char_offset_of(1), Some(1..3));
    // ﾌﾟ -> プ
    assert_eq!(normalized.original_char_offset_of(2), Some(3..5));
    // 遊 の直後は読み仮名を飛ばして ㈱ に対応する
    assert_eq!(normalized.original_char_offset_of(5), Some(7..8));
    for i in 6..9 {
        assert_eq!(normalized.original_char_offset_of(i), Some(14..15));
    }

    // 小鳥遊 の元テキスト上のバイト範囲
    assert_eq!(normalized.original_range(3..6), Some(15..24));

    Ok(())
}

#[test]
fn test_shared_between_threads() -> Result<()> {
    let tn = TextNormalizer::default_normalizer()?;

    thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| SAMPLES.iter().map(|t| tn.normalize(t)).collect::<Vec<_>>()))
            .collect();
        let expected: Vec<_> = SAMPLES.iter().map(|t| tn.normalize(t)).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });

    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("char.def"),
        "0x4E00..0x9FFF KANJI\n0x30A1..0x30FA KATAKANA\n0x301C PROLONGED_SOUND_MARK\n",
    )?;
    fs::write(dir.path().join("rewrite.def"), "ｶﾞ ガ\n")?;
    fs::write(
        dir.path().join("config.json"),
        r#"{
            "characterDefinitionFile": "char.def",
            "inputTextPlugin": [
                { "type": "Default", "rewriteDef": "rewrite.def" },
                { "type": "ProlongedSoundMark", "replacementSymbol": "ー" },
                { "type": "IgnoreYomigana", "leftBrackets": ["["], "rightBrackets": ["]"] }
            ]
        }"#,
    )?;

    let config = Config::load(&dir.path().join("config.json"))?;
    let dic = ConfiguredDictionary::from_config(&config)?;
    let tn = TextNormalizer::from_dictionary(&dic)?;

    // ⼼ は無視リストにないので NFKC で 心 になる
    assert_eq!(tn.normalize("ｶﾞ⼼"), "ガ心");
    // ー は長音記号として定義されていない
    assert_eq!(tn.normalize("あ〜〜ーー"), "あーーー");
    assert_eq!(tn.normalize("漢字[カンジ](カンジ)"), "漢字(カンジ)");

    Ok(())
}

#[test]
fn test_malformed_character_definition_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("char.def"), "0x4E00..0x9FFF KANJI\n0x3041 KANA\n")?;
    fs::write(
        dir.path().join("config.json"),
        r#"{ "characterDefinitionFile": "char.def" }"#,
    )?;

    let config = Config::load(&dir.path().join("config.json"))?;
    assert!(matches!(
        ConfiguredDictionary::from_config(&config),
        Err(NormalizerError::MalformedCategoryResource { line: 2, .. })
    ));

    Ok(())
}

#[test]
fn test_missing_config_file() {
    assert!(matches!(
        Config::load(std::path::Path::new("/nonexistent/config.json")),
        Err(NormalizerError::Io { .. })
    ));
}
