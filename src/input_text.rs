// 書き換え中のテキストと、元テキストへのオフセット対応
//
// 書き換え後の各文字は、元テキスト上のバイト範囲を 1 つ持つ:
// - 縮約 (n 文字 -> 1 文字) は置換範囲全体を覆う 1 つの範囲になる
// - 展開 (1 文字 -> n 文字) は各文字が元の 1 文字の範囲を共有する
// - 削除された文字の範囲はどの出力位置からも参照されない

mod builder;
mod normalized_text;

pub use builder::InputTextBuilder;
pub use normalized_text::NormalizedText;
