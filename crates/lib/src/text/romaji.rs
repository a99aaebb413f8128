//! # Japanese to Romaji
//!
//! Character-by-character transliteration of hiragana, katakana and a bounded
//! set of common kanji into Hepburn-style romaji, used to build URL slugs for
//! tag names such as `自己啓発` → `jikokeihatsu`.
//!
//! Kanji are read one character at a time with a single fixed reading, so the
//! output is a stable identifier rather than a faithful pronunciation.

/// Transliterates `text` to lowercase romaji.
///
/// ASCII letters and digits pass through lowercased; full-width ASCII is
/// folded to half-width; whitespace and punctuation become a single space.
/// Returns `None` if the text contains a character with no known mapping.
pub fn to_romaji(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().map(normalize_char).collect();
    let mut out = String::with_capacity(text.len() * 2);
    let mut pending_sokuon = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_ascii_alphanumeric() {
            pending_sokuon = false;
            out.push(c.to_ascii_lowercase());
            i += 1;
            continue;
        }

        if is_separator(c) {
            pending_sokuon = false;
            if !out.ends_with(' ') {
                out.push(' ');
            }
            i += 1;
            continue;
        }

        if c == 'っ' {
            pending_sokuon = true;
            i += 1;
            continue;
        }

        if c == 'ー' {
            if let Some(vowel) = out.chars().last().filter(|v| "aeiou".contains(*v)) {
                out.push(vowel);
            }
            i += 1;
            continue;
        }

        let syllable = if let Some(base) = kana(c) {
            // Combine with a following small kana (yōon or extended kana).
            let next = chars.get(i + 1).copied();
            let takes_yoon = base.len() > 1 && base.ends_with('i');
            if let Some(small) = next.and_then(small_y).filter(|_| takes_yoon) {
                i += 1;
                yoon(base, small)
            } else if let Some(vowel) = next.and_then(small_vowel) {
                i += 1;
                extended(base, vowel)
            } else {
                base.to_string()
            }
        } else if let Some(vowel) = small_vowel(c).or_else(|| small_y(c)) {
            // A stray small kana reads as its full-size counterpart.
            vowel.to_string()
        } else if let Some(reading) = kanji(c) {
            reading.to_string()
        } else {
            return None;
        };

        if pending_sokuon {
            if let Some(first) = syllable.chars().next() {
                if syllable.starts_with("ch") {
                    out.push('t');
                } else if !"aeiou".contains(first) {
                    out.push(first);
                }
            }
            pending_sokuon = false;
        }
        out.push_str(&syllable);
        i += 1;
    }

    Some(out.trim().to_string())
}

/// Folds katakana to hiragana and full-width ASCII to half-width.
fn normalize_char(c: char) -> char {
    match c {
        // Katakana ァ..ヶ share the hiragana layout, 0x60 code points higher.
        'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        '！'..='～' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        '\u{3000}' => ' ',
        _ => c,
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || c.is_ascii_punctuation()
        || matches!(
            c,
            '、' | '。' | '・' | '「' | '」' | '『' | '』' | '（' | '）' | '〜' | '…' | '【' | '】' | '〈' | '〉'
        )
}

fn small_y(c: char) -> Option<&'static str> {
    match c {
        'ゃ' => Some("ya"),
        'ゅ' => Some("yu"),
        'ょ' => Some("yo"),
        _ => None,
    }
}

fn small_vowel(c: char) -> Option<&'static str> {
    match c {
        'ぁ' => Some("a"),
        'ぃ' => Some("i"),
        'ぅ' => Some("u"),
        'ぇ' => Some("e"),
        'ぉ' => Some("o"),
        'ゎ' => Some("wa"),
        _ => None,
    }
}

/// `き` + `ゃ` → `kya`, `し` + `ゅ` → `shu`, `ぢ` + `ょ` → `jo`.
fn yoon(base: &str, small: &str) -> String {
    let stem = &base[..base.len() - 1];
    let vowel = &small[1..];
    match stem {
        "sh" | "ch" | "j" => format!("{stem}{vowel}"),
        _ => format!("{stem}y{vowel}"),
    }
}

/// `ふ` + `ぁ` → `fa`, `て` + `ぃ` → `ti`, `う` + `ぃ` → `wi`, `ゔ` + `ぁ` → `va`.
fn extended(base: &str, vowel: &str) -> String {
    if base == "u" {
        return format!("w{vowel}");
    }
    let stem = base.trim_end_matches(['a', 'i', 'u', 'e', 'o']);
    if stem.is_empty() {
        format!("{base}{vowel}")
    } else {
        format!("{stem}{vowel}")
    }
}

#[rustfmt::skip]
fn kana(c: char) -> Option<&'static str> {
    let romaji = match c {
        'あ' => "a", 'い' => "i", 'う' => "u", 'え' => "e", 'お' => "o",
        'か' => "ka", 'き' => "ki", 'く' => "ku", 'け' => "ke", 'こ' => "ko",
        'が' => "ga", 'ぎ' => "gi", 'ぐ' => "gu", 'げ' => "ge", 'ご' => "go",
        'さ' => "sa", 'し' => "shi", 'す' => "su", 'せ' => "se", 'そ' => "so",
        'ざ' => "za", 'じ' => "ji", 'ず' => "zu", 'ぜ' => "ze", 'ぞ' => "zo",
        'た' => "ta", 'ち' => "chi", 'つ' => "tsu", 'て' => "te", 'と' => "to",
        'だ' => "da", 'ぢ' => "ji", 'づ' => "zu", 'で' => "de", 'ど' => "do",
        'な' => "na", 'に' => "ni", 'ぬ' => "nu", 'ね' => "ne", 'の' => "no",
        'は' => "ha", 'ひ' => "hi", 'ふ' => "fu", 'へ' => "he", 'ほ' => "ho",
        'ば' => "ba", 'び' => "bi", 'ぶ' => "bu", 'べ' => "be", 'ぼ' => "bo",
        'ぱ' => "pa", 'ぴ' => "pi", 'ぷ' => "pu", 'ぺ' => "pe", 'ぽ' => "po",
        'ま' => "ma", 'み' => "mi", 'む' => "mu", 'め' => "me", 'も' => "mo",
        'や' => "ya", 'ゆ' => "yu", 'よ' => "yo",
        'ら' => "ra", 'り' => "ri", 'る' => "ru", 'れ' => "re", 'ろ' => "ro",
        'わ' => "wa", 'ゐ' => "i", 'ゑ' => "e", 'を' => "o", 'ん' => "n",
        'ゔ' => "vu", 'ゕ' => "ka", 'ゖ' => "ke",
        _ => return None,
    };
    Some(romaji)
}

/// A fixed single reading for kanji common in book genres and tag names.
#[rustfmt::skip]
fn kanji(c: char) -> Option<&'static str> {
    let romaji = match c {
        '本' => "hon", '読' => "doku", '書' => "sho", '小' => "shou", '説' => "setsu",
        '文' => "bun", '学' => "gaku", '歴' => "reki", '史' => "shi", '哲' => "tetsu",
        '経' => "kei", '済' => "zai", '営' => "ei", '心' => "shin", '理' => "ri",
        '科' => "ka", '技' => "gi", '術' => "jutsu", '自' => "ji", '己' => "ko",
        '啓' => "kei", '発' => "hatsu", '芸' => "gei", '漫' => "man", '画' => "ga",
        '詩' => "shi", '歌' => "ka", '料' => "ryou", '健' => "ken", '康' => "kou",
        '育' => "iku", '児' => "ji", '教' => "kyou", '政' => "sei", '治' => "ji",
        '社' => "sha", '会' => "kai", '数' => "suu", '物' => "butsu", '語' => "go",
        '英' => "ei", '日' => "nichi", '古' => "ko", '典' => "ten", '美' => "bi",
        '旅' => "ryo", '行' => "kou", '宗' => "shuu", '論' => "ron", '法' => "hou",
        '律' => "ritsu", '医' => "i", '生' => "sei", '命' => "mei", '宇' => "u",
        '宙' => "chuu", '人' => "jin", '間' => "kan", '思' => "shi", '想' => "sou",
        '実' => "jitsu", '用' => "you", '入' => "nyuu", '門' => "mon", '新' => "shin",
        '絵' => "e", '伝' => "den", '記' => "ki", '推' => "sui", '恋' => "ren",
        '愛' => "ai", '仕' => "shi", '事' => "ji", '投' => "tou", '資' => "shi",
        '金' => "kin", '融' => "yuu", '計' => "kei", '算' => "san", '機' => "ki",
        '情' => "jou", '報' => "hou", '工' => "kou", '設' => "setsu", '業' => "gyou",
        '戦' => "sen", '略' => "ryaku", '習' => "shuu", '慣' => "kan", '時' => "ji",
        '代' => "dai", '界' => "kai", '世' => "se", '国' => "koku", '際' => "sai",
        '環' => "kan", '境' => "kyou", '化' => "ka", '性' => "sei", '的' => "teki",
        '力' => "ryoku", '方' => "hou", '大' => "dai", '全' => "zen", '集' => "shuu",
        '作' => "saku", '品' => "hin", '家' => "ka", '族' => "zoku", '子' => "ko",
        '女' => "jo", '男' => "dan", '私' => "shi", '東' => "tou", '西' => "sei",
        '京' => "kyou", '都' => "to", '道' => "dou", '楽' => "raku", '音' => "on",
        '食' => "shoku", '酒' => "shu", '茶' => "cha", '花' => "ka", '山' => "san",
        '川' => "sen", '海' => "kai", '空' => "kuu", '星' => "sei", '月' => "getsu",
        '火' => "ka", '水' => "sui", '木' => "moku", '土' => "do", '年' => "nen",
        '開' => "kai", '話' => "wa", '短' => "tan", '編' => "hen", '長' => "chou",
        '名' => "mei", '著' => "cho", '考' => "kou", '知' => "chi", '識' => "shiki",
        '言' => "gen", '葉' => "you", '翻' => "hon", '訳' => "yaku",
        _ => return None,
    };
    Some(romaji)
}

/// Builds a URL slug for a tag name.
///
/// The romaji form is lowercased, reduced to `[a-z0-9-]` and separators are
/// collapsed. Names with unmappable characters (or that reduce to nothing)
/// fall back to `tag-` plus the first 8 hex digits of the name's MD5 digest,
/// so every name still gets a stable slug.
pub fn slugify(name: &str) -> String {
    let trimmed = name.trim();
    let romaji = match to_romaji(trimmed) {
        Some(r) => r,
        None => return hash_slug(trimmed),
    };

    let mut slug = String::with_capacity(romaji.len());
    for c in romaji.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();

    if slug.is_empty() {
        hash_slug(trimmed)
    } else {
        slug
    }
}

fn hash_slug(name: &str) -> String {
    let digest = format!("{:x}", md5::compute(name.as_bytes()));
    format!("tag-{}", &digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hiragana_and_katakana() {
        assert_eq!(to_romaji("ほん").as_deref(), Some("hon"));
        assert_eq!(to_romaji("ビジネス").as_deref(), Some("bijinesu"));
        assert_eq!(to_romaji("ミステリー").as_deref(), Some("misuterii"));
    }

    #[test]
    fn digraphs_and_gemination() {
        assert_eq!(to_romaji("きょうしつ").as_deref(), Some("kyoushitsu"));
        assert_eq!(to_romaji("しゃしん").as_deref(), Some("shashin"));
        assert_eq!(to_romaji("ざっし").as_deref(), Some("zasshi"));
        assert_eq!(to_romaji("まっちゃ").as_deref(), Some("matcha"));
        assert_eq!(to_romaji("ファンタジー").as_deref(), Some("fantajii"));
    }

    #[test]
    fn kanji_are_read_per_character() {
        assert_eq!(to_romaji("自己啓発").as_deref(), Some("jikokeihatsu"));
        assert_eq!(to_romaji("歴史小説").as_deref(), Some("rekishishousetsu"));
    }

    #[test]
    fn unknown_characters_yield_none() {
        assert_eq!(to_romaji("鬱"), None);
        assert_eq!(to_romaji("📚"), None);
    }

    #[test]
    fn slugs_are_ascii_and_collapsed() {
        assert_eq!(slugify("SF"), "sf");
        assert_eq!(slugify("  ビジネス・経済 "), "bijinesu-keizai");
        assert_eq!(slugify("Ｒｕｓｔ 入門"), "rust-nyuumon");
        assert_eq!(slugify("C++"), "c");
    }

    #[test]
    fn unmappable_names_fall_back_to_hash() {
        let slug = slugify("鬱の本");
        assert!(slug.starts_with("tag-"));
        assert_eq!(slug.len(), "tag-".len() + 8);
        assert_eq!(slug, slugify("鬱の本"), "fallback must be deterministic");
        assert!(slugify("!!!").starts_with("tag-"));
    }
}
