//! Header normalization: raw header strings to unique identifiers
//!
//! Each raw name is split into lowercase ASCII words, given a placeholder
//! `x` when it would be empty or start with a digit, re-joined in the
//! requested [`CaseStyle`], and finally de-duplicated in first-occurrence
//! order. Output of [`normalize_names`] is a fixed point: normalizing it
//! again returns it unchanged.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::CaseStyle;
use crate::error::Result;
use crate::model::Table;

/// Placeholder word for names that are empty or start with a digit
const PLACEHOLDER: &str = "x";

/// Normalize a sequence of raw headers into unique identifiers
pub fn normalize_names<S: AsRef<str>>(raw_names: &[S], style: CaseStyle) -> Vec<String> {
    let cleaned: Vec<String> = raw_names
        .iter()
        .map(|name| clean_name(name.as_ref(), style))
        .collect();
    let names = dedupe(cleaned, style);

    tracing::debug!(
        columns = names.len(),
        renamed = raw_names
            .iter()
            .zip(&names)
            .filter(|(raw, new)| raw.as_ref() != new.as_str())
            .count(),
        ?style,
        "normalized names"
    );

    names
}

/// Normalize a table's headers
pub fn clean_names(table: &Table, style: CaseStyle) -> Result<Table> {
    let names = normalize_names(&table.names(), style);
    table.with_names(names)
}

/// Clean a single name without de-duplication
pub fn clean_name(raw: &str, style: CaseStyle) -> String {
    let mut words = split_words(raw, style);

    match words.first_mut() {
        None => words.push(PLACEHOLDER.to_string()),
        Some(first) if first.starts_with(|c: char| c.is_ascii_digit()) => {
            first.insert_str(0, PLACEHOLDER);
        }
        Some(_) => {}
    }

    apply_case(&words, style)
}

/// Split a raw header into lowercase ASCII words.
///
/// Non-alphanumeric characters separate words, except quotes which are
/// dropped and `%`/`#` which become words of their own. Accented Latin
/// letters fold to ASCII. Camel styles split every chunk on camelCase
/// boundaries; snake styles only split chunks holding a lowercase letter,
/// so `FIELD1B` stays one word.
fn split_words(raw: &str, style: CaseStyle) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in raw.trim().chars() {
        match c {
            c if c.is_ascii_alphanumeric() => current.push(c),
            '\'' | '"' | '`' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' => {}
            '%' | '#' => {
                flush(&mut chunks, &mut current);
                chunks.push(if c == '%' { "percent" } else { "number" }.to_string());
            }
            c => match fold_latin(c) {
                Some(folded) => current.push_str(&folded),
                None => flush(&mut chunks, &mut current),
            },
        }
    }
    flush(&mut chunks, &mut current);

    let always_split = matches!(style, CaseStyle::SmallCamel | CaseStyle::BigCamel);
    chunks
        .iter()
        .flat_map(|chunk| split_camel(chunk, always_split))
        .map(|word| word.to_ascii_lowercase())
        .collect()
}

/// ASCII spelling of an accented Latin letter, keeping its case
fn fold_latin(c: char) -> Option<String> {
    let base = match c.to_lowercase().next()? {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(if c.is_uppercase() {
        base.to_ascii_uppercase()
    } else {
        base.to_string()
    })
}

fn flush(chunks: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
}

/// Split `firstName`, `HTMLParser`, `q1Revenue` into words
fn split_camel(chunk: &str, always: bool) -> Vec<&str> {
    if !always && !chunk.bytes().any(|b| b.is_ascii_lowercase()) {
        return vec![chunk];
    }

    let bytes = chunk.as_bytes();
    let mut words = Vec::new();
    let mut start = 0;

    for i in 1..bytes.len() {
        let (prev, cur) = (bytes[i - 1], bytes[i]);
        let next = bytes.get(i + 1).copied();
        let boundary = cur.is_ascii_uppercase()
            && (prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase())));
        if boundary {
            words.push(&chunk[start..i]);
            start = i;
        }
    }
    words.push(&chunk[start..]);
    words
}

fn apply_case(words: &[String], style: CaseStyle) -> String {
    match style {
        CaseStyle::Snake => words.join("_"),
        CaseStyle::ScreamingSnake => words.join("_").to_ascii_uppercase(),
        CaseStyle::SmallCamel => {
            let (first, rest) = words.split_first().map_or(("", &[][..]), |(f, r)| (f.as_str(), r));
            let mut out = first.to_string();
            for word in merge_single_letters(rest) {
                out.push_str(&capitalize(&word));
            }
            out
        }
        CaseStyle::BigCamel => merge_single_letters(words)
            .iter()
            .map(|w| capitalize(w))
            .collect(),
    }
}

/// Glue one-character words onto the following word so that camel output
/// never holds two adjacent capitals (`["a", "b"]` → `Ab`, not `AB`).
fn merge_single_letters(words: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(words.len());
    let mut pending = String::new();

    for word in words {
        pending.push_str(word);
        if pending.len() > 1 {
            merged.push(std::mem::take(&mut pending));
        }
    }
    if !pending.is_empty() {
        merged.push(pending);
    }
    merged
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Make names unique in first-occurrence order.
///
/// A repeated name gets the next unused suffix `_2`, `_3`, ... (bare digits
/// for camel styles). A name shaped like `<base>_<n>` where `<base>` itself
/// repeats lives in that base's suffix space and is suffixed as well.
fn dedupe(cleaned: Vec<String>, style: CaseStyle) -> Vec<String> {
    let sep = style.suffix_separator();

    let mut occurrences: FxHashMap<&str, usize> = FxHashMap::default();
    for name in &cleaned {
        *occurrences.entry(name.as_str()).or_default() += 1;
    }
    let repeated: FxHashSet<&str> = occurrences
        .iter()
        .filter(|(_, &n)| n > 1)
        .map(|(&name, _)| name)
        .collect();

    let mut taken: FxHashSet<String> = FxHashSet::default();
    let mut next_suffix: FxHashMap<String, usize> = FxHashMap::default();
    let mut out = Vec::with_capacity(cleaned.len());

    for name in &cleaned {
        let in_suffix_space = suffix_base(name, sep).is_some_and(|base| repeated.contains(base));

        let resolved = if taken.contains(name) || in_suffix_space {
            let counter = next_suffix.entry(name.clone()).or_insert(2);
            loop {
                let candidate = format!("{}{}{}", name, sep, counter);
                *counter += 1;
                if !taken.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            name.clone()
        };

        taken.insert(resolved.clone());
        out.push(resolved);
    }

    out
}

/// `name_3` → `name` (or `name3` → `name` with an empty separator)
fn suffix_base<'a>(name: &'a str, sep: &str) -> Option<&'a str> {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.len() == name.len() {
        return None;
    }
    let base = stem.strip_suffix(sep)?;
    (!base.is_empty()).then_some(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    const STYLES: [CaseStyle; 4] = [
        CaseStyle::Snake,
        CaseStyle::SmallCamel,
        CaseStyle::BigCamel,
        CaseStyle::ScreamingSnake,
    ];

    fn corpus() -> Vec<Vec<&'static str>> {
        vec![
            vec!["Name", "Name", "name_1"],
            vec!["", "", "  "],
            vec!["1st place", "2nd", "x1st"],
            vec!["firstName", "first_name", "FIRST NAME", "First-Name"],
            vec!["% done", "# of items", "don't stop"],
            vec!["HTMLParser", "parseHTML", "Q1Revenue", "FIELD1B"],
            vec!["a b c", "a", "b", "a.b", "ab C", "ab c d1"],
            vec!["a", "a", "a_2", "a_2", "a"],
            vec!["x", "X", "x_2", "x2", "X 2"],
            vec!["Crème brûlée", "naïve", "日本", "ÉCOLE"],
            vec!["id", "ID", "Id", "iD"],
            vec!["abC", "ab c", "AbC", "ab_c_2"],
        ]
    }

    #[test]
    fn test_duplicate_headers_with_suffix_collision() {
        assert_eq!(
            normalize_names(&["Name", "Name", "name_1"], CaseStyle::Snake),
            vec!["name", "name_2", "name_1_2"]
        );
    }

    #[test]
    fn test_snake_basics() {
        let names = normalize_names(
            &[
                "  First Name ",
                "firstName2",
                "% Complete",
                "Item #",
                "Don't Stop",
                "",
                "2020 sales",
                "a...b__c",
            ],
            CaseStyle::Snake,
        );
        assert_eq!(
            names,
            vec![
                "first_name",
                "first_name2",
                "percent_complete",
                "item_number",
                "dont_stop",
                "x",
                "x2020_sales",
                "a_b_c",
            ]
        );
    }

    #[test]
    fn test_camel_splitting() {
        assert_eq!(clean_name("HTMLParser", CaseStyle::Snake), "html_parser");
        assert_eq!(clean_name("Q1Revenue", CaseStyle::Snake), "q1_revenue");
        assert_eq!(clean_name("FIELD1B", CaseStyle::Snake), "field1b");
        assert_eq!(clean_name("FIELD1B", CaseStyle::BigCamel), "Field1B");
    }

    #[test]
    fn test_accents_fold_to_ascii() {
        assert_eq!(clean_name("Crème Brûlée", CaseStyle::Snake), "creme_brulee");
        assert_eq!(clean_name("Größe", CaseStyle::Snake), "grosse");
        assert_eq!(clean_name("日本", CaseStyle::Snake), "x");
    }

    #[test]
    fn test_other_styles() {
        let raw = ["first name", "last_name", "Name", "Name"];
        assert_eq!(
            normalize_names(&raw, CaseStyle::SmallCamel),
            vec!["firstName", "lastName", "name", "name2"]
        );
        assert_eq!(
            normalize_names(&raw, CaseStyle::BigCamel),
            vec!["FirstName", "LastName", "Name", "Name2"]
        );
        assert_eq!(
            normalize_names(&raw, CaseStyle::ScreamingSnake),
            vec!["FIRST_NAME", "LAST_NAME", "NAME", "NAME_2"]
        );
    }

    #[test]
    fn test_single_letter_words_in_camel() {
        assert_eq!(clean_name("a b", CaseStyle::BigCamel), "Ab");
        assert_eq!(clean_name("a b c", CaseStyle::SmallCamel), "aBc");
        assert_eq!(clean_name("ab c", CaseStyle::BigCamel), "AbC");
    }

    #[test]
    fn test_suffixes_are_not_reused() {
        assert_eq!(
            normalize_names(&["a", "a", "a_2", "a"], CaseStyle::Snake),
            vec!["a", "a_2", "a_2_2", "a_3"]
        );
    }

    #[test]
    fn test_idempotent_for_every_style() {
        for style in STYLES {
            for raw in corpus() {
                let once = normalize_names(&raw, style);
                let twice = normalize_names(&once, style);
                assert_eq!(once, twice, "style {:?}, input {:?}", style, raw);
            }
        }
    }

    #[test]
    fn test_output_unique_and_well_formed() {
        for style in STYLES {
            for raw in corpus() {
                let names = normalize_names(&raw, style);
                assert_eq!(names.len(), raw.len());

                let unique: FxHashSet<&String> = names.iter().collect();
                assert_eq!(unique.len(), names.len(), "style {:?}: {:?}", style, names);

                for name in &names {
                    let first = name.chars().next().unwrap();
                    assert!(first.is_ascii_alphabetic(), "{}", name);
                    assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
                    match style {
                        CaseStyle::Snake => assert!(!name.chars().any(|c| c.is_ascii_uppercase())),
                        CaseStyle::ScreamingSnake => {
                            assert!(!name.chars().any(|c| c.is_ascii_lowercase()))
                        }
                        CaseStyle::SmallCamel => assert!(first.is_ascii_lowercase()),
                        CaseStyle::BigCamel => assert!(first.is_ascii_uppercase()),
                    }
                }
            }
        }
    }

    #[test]
    fn test_clean_table_names() {
        let table = Table::new(vec![
            Column::from_values("Employee ID", [1, 2]),
            Column::from_values("employee id", [3, 4]),
        ])
        .unwrap();
        let cleaned = clean_names(&table, CaseStyle::Snake).unwrap();
        assert_eq!(cleaned.names(), vec!["employee_id", "employee_id_2"]);
        assert_eq!(cleaned.columns()[1].cells, table.columns()[1].cells);
    }
}
