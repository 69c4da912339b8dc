use std::sync::OnceLock;

use regex::Regex;

use crate::tables::{COUNTRY_ALIASES, CountryAlias, STOP_WORDS};

/// Lowercases with Turkish dotted/dotless capitals folded onto plain `i`.
///
/// `İ` would otherwise lowercase to `i` plus a combining dot and never match.
pub fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'İ' | 'I' => out.push('i'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// True when `needle` occurs in `haystack` starting at a word boundary.
///
/// Suffixed forms still match ("türkiye'nin"), words that merely contain the
/// needle do not ("için" does not contain the word "çin").
pub fn contains_at_word_start(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .is_none_or(|prev| !prev.is_alphanumeric())
    })
}

/// First alias (in table priority order) mentioned in a folded question.
pub fn find_country(folded: &str) -> Option<&'static CountryAlias> {
    COUNTRY_ALIASES
        .iter()
        .find(|a| contains_at_word_start(folded, a.alias))
}

/// Words of a folded question that say something about the topic.
///
/// Drops words shorter than three characters, stop-words, and anything derived from
/// the category's own keywords (so "bayramı" is not a term for a holiday question).
pub fn significant_terms(folded: &str, keywords: &[&str]) -> Vec<String> {
    let keyword_words: Vec<&str> = keywords.iter().flat_map(|k| k.split_whitespace()).collect();
    let stop_words: Vec<&str> = STOP_WORDS.iter().flat_map(|k| k.split_whitespace()).collect();

    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .filter(|w| !stop_words.contains(w))
        .filter(|w| {
            !keyword_words.iter().any(|k| {
                if k.chars().count() >= 4 {
                    w.starts_with(k)
                } else {
                    w == k
                }
            })
        })
        .map(str::to_string)
        .collect()
}

/// Removes interrogatives and punctuation, collapsing what is left to single spaces.
pub fn strip_stop_words(folded: &str) -> String {
    let stripped = stop_word_pattern().replace_all(folded, " ");
    stripped
        .split(|c: char| c.is_whitespace() || matches!(c, '?' | '!' | '.' | ',' | ';' | ':'))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn stop_word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternation = STOP_WORDS
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\b(?:{alternation})\b")).expect("stop-word pattern is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::{contains_at_word_start, find_country, fold, significant_terms, strip_stop_words};
    use crate::tables::{DAY_KEYWORDS, HISTORY_KEYWORDS};
    use pretty_assertions::assert_eq;

    #[test]
    fn fold_handles_turkish_capitals() {
        assert_eq!(fold("MERHABA"), "merhaba");
        assert_eq!(fold("İSTANBUL"), "istanbul");
        assert_eq!(fold("İtalya ÇİN Şehir"), "italya çin şehir");
    }

    #[test]
    fn aliases_match_at_word_starts_only() {
        assert!(contains_at_word_start("türkiye'nin başkenti", "türkiye"));
        assert!(contains_at_word_start("bana çin'i anlat", "çin"));
        assert!(!contains_at_word_start("bunun için", "çin"));
        assert!(!contains_at_word_start("anything", ""));
    }

    #[test]
    fn country_lookup_follows_table_priority() {
        let alias = find_country("abd ve kanada").expect("alias");
        assert_eq!(alias.canonical, "Amerika Birleşik Devletleri");
        assert_eq!(alias.catalog_id, Some("usa"));

        assert!(find_country("bunun için bir şey").is_none());
        assert_eq!(find_country("mısır'ın piramitleri").map(|a| a.canonical), Some("Mısır"));
    }

    #[test]
    fn terms_skip_stop_words_and_keywords() {
        assert_eq!(significant_terms("1453 ne zaman oldu", HISTORY_KEYWORDS), vec!["1453"]);
        assert_eq!(
            significant_terms("cumhuriyet bayramı ne zaman?", DAY_KEYWORDS),
            vec!["cumhuriyet"]
        );
    }

    #[test]
    fn stop_words_and_punctuation_are_stripped() {
        assert_eq!(strip_stop_words("fotosentez nedir?"), "fotosentez");
        assert_eq!(strip_stop_words("ne zaman  kuruldu roma"), "kuruldu roma");
        assert_eq!(strip_stop_words("nasıl?"), "");
        assert_eq!(strip_stop_words("nedenler hakkında"), "nedenler");
    }
}
