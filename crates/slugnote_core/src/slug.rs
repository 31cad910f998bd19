//! Slug derivation and format checks.
//!
//! # Responsibility
//! - Derive URL-safe slugs from note titles (`slugify`).
//! - Pick the slug to persist for a draft (`resolve_slug`).
//!
//! # Invariants
//! - `slugify` is pure and deterministic, and re-applying it to its own
//!   output is a no-op.
//! - Output only contains `[a-z0-9_-]`, never starts or ends with `-`, and
//!   never contains `--`.
//! - The resolver never renames on collision; uniqueness is checked later.

use crate::model::note::NoteDraft;
use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_FORMAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Derives a slug from free text.
///
/// Rules:
/// - text is lowercased first;
/// - Cyrillic and accented Latin letters are transliterated to ASCII;
/// - `&` becomes the word `and`;
/// - every run of other characters (whitespace, punctuation, hyphens,
///   symbols) collapses into a single `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            push_word(&mut slug, &mut pending_separator, ch.encode_utf8(&mut [0; 4]));
        } else if ch == '&' {
            pending_separator = true;
            push_word(&mut slug, &mut pending_separator, "and");
            pending_separator = true;
        } else if let Some(latin) = transliterate(ch) {
            if !latin.is_empty() {
                push_word(&mut slug, &mut pending_separator, latin);
            }
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Picks the slug to persist for `draft`.
///
/// A non-blank supplied slug is kept as typed (surrounding whitespace
/// removed); otherwise the title is slugified and cut to `max_chars`.
pub fn resolve_slug(draft: &NoteDraft, max_chars: usize) -> String {
    match draft.supplied_slug() {
        Some(slug) => slug.trim().to_string(),
        None => truncate_slug(&slugify(&draft.title), max_chars),
    }
}

/// Returns whether `slug` only uses letters, digits, `_` and `-`.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_FORMAT_RE.is_match(slug)
}

/// Cuts a derived slug to `max_chars` without leaving a dangling `-`.
pub fn truncate_slug(slug: &str, max_chars: usize) -> String {
    if slug.chars().count() <= max_chars {
        return slug.to_string();
    }
    let truncated: String = slug.chars().take(max_chars).collect();
    truncated.trim_end_matches('-').to_string()
}

fn push_word(slug: &mut String, pending_separator: &mut bool, word: &str) {
    if *pending_separator && !slug.is_empty() {
        slug.push('-');
    }
    *pending_separator = false;
    slug.push_str(word);
}

// Input is already lowercase. `Some("")` drops the character without
// splitting the word; `None` turns it into a separator.
fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "yi",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",
        'ў' => "u",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ı' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ß' => "ss",
        'ś' | 'š' | 'ş' => "s",
        'ť' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        // Combining marks left behind by lowercasing (e.g. `İ`).
        '\u{0300}'..='\u{036f}' => "",
        _ => return None,
    };
    Some(latin)
}
