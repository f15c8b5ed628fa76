//! Pure helpers shared by server and seed binary.

use chrono::NaiveDate;

/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Today's date (UTC). Contact status and event ranges compare against this.
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Fold a single accented Latin character to its ASCII base letter.
///
/// Covers the Portuguese alphabet; anything else passes through unchanged.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        _ => c,
    }
}

/// Normalize a raw user identifier to its canonical slug form.
///
/// Rules: strip diacritics, lowercase, collapse every run of
/// non-alphanumeric characters into a single hyphen, trim edge hyphens.
/// `"  João Víctor  "` → `"joao-victor"`, `"LOJA"` → `"loja"`.
///
/// Returns an empty string when nothing alphanumeric survives; callers
/// decide whether that means "fall back to the default user" or "reject".
pub fn normalize_user_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;
    for c in raw.chars().map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Keep only ASCII digits. CPF comparison is digits-only, so
/// `"123.456.789-00"` and `"12345678900"` compare equal.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_diacritics_and_case() {
        assert_eq!(normalize_user_key("João Víctor"), "joao-victor");
        assert_eq!(normalize_user_key("LOJA"), "loja");
        assert_eq!(normalize_user_key("  renata  "), "renata");
    }

    #[test]
    fn normalize_collapses_separator_runs() {
        assert_eq!(normalize_user_key("ana__maria--silva"), "ana-maria-silva");
        assert_eq!(normalize_user_key("--loja--"), "loja");
        assert_eq!(normalize_user_key("a b   c"), "a-b-c");
    }

    #[test]
    fn normalize_empty_when_nothing_survives() {
        assert_eq!(normalize_user_key("---"), "");
        assert_eq!(normalize_user_key(""), "");
        assert_eq!(normalize_user_key("  ·  "), "");
    }

    #[test]
    fn digits_only_ignores_punctuation() {
        assert_eq!(digits_only("123.456.789-00"), "12345678900");
        assert_eq!(digits_only("12345678900"), "12345678900");
        assert_eq!(digits_only("abc"), "");
    }
}
