use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Reduces free text to a lookup key: diacritics stripped, lowercased,
/// everything but ASCII letters and digits removed.
///
/// ```
/// use storage::canonical::normalize_key;
///
/// assert_eq!(normalize_key("Châteauneuf-du-Pape"), "chateauneufdupape");
/// assert_eq!(normalize_key("  Straße "), "strasse");
/// ```
pub fn normalize_key(input: &str) -> String {
    let mut key = String::with_capacity(input.len());

    for c in input.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match c {
            'ß' => key.push_str("ss"),
            'æ' | 'Æ' => key.push_str("ae"),
            'œ' | 'Œ' => key.push_str("oe"),
            'ø' | 'Ø' => key.push('o'),
            'đ' | 'Đ' => key.push('d'),
            'ł' | 'Ł' => key.push('l'),
            c if c.is_ascii_alphanumeric() => key.push(c.to_ascii_lowercase()),
            _ => {}
        }
    }

    key
}

/// Case, diacritic and punctuation insensitive equality. Blank values never
/// match anything, not even another blank.
pub fn same_value(a: &str, b: &str) -> bool {
    let a = normalize_key(a);
    !a.is_empty() && a == normalize_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_accents_and_punctuation() {
        assert_eq!(normalize_key("Rhône (Nord & Süd)"), "rhonenordsud");
        assert_eq!(normalize_key("Côte-d'Or"), "cotedor");
        assert_eq!(normalize_key("N.V."), "nv");
    }

    #[test]
    fn test_folds_ligatures() {
        assert_eq!(normalize_key("Œil de Perdrix"), "oeildeperdrix");
        assert_eq!(normalize_key("Grüner Veltliner"), "grunerveltliner");
        assert_eq!(normalize_key("Blaufränkisch"), "blaufrankisch");
    }

    #[test]
    fn test_blank_never_matches() {
        assert!(!same_value("", ""));
        assert!(!same_value(" - ", ""));
        assert!(same_value("Pinot Noir", "pinot-noir"));
    }
}
