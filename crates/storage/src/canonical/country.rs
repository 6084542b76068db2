use std::collections::HashMap;

use lazy_static::lazy_static;

use super::normalize::normalize_key;

/// Canonical country names, as stored on wines.
const COUNTRIES: &[&str] = &[
    "Frankreich",
    "Italien",
    "Spanien",
    "Deutschland",
    "Österreich",
    "Schweiz",
    "Portugal",
    "USA",
    "Argentinien",
    "Chile",
    "Australien",
    "Neuseeland",
    "Südafrika",
    "Griechenland",
    "Ungarn",
    "Slowenien",
    "Kroatien",
    "Georgien",
    "Libanon",
    "Israel",
    "Kanada",
    "England",
    "Uruguay",
    "Rumänien",
    "Bulgarien",
    "Moldawien",
    "Tschechien",
    "Luxemburg",
    "China",
    "Japan",
];

/// Alternative spellings keyed by their normalized form.
const SYNONYMS: &[(&str, &str)] = &[
    ("france", "Frankreich"),
    ("fr", "Frankreich"),
    ("italy", "Italien"),
    ("italia", "Italien"),
    ("italie", "Italien"),
    ("it", "Italien"),
    ("spain", "Spanien"),
    ("espana", "Spanien"),
    ("espagne", "Spanien"),
    ("es", "Spanien"),
    ("germany", "Deutschland"),
    ("allemagne", "Deutschland"),
    ("germania", "Deutschland"),
    ("de", "Deutschland"),
    ("austria", "Österreich"),
    ("autriche", "Österreich"),
    ("at", "Österreich"),
    ("switzerland", "Schweiz"),
    ("suisse", "Schweiz"),
    ("svizzera", "Schweiz"),
    ("ch", "Schweiz"),
    ("usa", "USA"),
    ("us", "USA"),
    ("unitedstates", "USA"),
    ("unitedstatesofamerica", "USA"),
    ("vereinigtestaaten", "USA"),
    ("america", "USA"),
    ("amerika", "USA"),
    ("etatsunis", "USA"),
    ("argentina", "Argentinien"),
    ("argentine", "Argentinien"),
    ("australia", "Australien"),
    ("australie", "Australien"),
    ("newzealand", "Neuseeland"),
    ("nz", "Neuseeland"),
    ("nouvellezelande", "Neuseeland"),
    ("southafrica", "Südafrika"),
    ("za", "Südafrika"),
    ("afriquedusud", "Südafrika"),
    ("greece", "Griechenland"),
    ("hellas", "Griechenland"),
    ("hungary", "Ungarn"),
    ("magyarorszag", "Ungarn"),
    ("slovenia", "Slowenien"),
    ("slovenija", "Slowenien"),
    ("croatia", "Kroatien"),
    ("hrvatska", "Kroatien"),
    ("georgia", "Georgien"),
    ("sakartvelo", "Georgien"),
    ("lebanon", "Libanon"),
    ("liban", "Libanon"),
    ("canada", "Kanada"),
    ("unitedkingdom", "England"),
    ("uk", "England"),
    ("greatbritain", "England"),
    ("grossbritannien", "England"),
    ("romania", "Rumänien"),
    ("bulgaria", "Bulgarien"),
    ("moldova", "Moldawien"),
    ("czechia", "Tschechien"),
    ("czechrepublic", "Tschechien"),
    ("luxembourg", "Luxemburg"),
];

lazy_static! {
    static ref COUNTRY_KEYS: HashMap<String, &'static str> = COUNTRIES
        .iter()
        .map(|name| (normalize_key(name), *name))
        .collect();
    static ref SYNONYM_KEYS: HashMap<&'static str, &'static str> =
        SYNONYMS.iter().copied().collect();
}

/// Maps a free-text country onto its canonical name.
///
/// The direct table is consulted first, then the synonym table. Anything
/// unrecognised is returned trimmed but otherwise untouched.
///
/// ```
/// use storage::canonical::canonicalize_country;
///
/// assert_eq!(canonicalize_country("italia"), "Italien");
/// assert_eq!(canonicalize_country(" Atlantis "), "Atlantis");
/// ```
pub fn canonicalize_country(input: &str) -> String {
    let key = normalize_key(input);

    if let Some(name) = COUNTRY_KEYS.get(&key) {
        return (*name).to_string();
    }
    if let Some(name) = SYNONYM_KEYS.get(key.as_str()) {
        return (*name).to_string();
    }

    input.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_names_ignore_case_and_accents() {
        assert_eq!(canonicalize_country("frankreich"), "Frankreich");
        assert_eq!(canonicalize_country("OSTERREICH"), "Österreich");
        assert_eq!(canonicalize_country("Sudafrika"), "Südafrika");
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(canonicalize_country("USA"), "USA");
        assert_eq!(canonicalize_country("u.s.a."), "USA");
        assert_eq!(canonicalize_country("United States"), "USA");
        assert_eq!(canonicalize_country("Italy"), "Italien");
        assert_eq!(canonicalize_country("España"), "Spanien");
        assert_eq!(canonicalize_country("France"), "Frankreich");
    }

    #[test]
    fn test_unknown_passes_through_trimmed() {
        assert_eq!(canonicalize_country("  Narnia "), "Narnia");
        assert_eq!(canonicalize_country(""), "");
    }

    #[test]
    fn test_synonym_targets_are_canonical() {
        for (_, target) in SYNONYMS {
            assert!(COUNTRIES.contains(target), "{} is not canonical", target);
        }
    }
}
