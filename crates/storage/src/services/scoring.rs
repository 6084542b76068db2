use std::collections::BTreeSet;

use serde::Serialize;
use utoipa::ToSchema;

use crate::canonical::{canonicalize_country, canonicalize_region, normalize_key, same_value};
use crate::models::{Guess, ScoringRule, Wine};

/// The attribute set shared by a wine record and a guess about it.
pub trait WineAttributes {
    fn country(&self) -> &str;
    fn region(&self) -> &str;
    fn producer(&self) -> &str;
    fn name(&self) -> &str;
    fn vintage(&self) -> &str;
    fn varietals(&self) -> &[String];
}

macro_rules! impl_wine_attributes {
    ($ty:ty) => {
        impl WineAttributes for $ty {
            fn country(&self) -> &str {
                &self.country
            }
            fn region(&self) -> &str {
                &self.region
            }
            fn producer(&self) -> &str {
                &self.producer
            }
            fn name(&self) -> &str {
                &self.name
            }
            fn vintage(&self) -> &str {
                &self.vintage
            }
            fn varietals(&self) -> &[String] {
                &self.varietals
            }
        }
    };
}

impl_wine_attributes!(Wine);
impl_wine_attributes!(Guess);

/// Points per attribute for one graded guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScoreBreakdown {
    pub country: u32,
    pub region: u32,
    pub producer: u32,
    pub wine_name: u32,
    pub vintage: u32,
    pub varietals: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.country + self.region + self.producer + self.wine_name + self.vintage + self.varietals
    }
}

fn points(value: i16) -> u32 {
    u32::from(value.clamp(0, ScoringRule::MAX_POINTS).unsigned_abs())
}

fn award(matched: bool, value: i16) -> u32 {
    if matched { points(value) } else { 0 }
}

/// Field-by-field comparison of a guess against the actual wine.
///
/// Countries are compared after canonicalization; regions are canonicalized
/// with the wine's country as context on both sides. Blank guessed fields
/// never match. Varietals are all-or-nothing: any overlap when the rule
/// grants `any_varietal_point`, identical sets otherwise.
pub fn score_breakdown(
    wine: &impl WineAttributes,
    guess: &impl WineAttributes,
    rule: &ScoringRule,
) -> ScoreBreakdown {
    let wine_country = canonicalize_country(wine.country());

    ScoreBreakdown {
        country: award(countries_match(wine.country(), guess.country()), rule.country),
        region: award(
            regions_match(wine.region(), guess.region(), &wine_country),
            rule.region,
        ),
        producer: award(text_matches(wine.producer(), guess.producer()), rule.producer),
        wine_name: award(text_matches(wine.name(), guess.name()), rule.wine_name),
        vintage: award(vintages_match(wine.vintage(), guess.vintage()), rule.vintage),
        varietals: award(
            varietals_match(wine.varietals(), guess.varietals(), rule.any_varietal_point),
            rule.varietals,
        ),
    }
}

/// Total points for a guess; never negative, at most `rule.max_total()`.
pub fn score(wine: &impl WineAttributes, guess: &impl WineAttributes, rule: &ScoringRule) -> u32 {
    score_breakdown(wine, guess, rule).total()
}

pub fn countries_match(actual: &str, guessed: &str) -> bool {
    same_value(&canonicalize_country(actual), &canonicalize_country(guessed))
}

fn regions_match(actual: &str, guessed: &str, wine_country: &str) -> bool {
    same_value(
        &canonicalize_region(actual, Some(wine_country)),
        &canonicalize_region(guessed, Some(wine_country)),
    )
}

fn text_matches(actual: &str, guessed: &str) -> bool {
    let guessed = guessed.trim();
    !guessed.is_empty() && actual.trim().to_lowercase() == guessed.to_lowercase()
}

const NON_VINTAGE: &[&str] = &["nv", "nonvintage", "sansannee", "ohnejahrgang", "ohnejahr"];

fn vintage_key(value: &str) -> Option<String> {
    let key = normalize_key(value);
    if key.is_empty() {
        return None;
    }
    if NON_VINTAGE.contains(&key.as_str()) {
        return Some("nv".to_string());
    }
    match key.parse::<u32>() {
        Ok(year) => Some(year.to_string()),
        Err(_) => Some(key),
    }
}

fn vintages_match(actual: &str, guessed: &str) -> bool {
    match (vintage_key(actual), vintage_key(guessed)) {
        (Some(a), Some(g)) => a == g,
        _ => false,
    }
}

fn varietal_set(varietals: &[String]) -> BTreeSet<String> {
    varietals
        .iter()
        .map(|v| normalize_key(v))
        .filter(|v| !v.is_empty())
        .collect()
}

pub fn varietals_match(actual: &[String], guessed: &[String], any_varietal_point: bool) -> bool {
    let actual = varietal_set(actual);
    let guessed = varietal_set(guessed);

    if guessed.is_empty() {
        return false;
    }
    if any_varietal_point {
        !actual.is_disjoint(&guessed)
    } else {
        actual == guessed
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    pub(crate) fn wine(country: &str, region: &str, varietals: &[&str]) -> Wine {
        Wine {
            wine_id: Uuid::new_v4(),
            flight_id: Uuid::new_v4(),
            letter_code: "A".to_string(),
            country: country.to_string(),
            region: region.to_string(),
            producer: "Domaine X".to_string(),
            name: "Cuvée Y".to_string(),
            vintage: "2018".to_string(),
            varietals: varietals.iter().map(|v| v.to_string()).collect(),
            is_custom: true,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn guess_for(wine: &Wine) -> Guess {
        Guess {
            guess_id: Uuid::new_v4(),
            participant_id: Uuid::new_v4(),
            wine_id: wine.wine_id,
            country: wine.country.clone(),
            region: wine.region.clone(),
            producer: wine.producer.clone(),
            name: wine.name.clone(),
            vintage: wine.vintage.clone(),
            varietals: wine.varietals.clone(),
            notes: None,
            rating: None,
            score: None,
            submitted_at: Utc::now(),
        }
    }

    pub(crate) fn rule(points: i16, any_varietal_point: bool) -> ScoringRule {
        ScoringRule {
            tasting_id: Uuid::new_v4(),
            country: points,
            region: points,
            producer: points,
            wine_name: points,
            vintage: points,
            varietals: points,
            any_varietal_point,
            display_count: None,
            updated_at: Utc::now(),
        }
    }

    fn varietals(names: &[&str]) -> Vec<String> {
        names.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_correct_guess_earns_every_configured_point() {
        let w = wine("Frankreich", "Burgund", &["Pinot Noir"]);
        let g = guess_for(&w);

        let mut r = rule(3, false);
        r.region = 1;
        r.vintage = 0;
        r.varietals = 5;

        assert_eq!(score(&w, &g, &r), 3 + 1 + 3 + 3 + 0 + 5);
        assert_eq!(score(&w, &g, &r), r.max_total());
    }

    #[test]
    fn test_all_wrong_guess_scores_zero() {
        let w = wine("Frankreich", "Burgund", &["Pinot Noir"]);
        let mut g = guess_for(&w);
        g.country = "Chile".to_string();
        g.region = "Maipo".to_string();
        g.producer = "Someone Else".to_string();
        g.name = "Other".to_string();
        g.vintage = "1999".to_string();
        g.varietals = varietals(&["Carmenère"]);

        assert_eq!(score(&w, &g, &rule(5, true)), 0);
    }

    #[test]
    fn test_empty_guess_scores_zero() {
        let w = wine("Frankreich", "Burgund", &["Pinot Noir"]);
        let mut g = guess_for(&w);
        g.country.clear();
        g.region.clear();
        g.producer.clear();
        g.name.clear();
        g.vintage.clear();
        g.varietals.clear();

        assert_eq!(score(&w, &g, &rule(5, true)), 0);
    }

    #[test]
    fn test_varietal_modes() {
        let w = wine("Italien", "Toskana", &["Sangiovese", "Merlot", "Cabernet Sauvignon"]);
        let mut g = guess_for(&w);

        g.varietals = varietals(&["Sangiovese"]);
        assert_eq!(score_breakdown(&w, &g, &rule(2, true)).varietals, 2);
        assert_eq!(score_breakdown(&w, &g, &rule(2, false)).varietals, 0);

        g.varietals = varietals(&["cabernet sauvignon", "SANGIOVESE", "Merlot"]);
        assert_eq!(score_breakdown(&w, &g, &rule(2, true)).varietals, 2);
        assert_eq!(score_breakdown(&w, &g, &rule(2, false)).varietals, 2);

        g.varietals = varietals(&["Sangiovese", "Merlot", "Cabernet Sauvignon", "Syrah"]);
        assert_eq!(score_breakdown(&w, &g, &rule(2, true)).varietals, 2);
        assert_eq!(score_breakdown(&w, &g, &rule(2, false)).varietals, 0);
    }

    #[test]
    fn test_country_and_region_are_canonicalized() {
        let w = wine("Frankreich", "Burgund", &["Pinot Noir"]);
        let mut g = guess_for(&w);
        g.country = "france".to_string();
        g.region = "Bourgogne".to_string();

        let breakdown = score_breakdown(&w, &g, &rule(2, true));
        assert_eq!(breakdown.country, 2);
        assert_eq!(breakdown.region, 2);
    }

    #[test]
    fn test_region_resolves_within_the_wine_country() {
        let w = wine("Spanien", "Rioja", &["Tempranillo"]);
        let mut g = guess_for(&w);
        g.region = "La Rioja".to_string();

        assert_eq!(score_breakdown(&w, &g, &rule(2, true)).region, 2);

        let argentine = wine("Argentinien", "La Rioja", &["Torrontés"]);
        assert_eq!(score_breakdown(&argentine, &g, &rule(2, true)).region, 2);
    }

    #[test]
    fn test_producer_and_name_ignore_case_and_padding() {
        let w = wine("Frankreich", "Burgund", &["Pinot Noir"]);
        let mut g = guess_for(&w);
        g.producer = "  domaine x ".to_string();
        g.name = "CUVÉE Y".to_string();

        let breakdown = score_breakdown(&w, &g, &rule(1, true));
        assert_eq!(breakdown.producer, 1);
        assert_eq!(breakdown.wine_name, 1);
    }

    #[test]
    fn test_vintage_variants() {
        assert!(vintages_match("2018", " 2018 "));
        assert!(vintages_match("N.V.", "nv"));
        assert!(vintages_match("NV", "Non Vintage"));
        assert!(!vintages_match("2018", "2019"));
        assert!(!vintages_match("", ""));
    }

    #[test]
    fn test_unknown_values_still_match_themselves() {
        let w = wine("Narnia", "Cair Paravel", &["Mystery Grape"]);
        let g = guess_for(&w);

        assert_eq!(score(&w, &g, &rule(1, false)), 6);
    }
}
