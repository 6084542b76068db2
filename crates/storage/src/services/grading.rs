use std::collections::{HashMap, HashSet};

use tracing::warn;
use uuid::Uuid;

use crate::models::{Guess, Participant, ScoringRule, Wine};
use crate::services::scoring::score;

/// Score computed for one stored guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessAssignment {
    pub guess_id: Uuid,
    pub participant_id: Uuid,
    pub wine_id: Uuid,
    pub score: i32,
}

#[derive(Debug, Default)]
pub struct GradingOutcome {
    pub assignments: Vec<GuessAssignment>,
    /// (participant, wine) pairs without a submitted guess, counted as 0
    pub missing: usize,
    /// Guesses that failed their integrity check and were scored 0
    pub rejected: usize,
}

/// Grades every guess of one flight.
///
/// Every participant is expected to guess every wine; a missing guess simply
/// scores 0 and produces no assignment. A guess that does not belong to this
/// flight's wines or this tasting's participants, or whose varietal list is
/// out of range, is logged and scored 0 so the rest of the flight still gets
/// graded.
///
/// This does not guard against being run twice for the same flight.
pub fn grade_flight(
    wines: &[Wine],
    participants: &[Participant],
    guesses: &[Guess],
    rule: &ScoringRule,
    max_varietals: usize,
) -> GradingOutcome {
    let wines_by_id: HashMap<Uuid, &Wine> = wines.iter().map(|w| (w.wine_id, w)).collect();
    let participant_ids: HashSet<Uuid> = participants.iter().map(|p| p.participant_id).collect();

    let mut outcome = GradingOutcome::default();
    let mut guessed: HashSet<(Uuid, Uuid)> = HashSet::new();

    for guess in guesses {
        let Some(wine) = wines_by_id.get(&guess.wine_id) else {
            warn!(
                guess_id = %guess.guess_id,
                wine_id = %guess.wine_id,
                "Guess references a wine outside the flight, scoring 0"
            );
            outcome.rejected += 1;
            outcome.assignments.push(zero(guess));
            continue;
        };

        if !participant_ids.contains(&guess.participant_id) {
            warn!(
                guess_id = %guess.guess_id,
                participant_id = %guess.participant_id,
                "Guess belongs to a participant outside the tasting, scoring 0"
            );
            outcome.rejected += 1;
            outcome.assignments.push(zero(guess));
            continue;
        }

        if guess.varietals.len() > max_varietals {
            warn!(
                guess_id = %guess.guess_id,
                varietals = guess.varietals.len(),
                max_varietals,
                "Guess carries too many varietals, scoring 0"
            );
            outcome.rejected += 1;
            outcome.assignments.push(zero(guess));
            guessed.insert((guess.participant_id, guess.wine_id));
            continue;
        }

        let points = score(*wine, guess, rule);
        outcome.assignments.push(GuessAssignment {
            guess_id: guess.guess_id,
            participant_id: guess.participant_id,
            wine_id: guess.wine_id,
            score: i32::try_from(points).unwrap_or(i32::MAX),
        });
        guessed.insert((guess.participant_id, guess.wine_id));
    }

    outcome.missing = participants
        .iter()
        .flat_map(|p| wines.iter().map(move |w| (p.participant_id, w.wine_id)))
        .filter(|pair| !guessed.contains(pair))
        .count();

    outcome
}

fn zero(guess: &Guess) -> GuessAssignment {
    GuessAssignment {
        guess_id: guess.guess_id,
        participant_id: guess.participant_id,
        wine_id: guess.wine_id,
        score: 0,
    }
}

/// Re-derives every participant's total from their graded guesses.
/// Ungraded guesses count as nothing.
pub fn participant_totals(participants: &[Participant], guesses: &[Guess]) -> HashMap<Uuid, i32> {
    let mut totals: HashMap<Uuid, i32> =
        participants.iter().map(|p| (p.participant_id, 0)).collect();

    for guess in guesses {
        if let (Some(total), Some(points)) = (totals.get_mut(&guess.participant_id), guess.score) {
            *total += points;
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::services::scoring::tests::{guess_for, rule, wine};

    fn participant(tasting_id: Uuid) -> Participant {
        Participant {
            participant_id: Uuid::new_v4(),
            tasting_id,
            user_id: Uuid::new_v4(),
            score: 0,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_guess_counts_as_zero_without_assignment() {
        let tasting_id = Uuid::new_v4();
        let w1 = wine("Frankreich", "Burgund", &["Pinot Noir"]);
        let w2 = wine("Italien", "Piemont", &["Nebbiolo"]);
        let alice = participant(tasting_id);
        let bob = participant(tasting_id);

        let mut g = guess_for(&w1);
        g.participant_id = alice.participant_id;

        let outcome = grade_flight(
            &[w1, w2],
            &[alice.clone(), bob],
            &[g.clone()],
            &rule(2, true),
            3,
        );

        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].score, 12);
        assert_eq!(outcome.missing, 3);
        assert_eq!(outcome.rejected, 0);
    }

    #[test]
    fn test_foreign_guess_is_rejected_not_fatal() {
        let tasting_id = Uuid::new_v4();
        let w = wine("Frankreich", "Burgund", &["Pinot Noir"]);
        let other = wine("Chile", "Maipo", &["Carmenère"]);
        let alice = participant(tasting_id);

        let mut good = guess_for(&w);
        good.participant_id = alice.participant_id;
        let mut stray = guess_for(&other);
        stray.participant_id = alice.participant_id;
        let mut stranger = guess_for(&w);
        stranger.participant_id = Uuid::new_v4();

        let outcome = grade_flight(
            &[w],
            &[alice],
            &[stray, good.clone(), stranger],
            &rule(1, true),
            3,
        );

        assert_eq!(outcome.rejected, 2);
        let scored: Vec<_> = outcome
            .assignments
            .iter()
            .filter(|a| a.guess_id == good.guess_id)
            .collect();
        assert_eq!(scored[0].score, 6);
        assert_eq!(outcome.missing, 0);
    }

    #[test]
    fn test_oversized_varietal_list_scores_zero() {
        let tasting_id = Uuid::new_v4();
        let w = wine("Frankreich", "Bordeaux", &["Merlot"]);
        let alice = participant(tasting_id);
        let mut g = guess_for(&w);
        g.participant_id = alice.participant_id;
        g.varietals = vec!["Merlot".into(), "Cabernet Franc".into(), "Malbec".into(), "Petit Verdot".into()];

        let outcome = grade_flight(&[w], &[alice], &[g], &rule(1, true), 3);

        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.assignments[0].score, 0);
        assert_eq!(outcome.missing, 0);
    }

    #[test]
    fn test_totals_sum_graded_guesses_only() {
        let tasting_id = Uuid::new_v4();
        let w = wine("Frankreich", "Burgund", &["Pinot Noir"]);
        let alice = participant(tasting_id);
        let bob = participant(tasting_id);

        let mut graded = guess_for(&w);
        graded.participant_id = alice.participant_id;
        graded.score = Some(7);
        let mut also_graded = guess_for(&w);
        also_graded.participant_id = alice.participant_id;
        also_graded.score = Some(3);
        let mut pending = guess_for(&w);
        pending.participant_id = bob.participant_id;

        let totals = participant_totals(&[alice.clone(), bob.clone()], &[graded, also_graded, pending]);

        assert_eq!(totals[&alice.participant_id], 10);
        assert_eq!(totals[&bob.participant_id], 0);
    }
}
