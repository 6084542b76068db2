use crate::dto::participant::LeaderboardEntry;
use crate::models::ParticipantWithUser;

/// Ranks participants by total score, highest first.
///
/// The sort is stable over the input, so callers pass participants in join
/// order and equal scores keep it. Ranks use competition numbering (1, 2, 2,
/// 4) computed over everyone; `display_count` only truncates the result.
pub fn rank(
    mut participants: Vec<ParticipantWithUser>,
    display_count: Option<i32>,
) -> Vec<LeaderboardEntry> {
    participants.sort_by(|a, b| b.score.cmp(&a.score));

    let mut entries = Vec::with_capacity(participants.len());
    let mut previous: Option<(i32, i64)> = None;

    for (index, participant) in participants.into_iter().enumerate() {
        let position = index as i64 + 1;
        let rank = match previous {
            Some((score, rank)) if score == participant.score => rank,
            _ => position,
        };
        previous = Some((participant.score, rank));

        entries.push(LeaderboardEntry {
            rank,
            participant_id: participant.participant_id,
            user_id: participant.user_id,
            display_name: participant.display_name,
            score: participant.score,
        });
    }

    if let Some(limit) = display_count.and_then(|n| usize::try_from(n).ok()) {
        entries.truncate(limit);
    }

    entries
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;

    fn joined(name: &str, score: i32, minutes_ago: i64) -> ParticipantWithUser {
        ParticipantWithUser {
            participant_id: Uuid::new_v4(),
            tasting_id: Uuid::nil(),
            user_id: Uuid::new_v4(),
            display_name: name.to_string(),
            score,
            joined_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_display_count_truncates_after_ranking() {
        let participants = vec![joined("a", 10, 3), joined("b", 30, 2), joined("c", 20, 1)];

        let board = rank(participants, Some(2));

        assert_eq!(board.len(), 2);
        assert_eq!(board.iter().map(|e| e.score).collect::<Vec<_>>(), vec![30, 20]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn test_ties_keep_join_order_and_share_rank() {
        let participants = vec![
            joined("first", 12, 5),
            joined("second", 18, 4),
            joined("third", 12, 3),
            joined("fourth", 6, 2),
        ];

        let board = rank(participants, None);

        let names: Vec<_> = board.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["second", "first", "third", "fourth"]);
        let ranks: Vec<_> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 4]);
    }

    #[test]
    fn test_empty_and_oversized_limit() {
        assert!(rank(Vec::new(), Some(3)).is_empty());
        assert_eq!(rank(vec![joined("solo", 0, 1)], Some(10)).len(), 1);
    }
}
