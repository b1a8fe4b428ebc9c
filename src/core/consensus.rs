use crate::core::tally::FrequencyTable;
use crate::domain::model::{Day, FinalVoteSubmission};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayVoteStats {
    pub day: Day,
    pub available_count: usize,
    pub unavailable_count: usize,
}

impl DayVoteStats {
    pub fn is_conflict_free(&self) -> bool {
        self.unavailable_count == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsensusAggregate {
    pub vote_count: usize,
    /// One entry per candidate day, in candidate order, including unvoted days.
    pub stats: Vec<DayVoteStats>,
    pub zero_conflict_days: Vec<Day>,
    pub suggested_day: Option<Day>,
}

impl ConsensusAggregate {
    /// Days ranked by descending available count; ties keep candidate order.
    pub fn ranked_by_available(&self) -> Vec<DayVoteStats> {
        let mut ranked = self.stats.clone();
        ranked.sort_by(|a, b| b.available_count.cmp(&a.available_count));
        ranked
    }

    /// Days ranked by descending unavailable count; ties keep candidate order.
    pub fn ranked_by_unavailable(&self) -> Vec<DayVoteStats> {
        let mut ranked = self.stats.clone();
        ranked.sort_by(|a, b| b.unavailable_count.cmp(&a.unavailable_count));
        ranked
    }
}

/// Tallies final votes against the candidate days.
///
/// Votes naming a day outside `candidate_days` are still counted, appended
/// after the candidates in first-seen order, so no vote is silently lost.
pub fn aggregate_final_votes(votes: &[FinalVoteSubmission], candidate_days: &[Day]) -> ConsensusAggregate {
    let mut available = FrequencyTable::with_keys(candidate_days.iter().copied());
    let mut unavailable = FrequencyTable::with_keys(candidate_days.iter().copied());

    for vote in votes {
        available.increment(vote.available_day);
        unavailable.increment(vote.unavailable_day);
    }

    let mut days: Vec<Day> = candidate_days.to_vec();
    for vote in votes {
        for day in [vote.available_day, vote.unavailable_day] {
            if !days.contains(&day) {
                days.push(day);
            }
        }
    }

    let stats: Vec<DayVoteStats> = days
        .iter()
        .map(|&day| DayVoteStats {
            day,
            available_count: available.get(&day),
            unavailable_count: unavailable.get(&day),
        })
        .collect();

    let zero_conflict_days: Vec<Day> = stats
        .iter()
        .filter(|s| s.is_conflict_free())
        .map(|s| s.day)
        .collect();

    let suggested_day = stats
        .iter()
        .filter(|s| s.is_conflict_free())
        .fold(None::<&DayVoteStats>, |best, s| match best {
            Some(current) if current.available_count >= s.available_count => Some(current),
            _ => Some(s),
        })
        .map(|s| s.day);

    if suggested_day.is_none() {
        tracing::debug!(votes = votes.len(), "Every candidate day has an unavailable vote");
    }

    ConsensusAggregate {
        vote_count: votes.len(),
        stats,
        zero_conflict_days,
        suggested_day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(name: &str, available: Day, unavailable: Day) -> FinalVoteSubmission {
        FinalVoteSubmission::new(name, available, unavailable).unwrap()
    }

    fn stats_for(result: &ConsensusAggregate, day: Day) -> DayVoteStats {
        *result.stats.iter().find(|s| s.day == day).unwrap()
    }

    #[test]
    fn test_scenario_b_monday_is_suggested() {
        let votes = vec![
            vote("Alice", Day::Monday, Day::Tuesday),
            vote("Bob", Day::Monday, Day::Wednesday),
        ];
        let result = aggregate_final_votes(&votes, &Day::ALL);

        let monday = stats_for(&result, Day::Monday);
        assert_eq!((monday.available_count, monday.unavailable_count), (2, 0));
        assert_eq!(stats_for(&result, Day::Tuesday).unavailable_count, 1);
        assert_eq!(stats_for(&result, Day::Wednesday).unavailable_count, 1);
        assert_eq!(result.suggested_day, Some(Day::Monday));
    }

    #[test]
    fn test_scenario_c_no_consensus() {
        let days = [Day::Monday, Day::Tuesday, Day::Wednesday];
        let votes = vec![
            vote("Alice", Day::Monday, Day::Tuesday),
            vote("Bob", Day::Tuesday, Day::Wednesday),
            vote("Cara", Day::Tuesday, Day::Monday),
        ];
        let result = aggregate_final_votes(&votes, &days);

        assert!(result.zero_conflict_days.is_empty());
        assert_eq!(result.suggested_day, None);
    }

    #[test]
    fn test_unvoted_days_are_listed_with_zero_counts() {
        let result = aggregate_final_votes(&[], &Day::ALL);
        assert_eq!(result.stats.len(), 7);
        assert!(result.stats.iter().all(|s| s.available_count == 0 && s.unavailable_count == 0));
        assert_eq!(result.zero_conflict_days.len(), 7);
        // nobody voted, so the first conflict-free candidate wins the tie
        assert_eq!(result.suggested_day, Some(Day::Monday));
    }

    #[test]
    fn test_each_vote_adds_one_of_each() {
        let votes = vec![
            vote("Alice", Day::Friday, Day::Monday),
            vote("Bob", Day::Saturday, Day::Friday),
            vote("Cara", Day::Friday, Day::Sunday),
        ];
        let result = aggregate_final_votes(&votes, &Day::ALL);
        let available: usize = result.stats.iter().map(|s| s.available_count).sum();
        let unavailable: usize = result.stats.iter().map(|s| s.unavailable_count).sum();
        assert_eq!(available, votes.len());
        assert_eq!(unavailable, votes.len());
    }

    #[test]
    fn test_suggested_day_skips_conflicted_favourite() {
        let votes = vec![
            vote("Alice", Day::Friday, Day::Monday),
            vote("Bob", Day::Friday, Day::Tuesday),
            vote("Cara", Day::Thursday, Day::Friday),
        ];
        let result = aggregate_final_votes(&votes, &Day::ALL);
        assert_eq!(result.ranked_by_available()[0].day, Day::Friday);
        assert_eq!(result.suggested_day, Some(Day::Thursday));
    }

    #[test]
    fn test_rankings_keep_candidate_order_on_ties() {
        let votes = vec![
            vote("Alice", Day::Wednesday, Day::Sunday),
            vote("Bob", Day::Tuesday, Day::Saturday),
        ];
        let result = aggregate_final_votes(&votes, &Day::ALL);
        let top: Vec<_> = result.ranked_by_available().iter().take(3).map(|s| s.day).collect();
        assert_eq!(top, vec![Day::Tuesday, Day::Wednesday, Day::Monday]);
        let worst: Vec<_> = result.ranked_by_unavailable().iter().take(2).map(|s| s.day).collect();
        assert_eq!(worst, vec![Day::Saturday, Day::Sunday]);
    }

    #[test]
    fn test_votes_outside_candidates_are_kept() {
        let votes = vec![vote("Alice", Day::Saturday, Day::Monday)];
        let result = aggregate_final_votes(&votes, &[Day::Monday, Day::Tuesday]);
        assert_eq!(result.stats.len(), 3);
        assert_eq!(stats_for(&result, Day::Saturday).available_count, 1);
        assert_eq!(result.suggested_day, Some(Day::Saturday));
    }
}
