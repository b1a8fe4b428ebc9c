use crate::core::availability::{AvailabilityAggregate, DayTimeCombination};
use crate::core::consensus::{ConsensusAggregate, DayVoteStats};
use crate::domain::model::Day;
use serde::Serialize;

pub const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// `None` until at least one submission exists.
    pub suggested_meeting_time: Option<DayTimeCombination>,
    pub top_meeting_times: Vec<DayTimeCombination>,
}

pub fn recommend(aggregate: &AvailabilityAggregate, top_n: usize) -> Recommendation {
    let top_meeting_times: Vec<DayTimeCombination> =
        aggregate.combinations.iter().take(top_n).cloned().collect();

    Recommendation {
        suggested_meeting_time: aggregate.combinations.first().cloned(),
        top_meeting_times,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DaySuggestion {
    Suggested {
        day: Day,
        available_count: usize,
        /// Only present when a display time is configured; final votes carry no time.
        #[serde(skip_serializing_if = "Option::is_none")]
        display_time: Option<String>,
    },
    NoConsensus,
}

impl DaySuggestion {
    pub fn day(&self) -> Option<Day> {
        match self {
            DaySuggestion::Suggested { day, .. } => Some(*day),
            DaySuggestion::NoConsensus => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsensusRecommendation {
    pub suggestion: DaySuggestion,
    pub top_available_days: Vec<DayVoteStats>,
    pub top_unavailable_days: Vec<DayVoteStats>,
}

pub fn recommend_day(
    aggregate: &ConsensusAggregate,
    top_n: usize,
    display_time: Option<&str>,
) -> ConsensusRecommendation {
    let suggestion = match aggregate.suggested_day {
        Some(day) => DaySuggestion::Suggested {
            day,
            available_count: aggregate
                .stats
                .iter()
                .find(|s| s.day == day)
                .map(|s| s.available_count)
                .unwrap_or(0),
            display_time: display_time.map(str::to_string),
        },
        None => DaySuggestion::NoConsensus,
    };

    let mut top_available_days = aggregate.ranked_by_available();
    top_available_days.truncate(top_n);
    let mut top_unavailable_days = aggregate.ranked_by_unavailable();
    top_unavailable_days.truncate(top_n);

    ConsensusRecommendation {
        suggestion,
        top_available_days,
        top_unavailable_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::availability::aggregate;
    use crate::core::consensus::aggregate_final_votes;
    use crate::domain::model::{AvailabilitySubmission, FinalVoteSubmission, PeriodPreference};

    fn availability(entries: &[(&str, Vec<Day>, &str)]) -> AvailabilityAggregate {
        let submissions: Vec<_> = entries
            .iter()
            .map(|(name, days, time)| {
                AvailabilitySubmission::new(name, PeriodPreference::Weekday, days, time).unwrap()
            })
            .collect();
        aggregate(&submissions)
    }

    #[test]
    fn test_suggestion_is_head_of_top_list() {
        let result = availability(&[
            ("Alice", vec![Day::Monday, Day::Tuesday], "21:00"),
            ("Bob", vec![Day::Monday], "21:00"),
            ("Cara", vec![Day::Friday, Day::Thursday], "09:00"),
        ]);
        let recommendation = recommend(&result, DEFAULT_TOP_N);

        assert_eq!(recommendation.top_meeting_times.len(), 3);
        assert_eq!(
            recommendation.suggested_meeting_time.as_ref(),
            recommendation.top_meeting_times.first()
        );
        let best = recommendation.suggested_meeting_time.unwrap();
        assert_eq!((best.day, best.count), (Day::Monday, 2));
    }

    #[test]
    fn test_top_list_shorter_than_n() {
        let result = availability(&[("Alice", vec![Day::Monday], "21:00")]);
        let recommendation = recommend(&result, DEFAULT_TOP_N);
        assert_eq!(recommendation.top_meeting_times.len(), 1);
    }

    #[test]
    fn test_empty_aggregate_has_no_suggestion() {
        let recommendation = recommend(&aggregate(&[]), DEFAULT_TOP_N);
        assert!(recommendation.suggested_meeting_time.is_none());
        assert!(recommendation.top_meeting_times.is_empty());
    }

    #[test]
    fn test_day_suggestion_carries_configured_time_only() {
        let votes = vec![FinalVoteSubmission::new("Alice", Day::Monday, Day::Tuesday).unwrap()];
        let consensus = aggregate_final_votes(&votes, &Day::ALL);

        let without_time = recommend_day(&consensus, DEFAULT_TOP_N, None);
        assert_eq!(
            without_time.suggestion,
            DaySuggestion::Suggested {
                day: Day::Monday,
                available_count: 1,
                display_time: None
            }
        );

        let with_time = recommend_day(&consensus, DEFAULT_TOP_N, Some("20:00"));
        assert!(matches!(
            with_time.suggestion,
            DaySuggestion::Suggested { display_time: Some(ref t), .. } if t == "20:00"
        ));
        assert_eq!(with_time.top_available_days.len(), 3);
        assert_eq!(with_time.top_unavailable_days[0].day, Day::Tuesday);
    }

    #[test]
    fn test_no_consensus_is_distinct_state() {
        let days = [Day::Monday, Day::Tuesday];
        let votes = vec![
            FinalVoteSubmission::new("Alice", Day::Monday, Day::Tuesday).unwrap(),
            FinalVoteSubmission::new("Bob", Day::Tuesday, Day::Monday).unwrap(),
        ];
        let consensus = aggregate_final_votes(&votes, &days);
        let recommendation = recommend_day(&consensus, DEFAULT_TOP_N, Some("20:00"));
        assert_eq!(recommendation.suggestion, DaySuggestion::NoConsensus);
        assert_eq!(recommendation.suggestion.day(), None);
        assert_eq!(
            serde_json::to_value(&recommendation.suggestion).unwrap(),
            serde_json::json!({"status": "no_consensus"})
        );
    }
}
