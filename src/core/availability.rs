use crate::core::tally::{Count, FrequencyTable};
use crate::domain::model::{AvailabilitySubmission, Day, TimeSlot};
use serde::Serialize;
use std::collections::HashMap;

/// One observed (day, time) pair and who can make it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTimeCombination {
    pub day: Day,
    pub time: TimeSlot,
    pub count: usize,
    /// Names in submission order; `count == participants.len()`.
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityAggregate {
    pub submission_count: usize,
    pub day_stats: Vec<Count<Day>>,
    pub time_stats: Vec<Count<TimeSlot>>,
    pub period_stats: Vec<Count<String>>,
    /// Sorted by descending count, ties in first-seen order.
    pub combinations: Vec<DayTimeCombination>,
    pub most_common_time: Option<TimeSlot>,
    pub most_common_period: Option<String>,
}

impl AvailabilityAggregate {
    pub fn is_empty(&self) -> bool {
        self.submission_count == 0
    }
}

/// Tallies every submission. Pure: the same slice always yields the same
/// tables and the same combination ranking.
pub fn aggregate(submissions: &[AvailabilitySubmission]) -> AvailabilityAggregate {
    let mut day_count = FrequencyTable::new();
    let mut time_count = FrequencyTable::new();
    let mut period_count = FrequencyTable::new();
    let mut combinations: Vec<DayTimeCombination> = Vec::new();
    let mut combination_index: HashMap<(Day, TimeSlot), usize> = HashMap::new();

    for submission in submissions {
        for &day in &submission.available_days {
            day_count.increment(day);

            let key = (day, submission.preferred_time.clone());
            let position = *combination_index.entry(key).or_insert_with(|| {
                combinations.push(DayTimeCombination {
                    day,
                    time: submission.preferred_time.clone(),
                    count: 0,
                    participants: Vec::new(),
                });
                combinations.len() - 1
            });
            let combination = &mut combinations[position];
            combination.count += 1;
            combination
                .participants
                .push(submission.participant_name.clone());
        }

        time_count.increment(submission.preferred_time.clone());
        period_count.increment(submission.period_preference.label().to_string());
    }

    // stable: equal counts stay in first-seen order
    combinations.sort_by(|a, b| b.count.cmp(&a.count));

    tracing::debug!(
        submissions = submissions.len(),
        days = day_count.len(),
        times = time_count.len(),
        combinations = combinations.len(),
        "Aggregated availability"
    );

    AvailabilityAggregate {
        submission_count: submissions.len(),
        most_common_time: time_count.most_common().map(|entry| entry.key.clone()),
        most_common_period: period_count.most_common().map(|entry| entry.key.clone()),
        day_stats: day_count.into_entries(),
        time_stats: time_count.into_entries(),
        period_stats: period_count.into_entries(),
        combinations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PeriodPreference;

    fn submission(name: &str, period: PeriodPreference, days: &[Day], time: &str) -> AvailabilitySubmission {
        AvailabilitySubmission::new(name, period, days, time).unwrap()
    }

    fn scenario_a() -> Vec<AvailabilitySubmission> {
        vec![
            submission("Alice", PeriodPreference::Weekday, &[Day::Monday], "21:00"),
            submission("Bob", PeriodPreference::Weekday, &[Day::Monday], "21:00"),
            submission("Cara", PeriodPreference::Weekday, &[Day::Tuesday], "09:00"),
        ]
    }

    fn mixed() -> Vec<AvailabilitySubmission> {
        vec![
            submission("Alice", PeriodPreference::Weekday, &[Day::Monday, Day::Wednesday], "21:00"),
            submission("Bob", PeriodPreference::Weekend, &[Day::Saturday, Day::Sunday, Day::Monday], "10:00"),
            submission("Cara", PeriodPreference::Weekday, &[Day::Wednesday], "21:00"),
            submission("Dan", PeriodPreference::Weekend, &[Day::Saturday], "10:00"),
            submission("Eve", PeriodPreference::Weekday, &[Day::Monday], "18:00"),
        ]
    }

    #[test]
    fn test_scenario_a_day_stats_and_top_combination() {
        let result = aggregate(&scenario_a());

        assert_eq!(
            result.day_stats,
            vec![
                Count { key: Day::Monday, count: 2 },
                Count { key: Day::Tuesday, count: 1 },
            ]
        );
        let top = &result.combinations[0];
        assert_eq!(top.day, Day::Monday);
        assert_eq!(top.time.as_str(), "21:00");
        assert_eq!(top.count, 2);
        assert_eq!(top.participants, vec!["Alice", "Bob"]);
        assert_eq!(result.most_common_time.as_ref().unwrap().as_str(), "21:00");
        assert_eq!(result.most_common_period.as_deref(), Some("Weekday"));
    }

    #[test]
    fn test_sums_match_submissions() {
        let submissions = mixed();
        let result = aggregate(&submissions);
        let total_days: usize = submissions.iter().map(|s| s.available_days.len()).sum();

        assert_eq!(result.day_stats.iter().map(|c| c.count).sum::<usize>(), total_days);
        assert_eq!(result.time_stats.iter().map(|c| c.count).sum::<usize>(), submissions.len());
        assert_eq!(result.period_stats.iter().map(|c| c.count).sum::<usize>(), submissions.len());
        assert_eq!(result.combinations.iter().map(|c| c.count).sum::<usize>(), total_days);
        for combination in &result.combinations {
            assert_eq!(combination.count, combination.participants.len());
        }
    }

    #[test]
    fn test_combinations_sorted_with_first_seen_ties() {
        let result = aggregate(&mixed());
        let counts: Vec<_> = result.combinations.iter().map(|c| c.count).collect();
        assert!(counts.windows(2).all(|pair| pair[0] >= pair[1]));

        let order: Vec<_> = result
            .combinations
            .iter()
            .map(|c| (c.day, c.time.as_str().to_string(), c.count))
            .collect();
        assert_eq!(
            order,
            vec![
                (Day::Wednesday, "21:00".to_string(), 2),
                (Day::Saturday, "10:00".to_string(), 2),
                (Day::Monday, "21:00".to_string(), 1),
                (Day::Sunday, "10:00".to_string(), 1),
                (Day::Monday, "10:00".to_string(), 1),
                (Day::Monday, "18:00".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_most_common_time_tie_goes_to_first_seen() {
        let submissions = vec![
            submission("Alice", PeriodPreference::Weekend, &[Day::Friday], "18:00"),
            submission("Bob", PeriodPreference::Weekday, &[Day::Friday], "09:00"),
        ];
        let result = aggregate(&submissions);
        assert_eq!(result.most_common_time.unwrap().as_str(), "18:00");
        assert_eq!(result.most_common_period.as_deref(), Some("Weekend"));
    }

    #[test]
    fn test_empty_input_has_no_most_common() {
        let result = aggregate(&[]);
        assert!(result.is_empty());
        assert!(result.combinations.is_empty());
        assert!(result.most_common_time.is_none());
        assert!(result.most_common_period.is_none());
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let submissions = mixed();
        assert_eq!(aggregate(&submissions), aggregate(&submissions));
    }
}
