use crate::utils::error::{Result, TallyError};
use crate::utils::validation::require_non_empty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Calendar order, used as the default candidate list for final votes.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self, Day::Saturday | Day::Sunday)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = TallyError;

    /// Accepts full English names or three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| {
                let name = day.as_str().to_ascii_lowercase();
                name == needle || (needle.len() == 3 && name.starts_with(&needle))
            })
            .ok_or_else(|| TallyError::validation("day", format!("unknown day '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPreference {
    Weekday,
    Weekend,
}

impl PeriodPreference {
    /// Label used as the key of the period frequency table.
    pub fn label(&self) -> &'static str {
        match self {
            PeriodPreference::Weekday => "Weekday",
            PeriodPreference::Weekend => "Weekend",
        }
    }
}

impl fmt::Display for PeriodPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PeriodPreference {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekday" => Ok(PeriodPreference::Weekday),
            "weekend" => Ok(PeriodPreference::Weekend),
            other => Err(TallyError::validation(
                "period",
                format!("expected 'weekday' or 'weekend', got '{}'", other),
            )),
        }
    }
}

/// A preferred meeting time as entered, e.g. `"21:00"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(String);

impl TimeSlot {
    pub fn new(value: &str) -> Result<Self> {
        require_non_empty("time", value)?;
        Ok(Self(value.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySubmission {
    pub participant_name: String,
    pub period_preference: PeriodPreference,
    /// Distinct days in the order the participant picked them.
    pub available_days: Vec<Day>,
    pub preferred_time: TimeSlot,
}

impl AvailabilitySubmission {
    pub fn new(
        participant_name: &str,
        period_preference: PeriodPreference,
        available_days: &[Day],
        preferred_time: &str,
    ) -> Result<Self> {
        require_non_empty("name", participant_name)?;
        if available_days.is_empty() {
            return Err(TallyError::validation("days", "select at least one day"));
        }

        let mut days = Vec::with_capacity(available_days.len());
        for day in available_days {
            if !days.contains(day) {
                days.push(*day);
            }
        }

        Ok(Self {
            participant_name: participant_name.trim().to_string(),
            period_preference,
            available_days: days,
            preferred_time: TimeSlot::new(preferred_time)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalVoteSubmission {
    pub participant_name: String,
    pub available_day: Day,
    pub unavailable_day: Day,
}

impl FinalVoteSubmission {
    pub fn new(participant_name: &str, available_day: Day, unavailable_day: Day) -> Result<Self> {
        require_non_empty("name", participant_name)?;
        if available_day == unavailable_day {
            return Err(TallyError::validation(
                "unavailable_day",
                format!("{} cannot be both available and unavailable", available_day),
            ));
        }
        Ok(Self {
            participant_name: participant_name.trim().to_string(),
            available_day,
            unavailable_day,
        })
    }
}

/// Editable input for the availability form. Kept as-is on failure so the
/// participant can correct it; reset after a confirmed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityForm {
    pub name: String,
    pub period: Option<PeriodPreference>,
    pub days: Vec<Day>,
    pub time: String,
}

impl Default for AvailabilityForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            period: Some(PeriodPreference::Weekday),
            days: Vec::new(),
            time: String::new(),
        }
    }
}

impl AvailabilityForm {
    pub fn to_submission(&self) -> Result<AvailabilitySubmission> {
        let period = self
            .period
            .ok_or_else(|| TallyError::validation("period", "is required"))?;
        AvailabilitySubmission::new(&self.name, period, &self.days, &self.time)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalVoteForm {
    pub name: String,
    pub available_day: Option<Day>,
    pub unavailable_day: Option<Day>,
}

impl FinalVoteForm {
    pub fn to_submission(&self) -> Result<FinalVoteSubmission> {
        let available = self
            .available_day
            .ok_or_else(|| TallyError::validation("available_day", "is required"))?;
        let unavailable = self
            .unavailable_day
            .ok_or_else(|| TallyError::validation("unavailable_day", "is required"))?;
        FinalVoteSubmission::new(&self.name, available, unavailable)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Row shape of the availability table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub name: String,
    pub weekdayorweekend: PeriodPreference,
    pub days: Vec<Day>,
    pub time: String,
}

impl From<&AvailabilitySubmission> for AvailabilityRow {
    fn from(submission: &AvailabilitySubmission) -> Self {
        Self {
            id: None,
            created_at: None,
            name: submission.participant_name.clone(),
            weekdayorweekend: submission.period_preference,
            days: submission.available_days.clone(),
            time: submission.preferred_time.to_string(),
        }
    }
}

impl TryFrom<AvailabilityRow> for AvailabilitySubmission {
    type Error = TallyError;

    fn try_from(row: AvailabilityRow) -> Result<Self> {
        AvailabilitySubmission::new(&row.name, row.weekdayorweekend, &row.days, &row.time)
    }
}

/// Row shape of the final vote table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalVoteRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub name: String,
    pub available_day: Day,
    pub unavailable_day: Day,
}

impl From<&FinalVoteSubmission> for FinalVoteRow {
    fn from(vote: &FinalVoteSubmission) -> Self {
        Self {
            id: None,
            created_at: None,
            name: vote.participant_name.clone(),
            available_day: vote.available_day,
            unavailable_day: vote.unavailable_day,
        }
    }
}

impl TryFrom<FinalVoteRow> for FinalVoteSubmission {
    type Error = TallyError;

    fn try_from(row: FinalVoteRow) -> Result<Self> {
        FinalVoteSubmission::new(&row.name, row.available_day, row.unavailable_day)
    }
}

/// Everything the aggregators need, read from the store in one pass.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub availability: Vec<AvailabilitySubmission>,
    pub final_votes: Vec<FinalVoteSubmission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_from_str_accepts_names_and_abbreviations() {
        assert_eq!("monday".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("Sat".parse::<Day>().unwrap(), Day::Saturday);
        assert_eq!(" Sunday ".parse::<Day>().unwrap(), Day::Sunday);
        assert!("Mo".parse::<Day>().is_err());
        assert!("Funday".parse::<Day>().is_err());
    }

    #[test]
    fn test_submission_requires_fields() {
        assert!(AvailabilitySubmission::new("", PeriodPreference::Weekday, &[Day::Monday], "21:00").is_err());
        assert!(AvailabilitySubmission::new("Alice", PeriodPreference::Weekday, &[], "21:00").is_err());
        assert!(AvailabilitySubmission::new("Alice", PeriodPreference::Weekday, &[Day::Monday], " ").is_err());
    }

    #[test]
    fn test_submission_dedupes_days_in_pick_order() {
        let submission = AvailabilitySubmission::new(
            "Alice",
            PeriodPreference::Weekend,
            &[Day::Sunday, Day::Saturday, Day::Sunday],
            "10:00",
        )
        .unwrap();
        assert_eq!(submission.available_days, vec![Day::Sunday, Day::Saturday]);
    }

    #[test]
    fn test_final_vote_rejects_same_day() {
        let err = FinalVoteSubmission::new("Alice", Day::Monday, Day::Monday).unwrap_err();
        assert!(matches!(err, TallyError::ValidationError { .. }));
    }

    #[test]
    fn test_form_defaults_to_weekday() {
        let mut form = AvailabilityForm {
            name: "Alice".to_string(),
            period: Some(PeriodPreference::Weekend),
            days: vec![Day::Saturday],
            time: "10:00".to_string(),
        };
        form.reset();
        assert_eq!(form, AvailabilityForm::default());
        assert_eq!(form.period, Some(PeriodPreference::Weekday));
    }

    #[test]
    fn test_form_without_period_is_rejected() {
        let form = AvailabilityForm {
            name: "Alice".to_string(),
            period: None,
            days: vec![Day::Monday],
            time: "21:00".to_string(),
        };
        let err = form.to_submission().unwrap_err();
        assert!(matches!(err, TallyError::ValidationError { ref field, .. } if field == "period"));
    }

    #[test]
    fn test_availability_row_wire_shape() {
        let row: AvailabilityRow = serde_json::from_value(serde_json::json!({
            "id": 7,
            "created_at": "2024-05-01T10:00:00Z",
            "name": "Alice",
            "weekdayorweekend": "weekday",
            "days": ["Monday", "Tuesday"],
            "time": "21:00"
        }))
        .unwrap();
        assert_eq!(row.id, Some(7));
        assert_eq!(row.days, vec![Day::Monday, Day::Tuesday]);

        let submission = AvailabilitySubmission::try_from(row).unwrap();
        let outgoing = serde_json::to_value(AvailabilityRow::from(&submission)).unwrap();
        assert_eq!(
            outgoing,
            serde_json::json!({
                "name": "Alice",
                "weekdayorweekend": "weekday",
                "days": ["Monday", "Tuesday"],
                "time": "21:00"
            })
        );
    }

    #[test]
    fn test_row_with_unknown_day_fails_to_decode() {
        let result: std::result::Result<FinalVoteRow, _> = serde_json::from_value(serde_json::json!({
            "name": "Bob",
            "available_day": "Someday",
            "unavailable_day": "Monday"
        }));
        assert!(result.is_err());
    }
}
