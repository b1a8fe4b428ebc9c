//! Text, CSV and JSON renderings of a [`TallyReport`].

use crate::core::availability::{AvailabilityAggregate, DayTimeCombination};
use crate::core::consensus::{ConsensusAggregate, DayVoteStats};
use crate::core::recommend::{ConsensusRecommendation, DaySuggestion, Recommendation};
use crate::core::tally::Count;
use crate::report::TallyReport;
use crate::utils::error::{Result, TallyError};
use std::fmt::{Display, Write};

pub const NO_DATA: &str = "No data yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl ReportFile {
    fn new(name: &str, contents: String) -> Self {
        Self {
            name: name.to_string(),
            contents: contents.into_bytes(),
        }
    }
}

fn describe_combination(combination: &DayTimeCombination) -> String {
    format!(
        "{} {} ({}: {})",
        combination.day,
        combination.time,
        combination.count,
        combination.participants.join(", ")
    )
}

fn write_counts<K: Display>(out: &mut String, title: &str, counts: &[Count<K>]) {
    let _ = writeln!(out, "  {}:", title);
    for entry in counts {
        let _ = writeln!(out, "    {:<10} {}", entry.key.to_string(), entry.count);
    }
}

pub fn render_availability_text(aggregate: &AvailabilityAggregate, recommendation: &Recommendation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Availability ({} submissions)", aggregate.submission_count);

    if aggregate.is_empty() {
        let _ = writeln!(out, "  {}", NO_DATA);
        return out;
    }

    let time = aggregate
        .most_common_time
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_else(|| NO_DATA.to_string());
    let period = aggregate.most_common_period.as_deref().unwrap_or(NO_DATA);
    let _ = writeln!(out, "  Most popular time:   {}", time);
    let _ = writeln!(out, "  Most popular period: {}", period);

    write_counts(&mut out, "Days", &aggregate.day_stats);
    write_counts(&mut out, "Times", &aggregate.time_stats);
    write_counts(&mut out, "Periods", &aggregate.period_stats);

    match &recommendation.suggested_meeting_time {
        Some(best) => {
            let _ = writeln!(out, "  Suggested meeting: {}", describe_combination(best));
        }
        None => {
            let _ = writeln!(out, "  Suggested meeting: {}", NO_DATA);
        }
    }
    let _ = writeln!(out, "  Top meeting times:");
    for (rank, combination) in recommendation.top_meeting_times.iter().enumerate() {
        let _ = writeln!(out, "    {}. {}", rank + 1, describe_combination(combination));
    }

    out
}

fn write_day_ranking(out: &mut String, title: &str, days: &[DayVoteStats], available: bool) {
    let _ = writeln!(out, "  {}:", title);
    for stats in days {
        let count = if available {
            stats.available_count
        } else {
            stats.unavailable_count
        };
        let _ = writeln!(out, "    {:<10} {}", stats.day.to_string(), count);
    }
}

pub fn render_consensus_text(aggregate: &ConsensusAggregate, recommendation: &ConsensusRecommendation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Final votes ({} votes)", aggregate.vote_count);

    if aggregate.vote_count == 0 {
        let _ = writeln!(out, "  {}", NO_DATA);
        return out;
    }

    match &recommendation.suggestion {
        DaySuggestion::Suggested {
            day,
            available_count,
            display_time,
        } => {
            let at = display_time
                .as_deref()
                .map(|t| format!(" at {}", t))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  Suggested day: {}{} ({} available, nobody unavailable)",
                day, at, available_count
            );
        }
        DaySuggestion::NoConsensus => {
            let _ = writeln!(
                out,
                "  No consensus day: every day has at least one unavailable vote"
            );
        }
    }

    write_day_ranking(&mut out, "Most available", &recommendation.top_available_days, true);
    write_day_ranking(&mut out, "Most unavailable", &recommendation.top_unavailable_days, false);

    let conflict_free: Vec<String> = aggregate
        .zero_conflict_days
        .iter()
        .map(|d| d.to_string())
        .collect();
    let _ = writeln!(
        out,
        "  Conflict-free days: {}",
        if conflict_free.is_empty() {
            "none".to_string()
        } else {
            conflict_free.join(", ")
        }
    );

    out
}

pub fn render_text(report: &TallyReport) -> String {
    let mut out = render_availability_text(&report.availability, &report.recommendation);
    out.push('\n');
    out.push_str(&render_consensus_text(
        &report.consensus,
        &report.consensus_recommendation,
    ));
    out
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| TallyError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| TallyError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

pub fn counts_csv<K: Display>(key_header: &str, counts: &[Count<K>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([key_header, "count"])?;
    for entry in counts {
        writer.write_record([entry.key.to_string(), entry.count.to_string()])?;
    }
    finish_csv(writer)
}

pub fn combinations_csv(combinations: &[DayTimeCombination]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["rank", "day", "time", "count", "participants"])?;
    for (rank, combination) in combinations.iter().enumerate() {
        writer.write_record([
            (rank + 1).to_string(),
            combination.day.to_string(),
            combination.time.to_string(),
            combination.count.to_string(),
            combination.participants.join(";"),
        ])?;
    }
    finish_csv(writer)
}

pub fn final_votes_csv(aggregate: &ConsensusAggregate) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["day", "available", "unavailable", "conflict_free"])?;
    for stats in &aggregate.stats {
        writer.write_record([
            stats.day.to_string(),
            stats.available_count.to_string(),
            stats.unavailable_count.to_string(),
            stats.is_conflict_free().to_string(),
        ])?;
    }
    finish_csv(writer)
}

/// Renders every requested format; unknown format names are ignored here and
/// rejected earlier by config validation.
pub fn render_files(report: &TallyReport, formats: &[String]) -> Result<Vec<ReportFile>> {
    let mut files = Vec::new();

    for format in formats {
        match format.as_str() {
            "csv" => {
                files.push(ReportFile::new(
                    "day_stats.csv",
                    counts_csv("day", &report.availability.day_stats)?,
                ));
                files.push(ReportFile::new(
                    "time_stats.csv",
                    counts_csv("time", &report.availability.time_stats)?,
                ));
                files.push(ReportFile::new(
                    "period_stats.csv",
                    counts_csv("period", &report.availability.period_stats)?,
                ));
                files.push(ReportFile::new(
                    "combinations.csv",
                    combinations_csv(&report.availability.combinations)?,
                ));
                files.push(ReportFile::new(
                    "final_votes.csv",
                    final_votes_csv(&report.consensus)?,
                ));
            }
            "json" => {
                files.push(ReportFile::new(
                    "summary.json",
                    serde_json::to_string_pretty(report)?,
                ));
            }
            "txt" => {
                files.push(ReportFile::new("summary.txt", render_text(report)));
            }
            other => {
                tracing::warn!("Skipping unknown output format: {}", other);
            }
        }
    }

    Ok(files)
}
