pub mod render;

use crate::core::availability::{aggregate, AvailabilityAggregate};
use crate::core::consensus::{aggregate_final_votes, ConsensusAggregate};
use crate::core::recommend::{recommend, recommend_day, ConsensusRecommendation, Recommendation};
use crate::domain::model::{Day, Snapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one aggregation pass over both tables.
#[derive(Debug, Clone, Serialize)]
pub struct TallyReport {
    pub generated_at: DateTime<Utc>,
    pub availability: AvailabilityAggregate,
    pub recommendation: Recommendation,
    pub consensus: ConsensusAggregate,
    pub consensus_recommendation: ConsensusRecommendation,
}

impl TallyReport {
    pub fn build(
        snapshot: &Snapshot,
        top_n: usize,
        candidate_days: &[Day],
        display_time: Option<&str>,
    ) -> Self {
        let availability = aggregate(&snapshot.availability);
        let recommendation = recommend(&availability, top_n);
        let consensus = aggregate_final_votes(&snapshot.final_votes, candidate_days);
        let consensus_recommendation = recommend_day(&consensus, top_n, display_time);

        Self {
            generated_at: Utc::now(),
            availability,
            recommendation,
            consensus,
            consensus_recommendation,
        }
    }
}
