use crate::core::availability::{aggregate, AvailabilityAggregate};
use crate::core::consensus::{aggregate_final_votes, ConsensusAggregate};
use crate::core::recommend::{recommend, recommend_day, ConsensusRecommendation, Recommendation};
use crate::domain::model::{
    AvailabilityForm, AvailabilityRow, AvailabilitySubmission, FinalVoteForm, FinalVoteRow,
    FinalVoteSubmission, Snapshot,
};
use crate::domain::ports::{ConfigProvider, RecordStore};
use crate::utils::error::{Result, StoreOperation, TallyError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityView {
    pub aggregate: AvailabilityAggregate,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusView {
    pub aggregate: ConsensusAggregate,
    pub recommendation: ConsensusRecommendation,
}

pub async fn fetch_availability<R: RecordStore>(store: &R, table: &str) -> Result<Vec<AvailabilitySubmission>> {
    let rows: Vec<AvailabilityRow> = store.fetch_all(table).await?;
    rows.into_iter()
        .map(|row| {
            let id = row.id;
            AvailabilitySubmission::try_from(row).map_err(|e| invalid_row(table, id, e))
        })
        .collect()
}

pub async fn fetch_final_votes<R: RecordStore>(store: &R, table: &str) -> Result<Vec<FinalVoteSubmission>> {
    let rows: Vec<FinalVoteRow> = store.fetch_all(table).await?;
    rows.into_iter()
        .map(|row| {
            let id = row.id;
            FinalVoteSubmission::try_from(row).map_err(|e| invalid_row(table, id, e))
        })
        .collect()
}

fn invalid_row(table: &str, id: Option<i64>, cause: TallyError) -> TallyError {
    let row = id.map(|id| format!("row {}", id)).unwrap_or_else(|| "row".to_string());
    TallyError::store(table, StoreOperation::Fetch, None, format!("{} is invalid: {}", row, cause))
}

/// Validates and stores one submission at a time, then recomputes the
/// aggregate from the full table.
pub struct SubmissionCollector<R: RecordStore, C: ConfigProvider> {
    store: R,
    config: C,
}

impl<R: RecordStore, C: ConfigProvider> SubmissionCollector<R, C> {
    pub fn new(store: R, config: C) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    /// Validation failures never reach the store and leave `form` untouched.
    /// The form is reset once the store confirms the append; a refresh that
    /// fails afterwards is still reported, but the submission stands.
    pub async fn submit_availability(&self, form: &mut AvailabilityForm) -> Result<AvailabilityView> {
        let submission = form.to_submission().inspect_err(|e| {
            tracing::warn!("Rejected availability submission: {}", e);
        })?;

        self.store
            .append(self.config.availability_table(), &AvailabilityRow::from(&submission))
            .await?;
        tracing::info!(
            participant = %submission.participant_name,
            days = submission.available_days.len(),
            time = %submission.preferred_time,
            "Saved availability"
        );
        form.reset();

        self.refresh_availability().await
    }

    pub async fn submit_final_vote(&self, form: &mut FinalVoteForm) -> Result<ConsensusView> {
        let vote = form.to_submission().inspect_err(|e| {
            tracing::warn!("Rejected final vote: {}", e);
        })?;

        self.store
            .append(self.config.final_vote_table(), &FinalVoteRow::from(&vote))
            .await?;
        tracing::info!(
            participant = %vote.participant_name,
            available = %vote.available_day,
            unavailable = %vote.unavailable_day,
            "Saved final vote"
        );
        form.reset();

        self.refresh_consensus().await
    }

    pub async fn refresh_availability(&self) -> Result<AvailabilityView> {
        let submissions = fetch_availability(&self.store, self.config.availability_table()).await?;
        let aggregate = aggregate(&submissions);
        let recommendation = recommend(&aggregate, self.config.top_n());
        Ok(AvailabilityView {
            aggregate,
            recommendation,
        })
    }

    pub async fn refresh_consensus(&self) -> Result<ConsensusView> {
        let votes = fetch_final_votes(&self.store, self.config.final_vote_table()).await?;
        let aggregate = aggregate_final_votes(&votes, self.config.candidate_days());
        let recommendation = recommend_day(&aggregate, self.config.top_n(), self.config.display_time());
        Ok(ConsensusView {
            aggregate,
            recommendation,
        })
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            availability: fetch_availability(&self.store, self.config.availability_table()).await?,
            final_votes: fetch_final_votes(&self.store, self.config.final_vote_table()).await?,
        })
    }
}
