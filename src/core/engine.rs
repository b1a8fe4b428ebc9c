use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct TallyEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> TallyEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// One full fetch, aggregate and write cycle. Nothing is retried.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting tally run");

        let snapshot = self.pipeline.extract().await?;
        tracing::info!(
            "Fetched {} availability submissions and {} final votes",
            snapshot.availability.len(),
            snapshot.final_votes.len()
        );

        let report = self.pipeline.transform(snapshot).await?;
        match &report.recommendation.suggested_meeting_time {
            Some(best) => tracing::info!(
                "Suggested meeting: {} {} ({} participants)",
                best.day,
                best.time,
                best.count
            ),
            None => tracing::info!("No availability submissions yet"),
        }
        match report.consensus_recommendation.suggestion.day() {
            Some(day) => tracing::info!("Consensus day: {}", day),
            None => tracing::info!("No consensus day"),
        }

        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report saved to: {}", output_path);

        Ok(output_path)
    }
}
