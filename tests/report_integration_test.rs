use meet_tally::{
    AvailabilityForm, Day, FileRecordStore, FinalVoteForm, LocalStorage, PeriodPreference,
    ReportPipeline, SubmissionCollector, TallyEngine, TomlConfig,
};
use tempfile::TempDir;

async fn seed(data_dir: &str, config: &TomlConfig) {
    let collector = SubmissionCollector::new(FileRecordStore::new(LocalStorage::new(data_dir)), config.clone());

    for (name, period, days, time) in [
        ("Alice", PeriodPreference::Weekday, vec![Day::Monday, Day::Tuesday], "21:00"),
        ("Bob", PeriodPreference::Weekday, vec![Day::Monday], "21:00"),
        ("Cara", PeriodPreference::Weekend, vec![Day::Saturday], "10:00"),
    ] {
        let mut form = AvailabilityForm {
            name: name.to_string(),
            period: Some(period),
            days,
            time: time.to_string(),
        };
        collector.submit_availability(&mut form).await.unwrap();
    }

    for (name, available, unavailable) in [
        ("Alice", Day::Monday, Day::Saturday),
        ("Bob", Day::Tuesday, Day::Sunday),
    ] {
        let mut form = FinalVoteForm {
            name: name.to_string(),
            available_day: Some(available),
            unavailable_day: Some(unavailable),
        };
        collector.submit_final_vote(&mut form).await.unwrap();
    }
}

#[tokio::test]
async fn test_end_to_end_report_from_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("data").to_str().unwrap().to_string();
    let output_path = temp_dir.path().join("report").to_str().unwrap().to_string();

    let mut config = TomlConfig::default();
    config.store.data_dir = data_dir.clone();
    config.report.output_path = output_path.clone();
    config.report.output_formats = vec!["csv".to_string(), "json".to_string(), "txt".to_string()];
    config.consensus.display_time = Some("20:00".to_string());

    seed(&data_dir, &config).await;

    let pipeline = ReportPipeline::new(
        FileRecordStore::new(LocalStorage::new(data_dir.as_str())),
        LocalStorage::new(output_path.as_str()),
        config,
    );
    let result = TallyEngine::new(pipeline).run().await.unwrap();
    assert_eq!(result, output_path);

    let report_dir = std::path::Path::new(&output_path);
    for name in [
        "day_stats.csv",
        "time_stats.csv",
        "period_stats.csv",
        "combinations.csv",
        "final_votes.csv",
        "summary.json",
        "summary.txt",
    ] {
        assert!(report_dir.join(name).exists(), "missing {}", name);
    }

    let combinations = std::fs::read_to_string(report_dir.join("combinations.csv")).unwrap();
    assert!(combinations.contains("1,Monday,21:00,2,Alice;Bob"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["availability"]["submission_count"], 3);
    assert_eq!(summary["consensus_recommendation"]["suggestion"]["day"], "Monday");
    assert_eq!(summary["consensus_recommendation"]["suggestion"]["display_time"], "20:00");

    let text = std::fs::read_to_string(report_dir.join("summary.txt")).unwrap();
    assert!(text.contains("Suggested day: Monday at 20:00"));
}

#[tokio::test]
async fn test_empty_store_still_produces_report() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("report").to_str().unwrap().to_string();

    let mut config = TomlConfig::default();
    config.report.output_path = output_path.clone();
    config.report.output_formats = vec!["json".to_string()];

    let pipeline = ReportPipeline::new(
        FileRecordStore::new(LocalStorage::new(temp_dir.path().join("empty"))),
        LocalStorage::new(output_path.as_str()),
        config,
    );
    TallyEngine::new(pipeline).run().await.unwrap();

    let summary: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(std::path::Path::new(&output_path).join("summary.json")).unwrap(),
    )
    .unwrap();
    assert!(summary["recommendation"]["suggested_meeting_time"].is_null());
    // an empty vote table leaves every candidate day conflict-free
    assert_eq!(summary["consensus"]["zero_conflict_days"].as_array().unwrap().len(), 7);
}
