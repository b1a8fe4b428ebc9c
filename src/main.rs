use clap::Parser;
use meet_tally::config::cli::{Command, LogFormat, SummaryMode};
use meet_tally::core::collector::SubmissionCollector;
use meet_tally::core::{ConfigProvider, RecordStore};
use meet_tally::domain::model::{AvailabilityForm, FinalVoteForm};
use meet_tally::report::render::{render_availability_text, render_consensus_text};
use meet_tally::utils::error::{ErrorSeverity, TallyError};
use meet_tally::utils::{logger, validation::Validate};
use meet_tally::{
    CliConfig, FileRecordStore, LocalStorage, MemoryRecordStore, ReportPipeline, RestRecordStore,
    StoreKind, TallyEngine, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Text => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting meet-tally");
    tracing::debug!("Command: {:?}", cli.command);

    let result = match cli.resolve() {
        Ok(config) => match config.validate() {
            Ok(()) => dispatch(&cli.command, config).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn dispatch(command: &Command, config: TomlConfig) -> Result<(), TallyError> {
    match config.store_kind() {
        StoreKind::Rest => {
            let endpoint = config.store.endpoint.clone().unwrap_or_default();
            let api_key = config.store.api_key.clone().unwrap_or_default();
            let store = RestRecordStore::new(&endpoint, &api_key, config.timeout())?;
            run_command(command, store, config).await
        }
        StoreKind::File => {
            let store = FileRecordStore::new(LocalStorage::new(config.store.data_dir.clone()));
            run_command(command, store, config).await
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store; nothing will be persisted");
            run_command(command, MemoryRecordStore::new(), config).await
        }
    }
}

async fn run_command<R: RecordStore>(command: &Command, store: R, config: TomlConfig) -> Result<(), TallyError> {
    match command {
        Command::Submit {
            name,
            period,
            days,
            time,
        } => {
            let mut form = AvailabilityForm {
                name: name.clone(),
                days: days.clone(),
                time: time.clone(),
                ..AvailabilityForm::default()
            };
            if period.is_some() {
                form.period = *period;
            }

            let collector = SubmissionCollector::new(store, config);
            let view = collector.submit_availability(&mut form).await?;
            println!("✅ Your meeting time has been saved!");
            println!();
            print!("{}", render_availability_text(&view.aggregate, &view.recommendation));
        }
        Command::Vote {
            name,
            available,
            unavailable,
        } => {
            let mut form = FinalVoteForm {
                name: name.clone(),
                available_day: *available,
                unavailable_day: *unavailable,
            };

            let collector = SubmissionCollector::new(store, config);
            let view = collector.submit_final_vote(&mut form).await?;
            println!("✅ Your vote has been saved!");
            println!();
            print!("{}", render_consensus_text(&view.aggregate, &view.recommendation));
        }
        Command::Summary { mode } => {
            let collector = SubmissionCollector::new(store, config);
            if matches!(mode, SummaryMode::All | SummaryMode::Availability) {
                let view = collector.refresh_availability().await?;
                print!("{}", render_availability_text(&view.aggregate, &view.recommendation));
            }
            if *mode == SummaryMode::All {
                println!();
            }
            if matches!(mode, SummaryMode::All | SummaryMode::Final) {
                let view = collector.refresh_consensus().await?;
                print!("{}", render_consensus_text(&view.aggregate, &view.recommendation));
            }
        }
        Command::Report => {
            let storage = LocalStorage::new(config.output_path().to_string());
            let engine = TallyEngine::new(ReportPipeline::new(store, storage, config));
            let output_path = engine.run().await?;
            println!("✅ Report completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
    }

    Ok(())
}
