use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pitchside::config::AppConfig;
use pitchside::models::analysis::{AnalysisRequest, AnalysisStatus, JerseyImage};
use pitchside::models::report::AnalysisReport;
use pitchside::presenter;
use pitchside::workflow::AnalysisWorkflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PredictVariant {
    Simple,
    Queue,
}

/// Submit a match for analysis and print the resulting report.
#[derive(Debug, Parser)]
#[command(name = "pitchside", version)]
struct Cli {
    /// First team name
    #[arg(long, default_value = "")]
    team_a: String,

    /// Second team name
    #[arg(long, default_value = "")]
    team_b: String,

    /// Main referee name
    #[arg(long, default_value = "")]
    main_ref: String,

    /// Side referee name
    #[arg(long, default_value = "")]
    side_ref: String,

    /// YouTube link of the match
    #[arg(long)]
    video_url: Option<String>,

    /// Jersey image for team A
    #[arg(long)]
    team_a_jersey: Option<PathBuf>,

    /// Jersey image for team B
    #[arg(long)]
    team_b_jersey: Option<PathBuf>,

    /// Only check backend connectivity and exit
    #[arg(long)]
    ping: bool,

    /// Fetch a score prediction after the analysis completes
    #[arg(long, value_enum)]
    predict: Option<PredictVariant>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Structured logging to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    metrics::describe_counter!("analysis_submissions_total", "Analysis submissions sent");
    metrics::describe_counter!("analysis_status_polls_total", "Status queries issued");
    metrics::describe_counter!("predictions_total", "Prediction requests by variant");

    let workflow = match AnalysisWorkflow::new(&config) {
        Ok(workflow) => workflow,
        Err(err) => {
            eprintln!("failed to initialize backend client: {err}");
            return ExitCode::FAILURE;
        }
    };

    if cli.ping {
        return match workflow.ping().await {
            Ok(message) => {
                println!("backend ok: {message}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("backend unreachable: {err}");
                ExitCode::FAILURE
            }
        };
    }

    let team_a_jersey = match cli.team_a_jersey.as_deref().map(load_jersey).transpose() {
        Ok(jersey) => jersey,
        Err(err) => {
            eprintln!("failed to read team A jersey image: {err}");
            return ExitCode::FAILURE;
        }
    };
    let team_b_jersey = match cli.team_b_jersey.as_deref().map(load_jersey).transpose() {
        Ok(jersey) => jersey,
        Err(err) => {
            eprintln!("failed to read team B jersey image: {err}");
            return ExitCode::FAILURE;
        }
    };

    let request = AnalysisRequest {
        team_a: cli.team_a.clone(),
        team_b: cli.team_b.clone(),
        main_referee: cli.main_ref,
        side_referee: cli.side_ref,
        video_url: cli.video_url,
        team_a_jersey,
        team_b_jersey,
    };

    let Some(handle) = workflow.start(&request).await else {
        eprintln!("{}", workflow.job().await.message);
        return ExitCode::FAILURE;
    };
    println!("{}", workflow.job().await.message);

    let terminal = handle.wait().await;
    let job = workflow.job().await;
    println!("{}", job.message);

    if terminal != AnalysisStatus::Completed {
        return ExitCode::FAILURE;
    }

    if let Some(result) = &job.result {
        match AnalysisReport::from_value(result) {
            Ok(report) => print!("{}", presenter::render(&report)),
            Err(err) => {
                tracing::warn!(error = %err, "report payload did not match the expected shape")
            }
        }
    }

    if let Some(variant) = cli.predict {
        let prediction = match variant {
            PredictVariant::Simple => workflow.predict_simple(&cli.team_a, &cli.team_b).await,
            PredictVariant::Queue => workflow.predict_via_queue(&cli.team_a, &cli.team_b).await,
        };
        if !prediction.is_empty() {
            println!("{prediction}");
        }
    }

    ExitCode::SUCCESS
}

fn load_jersey(path: &Path) -> Result<JerseyImage, std::io::Error> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("jersey.png")
        .to_owned();
    Ok(JerseyImage { file_name, bytes })
}
