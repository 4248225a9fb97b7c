use clap::{Parser, Subcommand};
use complaint_triage::{config::AppConfig, service::TriageService, ResponderResult, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Complaint triage from the command line
#[derive(Parser)]
#[command(name = "triage", version)]
struct Cli {
    /// Overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a single complaint text (nothing is stored)
    Classify { text: String },
    /// Classify and store every row of a complaint CSV
    Ingest { file: PathBuf },
    /// Ask the chatbot a question about stored complaints
    Ask { query: String },
    /// Print the paginated complaint report
    Report,
    /// Print dashboard metrics
    Stats,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await?;

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let service = TriageService::from_config(&config).await?;

    match cli.command {
        Command::Classify { text } => {
            let result = service.classify(&text);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Ingest { file } => {
            info!(file = %file.display(), "Ingesting complaint file");
            let bytes = tokio::fs::read(&file).await?;
            let summary = service.analyze_upload(&bytes).await?;
            println!("{}", summary.message);
            println!("New complaints: {}", summary.total_new_complaints);
            println!("Upload fingerprint: {}", summary.fingerprint);
            for record in &summary.sample_output {
                println!(
                    "  #{} [{}] {} - {}",
                    record.id, record.priority, record.category, record.action
                );
            }
        }
        Command::Ask { query } => match service.chat(&query).await? {
            ResponderResult::Text { message } => println!("{}", message),
            ResponderResult::Records { message, records } => {
                println!("{}", message);
                for record in records {
                    println!(
                        "  #{} [{}] {} | {} | {} | {}",
                        record.id,
                        record.priority,
                        record.category,
                        record.customer_name(),
                        record.status,
                        record.complaint
                    );
                }
            }
        },
        Command::Report => {
            let today = chrono::Local::now().date_naive();
            print!("{}", service.report(today).await?);
        }
        Command::Stats => {
            let metrics = service.metrics().await?;
            println!("Total complaints: {}", metrics.total);
            println!("Critical (P1):    {}", metrics.critical);
            println!("Resolved:         {}", metrics.resolved);
        }
    }

    Ok(())
}
