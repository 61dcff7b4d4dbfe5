//! Matchday CLI - on-demand triggers for the Matchday daemon

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9527";

#[derive(Parser)]
#[command(name = "matchday")]
#[command(about = "Matchday football data CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "MATCHDAY_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync standings, fixtures and top scorers
    Refresh,

    /// Fetch one club's squad
    Squad {
        /// Club id in the upstream feed (e.g. 57 for Arsenal)
        external_id: i64,
    },

    /// Fetch squads for every known club
    Squads,

    /// Prediction commands
    #[command(subcommand)]
    Predict(PredictCommand),

    /// Show store counts and the last sync
    Status,
}

#[derive(Subcommand)]
enum PredictCommand {
    /// Predict the next batch of unpredicted scheduled matches
    Generate,
    /// Delete every prediction
    Clear,
    /// Clear, then generate a fresh batch
    Regenerate,
    /// List predictions
    List(ListArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Only upcoming scheduled matches, soonest first
    #[arg(long, conflicts_with = "week")]
    upcoming: bool,

    /// Only matches of this match week
    #[arg(long)]
    week: Option<i32>,
}

impl ListArgs {
    fn params(&self) -> Value {
        match (self.upcoming, self.week) {
            (true, _) => json!({ "scope": "upcoming" }),
            (false, Some(week)) => json!({ "scope": "week", "week": week }),
            (false, None) => json!({ "scope": "all" }),
        }
    }
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct PredictionRecord {
    match_id: String,
    predicted_home_score: i32,
    predicted_away_score: i32,
    outcome: String,
    home_win_probability: f64,
    draw_probability: f64,
    away_win_probability: f64,
    confidence: f64,
}

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Match")]
    match_id: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "H / D / A %")]
    probabilities: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

impl From<PredictionRecord> for PredictionRow {
    fn from(p: PredictionRecord) -> Self {
        Self {
            match_id: p.match_id,
            score: format!("{}-{}", p.predicted_home_score, p.predicted_away_score),
            outcome: p.outcome,
            probabilities: format!(
                "{:.1} / {:.1} / {:.1}",
                p.home_win_probability, p.draw_probability, p.away_win_probability
            ),
            confidence: format!("{:.1}", p.confidence),
        }
    }
}

async fn call_rpc(url: &str, method: &str, params: Value) -> Result<Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

/// Print the response's display message in green
fn print_message(result: &Value) {
    if let Some(message) = result["message"].as_str() {
        println!("{}", format!("✓ {}", message).green().bold());
    }
}

fn print_sync_report(report: &Value) {
    for step in ["standings", "fixtures", "scorers"] {
        let outcome = &report[step];
        match outcome["status"].as_str() {
            Some("completed") => {
                let detail = &outcome["detail"];
                println!(
                    "  {} {:<10} {} created, {} updated, {} skipped, {} malformed",
                    "✓".green(),
                    step,
                    detail["created"],
                    detail["updated"],
                    detail["skipped"],
                    detail["malformed"]
                );
            }
            _ => println!(
                "  {} {:<10} {}",
                "✗".red(),
                step,
                outcome["detail"].as_str().unwrap_or("failed")
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let url = cli.rpc_url.as_str();

    match cli.command {
        Commands::Refresh => {
            println!("{}", "Syncing feeds...".cyan().bold());
            let result = call_rpc(url, "data.refresh.v1", json!({})).await?;
            print_message(&result);
            println!();
            print_sync_report(&result["report"]);
        }

        Commands::Squad { external_id } => {
            let result = call_rpc(url, "data.squad.v1", json!({ "external_id": external_id })).await?;
            print_message(&result);
        }

        Commands::Squads => {
            println!("{}", "Fetching squads (this paces requests)...".cyan().bold());
            let result = call_rpc(url, "data.squads.v1", json!({})).await?;
            print_message(&result);
        }

        Commands::Predict(PredictCommand::Generate) => {
            let result = call_rpc(url, "predictions.generate.v1", json!({})).await?;
            print_message(&result);
        }

        Commands::Predict(PredictCommand::Clear) => {
            let result = call_rpc(url, "predictions.clear.v1", json!({})).await?;
            print_message(&result);
        }

        Commands::Predict(PredictCommand::Regenerate) => {
            let result = call_rpc(url, "predictions.regenerate.v1", json!({})).await?;
            print_message(&result);
        }

        Commands::Predict(PredictCommand::List(args)) => {
            let result = call_rpc(url, "predictions.list.v1", args.params()).await?;
            let records: Vec<PredictionRecord> = serde_json::from_value(result["predictions"].clone())
                .context("Unexpected predictions payload")?;

            if records.is_empty() {
                println!("{}", "No predictions".yellow());
            } else {
                let rows: Vec<PredictionRow> = records.into_iter().map(PredictionRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Status => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match call_rpc(url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    if stats["syncing"].as_bool().unwrap_or(false) {
                        println!("  {} {}", "Sync:".bold(), "IN PROGRESS".yellow());
                    }
                    println!();
                    println!("  {} {}", "Clubs:".bold(), stats["clubs"]);
                    println!("  {} {}", "Players:".bold(), stats["players"]);
                    println!("  {} {}", "Matches:".bold(), stats["matches"]);
                    println!("  {} {}", "Predictions:".bold(), stats["predictions"]);
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                    println!();

                    if stats["last_sync"].is_null() {
                        println!("  {} never", "Last sync:".bold());
                    } else {
                        println!(
                            "  {} finished at {} (epoch ms)",
                            "Last sync:".bold(),
                            stats["last_sync"]["finished_at"]
                        );
                        print_sync_report(&stats["last_sync"]);
                    }
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
