//! Status banner command

use anyhow::Result;
use colored::Colorize;

use crate::client::{ApiClient, StatusResponse};
use crate::output::{color_status, format_timestamp, print_warning, OutputFormat};

/// Show the reconciled crash-prediction status
pub async fn show_status(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let status: StatusResponse = client.get("/api/v1/status").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "overall": status.overall,
                "probability": status.probability,
                "probability_percent": status.probability_percent,
                "time_frame": status.time_frame,
                "recommendations": status.recommendations,
                "stale": status.stale,
                "updated_at": status.updated_at,
            }))?);
        }
        OutputFormat::Table => {
            println!(
                "Server status: {}",
                color_status(&status.overall).bold()
            );
            println!(
                "Crash likelihood: {}%  (estimated time frame: {})",
                status.probability_percent, status.time_frame
            );

            if let Some(spike) = &status.last_spike {
                if let (Some(metric), Some(change)) = (&spike.metric, &spike.change) {
                    println!("Last spike: {} ({})", metric, change);
                }
            }

            println!("\nRecommendations:");
            for rec in &status.recommendations {
                println!("  - {}", rec);
            }

            if status.stale {
                print_warning("Prediction is stale: the endpoint has not refreshed it recently");
            }
            println!("\nLast update: {}", format_timestamp(status.updated_at));
        }
    }

    Ok(())
}
