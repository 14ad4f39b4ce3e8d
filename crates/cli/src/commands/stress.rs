//! Composite stress command

use anyhow::Result;
use colored::Colorize;

use crate::client::{ApiClient, StressResponse};
use crate::output::{format_timestamp, print_info, print_warning, sparkline, OutputFormat};

/// Stress values at or above this level are highlighted
const DANGER_THRESHOLD: f64 = 7.0;

/// Show the composite stress series
pub async fn show_stress(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let response: StressResponse = client.get("/api/v1/stress").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "stress": response.stress.iter().map(|p| serde_json::json!({
                    "index": p.index,
                    "stress": p.stress,
                    "smoothed": p.smoothed,
                })).collect::<Vec<_>>(),
                "danger": response.danger,
                "updated_at": response.updated_at,
            }))?);
        }
        OutputFormat::Table => {
            if response.stress.is_empty() {
                print_info("No stress data yet, waiting for samples");
                return Ok(());
            }

            let raw: Vec<f64> = response.stress.iter().map(|p| p.stress).collect();
            let smoothed: Vec<f64> = response.stress.iter().map(|p| p.smoothed).collect();

            println!("System stress (0-10 per point, {} samples)", raw.len());
            println!("  raw:      {}", sparkline(&raw));
            println!("  smoothed: {}", sparkline(&smoothed));

            let latest = response.stress.last().unwrap();
            let latest_line = format!(
                "latest: stress {:.2}, smoothed {:.2} (danger at >= {:.1})",
                latest.stress, latest.smoothed, DANGER_THRESHOLD
            );
            if latest.smoothed >= DANGER_THRESHOLD {
                println!("  {}", latest_line.red().bold());
            } else {
                println!("  {}", latest_line);
            }

            if response.danger {
                print_warning("Danger: most metrics are simultaneously elevated");
            }
            println!("\nLast update: {}", format_timestamp(response.updated_at));
        }
    }

    Ok(())
}
