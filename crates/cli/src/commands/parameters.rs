//! Parameter grid command

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, ParametersResponse};
use crate::output::{
    color_score, color_status, format_value, print_warning, sparkline, trend_arrow, OutputFormat,
};

/// Row for the parameters table
#[derive(Tabled)]
struct ParameterRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "History")]
    history: String,
}

/// Show per-metric parameters, alerts, and the performance score
pub async fn show_parameters(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let response: ParametersResponse = client.get("/api/v1/parameters").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "parameters": response.parameters.iter().map(|p| serde_json::json!({
                    "metric": p.metric,
                    "value": p.value,
                    "trend": p.trend,
                    "status": p.status,
                    "sparkline": p.sparkline,
                })).collect::<Vec<_>>(),
                "alerts": response.alerts.iter().map(|a| serde_json::json!({
                    "metric": a.metric,
                    "severity": a.severity,
                    "value": a.value,
                    "message": a.message,
                })).collect::<Vec<_>>(),
                "performance_score": response.performance_score,
                "updated_at": response.updated_at,
            }))?);
        }
        OutputFormat::Table => {
            let rows: Vec<ParameterRow> = response
                .parameters
                .iter()
                .map(|p| ParameterRow {
                    metric: p.metric.clone(),
                    value: format_value(&p.metric, p.value),
                    trend: trend_arrow(&p.trend).to_string(),
                    status: color_status(&p.status),
                    history: sparkline(&p.sparkline),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            println!("\nPerformance score: {}", color_score(response.performance_score));

            if response.alerts.is_empty() {
                println!("No active alerts");
            } else {
                println!("\nActive alerts:");
                for alert in &response.alerts {
                    print_warning(&format!(
                        "[{}] {} ({}: {})",
                        alert.severity,
                        alert.message,
                        alert.metric,
                        format_value(&alert.metric, alert.value)
                    ));
                }
            }
        }
    }

    Ok(())
}
