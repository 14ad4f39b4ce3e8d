//! Daemon health command

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, HealthResponse};
use crate::output::{color_status, format_timestamp, OutputFormat};

/// Row for the component health table
#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Last Check")]
    last_check: String,
}

/// Show daemon component health
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: HealthResponse = client.get("/healthz").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "status": health.status,
                "components": health.components.iter().map(|(name, c)| {
                    (name.clone(), serde_json::json!({
                        "status": c.status,
                        "message": c.message,
                        "last_check_timestamp": c.last_check_timestamp,
                    }))
                }).collect::<serde_json::Map<_, _>>(),
            }))?);
        }
        OutputFormat::Table => {
            println!("Overall: {}", color_status(&health.status));

            let mut rows: Vec<ComponentRow> = health
                .components
                .iter()
                .map(|(name, c)| ComponentRow {
                    component: name.clone(),
                    status: color_status(&c.status),
                    message: c.message.clone().unwrap_or_default(),
                    last_check: format_timestamp(c.last_check_timestamp),
                })
                .collect();
            rows.sort_by(|a, b| a.component.cmp(&b.component));

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
