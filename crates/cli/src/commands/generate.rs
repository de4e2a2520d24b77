//! `packwise generate` — Run the pipeline once and print the result.

use packwise_config::AppConfig;
use packwise_core::request::TravelRequest;

pub async fn run(
    destination: String,
    days: u32,
    travel_type: &str,
    season: &str,
    date: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let travel_type = travel_type.parse()?;
    let season = season.parse()?;

    let mut request = TravelRequest::new(destination, days, travel_type, season)?;
    if let Some(date) = date {
        request = request.with_travel_date(date.parse::<chrono::NaiveDate>()?);
    }

    let (orchestrator, _whitelist) = super::build_pipeline(&config);
    let outcome = orchestrator.generate(&request).await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
