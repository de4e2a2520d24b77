//! `packwise serve` — Start the HTTP gateway.

use std::sync::Arc;

use packwise_config::AppConfig;
use packwise_gateway::GatewayState;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let (orchestrator, whitelist) = super::build_pipeline(&config);

    println!("🎒 Packwise Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Collection: {}", config.retrieval.collection);
    println!(
        "   Fallback on error: {}",
        config.orchestrator.use_fallback_on_error
    );

    let state = Arc::new(GatewayState {
        orchestrator,
        whitelist,
        started_at: chrono::Utc::now(),
    });

    packwise_gateway::start(&config.gateway.host, config.gateway.port, state).await?;

    Ok(())
}
