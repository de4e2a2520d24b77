//! `packwise doctor` — Diagnose configuration and connectivity.

use packwise_config::AppConfig;
use packwise_core::provider::ChatModel;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎒 Packwise Doctor\n");

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("✅ Configuration loads and validates");
            config
        }
        Err(e) => {
            println!("❌ Configuration: {e}");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("✅ API key configured");
    } else {
        println!("❌ No API key (set PACKWISE_API_KEY or OPENAI_API_KEY)");
    }

    for (label, path) in [
        ("Weather dataset", &config.datasets.weather_file),
        ("Culture tips dataset", &config.datasets.culture_file),
        ("Destination whitelist", &config.datasets.whitelist_file),
        ("Packing knowledge file", &config.datasets.knowledge_file),
    ] {
        if path.exists() {
            println!("✅ {label}: {}", path.display());
        } else {
            println!("⚠️  {label} missing: {}", path.display());
        }
    }

    let store = super::qdrant_client(&config);
    match store.collection_exists().await {
        Ok(true) => println!(
            "✅ Vector store reachable, collection '{}' exists",
            config.retrieval.collection
        ),
        Ok(false) => println!(
            "⚠️  Vector store reachable, but collection '{}' is missing (run `packwise ingest`)",
            config.retrieval.collection
        ),
        Err(e) => println!("❌ Vector store unreachable: {e}"),
    }

    let chat = packwise_providers::chat_model_from_config(&config);
    match chat.health_check().await {
        Ok(true) => println!("✅ Generation provider reachable"),
        Ok(false) => println!("⚠️  Generation provider responded with an error"),
        Err(e) => println!("❌ Generation provider unreachable: {e}"),
    }

    Ok(())
}
