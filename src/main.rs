use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use switchyard::cli::{Cli, Commands};
use switchyard::core::LLMClient;
use switchyard::{storage, utils};
use switchyard::{AgentRegistry, AppState, Composer, CompositionPattern, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Listing the registry needs neither settings nor credentials.
    if let Commands::Agents = cli.command {
        handle_agents();
        return Ok(());
    }

    dotenvy::dotenv().ok();
    let mut settings = Settings::new()?;

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            handle_serve(settings).await
        }
        Commands::Chat { prompt, pattern } => handle_chat(settings, prompt, pattern).await,
        Commands::Agents => Ok(()),
    }
}

fn build_composer(settings: &Settings) -> Result<Composer> {
    let api_key = Settings::api_key()?;
    let client = LLMClient::new(api_key, settings.llm.clone())?;
    Ok(Composer::new(Arc::new(client)))
}

async fn handle_serve(settings: Settings) -> Result<()> {
    let composer = build_composer(&settings)?;
    let store = storage::from_config(&settings.storage).await?;

    let handle = switchyard::serve(
        AppState::new(composer, store),
        &settings.server.bind_addr(),
    )
    .await?;
    utils::print_success(&format!("Switchyard API running on port {}", handle.port));

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await
}

async fn handle_chat(settings: Settings, prompt: String, pattern: Option<String>) -> Result<()> {
    let pattern = CompositionPattern::parse_optional(pattern.as_deref())?;
    let composer = build_composer(&settings)?;

    utils::print_info("Sending request...");
    match composer.compose(&prompt, pattern).await {
        Ok(composition) => {
            utils::print_header(&utils::composition_summary(&composition));
            println!("{}", composition.content);
            Ok(())
        }
        Err(e) => {
            utils::print_error(&format!("Request failed: {}", e));
            Err(e.into())
        }
    }
}

fn handle_agents() {
    utils::print_header("Registered agents");
    for definition in AgentRegistry::global().definitions() {
        println!(
            "  {:<11} t={:.1}  {}",
            definition.kind.as_str(),
            definition.temperature,
            definition.description
        );
    }
}
