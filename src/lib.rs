pub mod agent;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod history;
pub mod intent;
pub mod llm;
pub mod models;
pub mod server;

use agent::PerfumeAdvisor;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Credential Set: {}", !args.chat_api_key.trim().is_empty());
    info!("Catalog Path: {}", args.catalog_path);
    info!("Catalog Sample Size: {}", args.sample_size);
    info!("History Store Type: {}", args.history_type);
    info!("History Store Path: {}", args.history_path);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let advisor = Arc::new(PerfumeAdvisor::new(args.clone()).await?);
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, advisor, args);
    server.run().await?;

    Ok(())
}
