//! MCP server initialization for stdio and SSE transports.
//!
//! Provides [`serve_stdio`] and [`serve_sse`] entry points that wire up the log
//! accumulator, content cache, language model, and summary engine into a
//! running server.

use std::sync::Arc;

use anyhow::Result;
use rmcp::ServiceExt;

use crate::config::DaybookConfig;
use crate::content::{ContentSource, JsonContentCache};
use crate::journal::LogAccumulator;
use crate::llm;
use crate::summary::{EngineSettings, SummaryEngine};
use crate::tools::DaybookTools;

/// Shared components built once per process.
pub struct SharedState {
    pub journal: Arc<LogAccumulator>,
    pub engine: Arc<SummaryEngine>,
}

/// Shared setup: open the analysis tree, point at the content cache, create the
/// model client, and assemble the summary engine.
pub async fn setup_shared_state(config: &DaybookConfig) -> Result<SharedState> {
    let zone = config.reference_zone()?;

    let root = config.resolved_analysis_dir();
    let journal = Arc::new(LogAccumulator::open(&root, zone).await?);

    let cache_path = config.resolved_content_cache();
    if !cache_path.exists() {
        tracing::warn!(
            path = %cache_path.display(),
            "content cache not found; summaries will use logs only"
        );
    }
    let content: Arc<dyn ContentSource> = Arc::new(JsonContentCache::new(cache_path));

    let model = llm::create_client(&config.llm)?;
    tracing::info!(model = model.name(), "language model ready");

    let engine = Arc::new(SummaryEngine::new(
        Arc::clone(&journal),
        content,
        model,
        EngineSettings::from_config(config),
    ));

    Ok(SharedState { journal, engine })
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: DaybookConfig) -> Result<()> {
    tracing::info!("starting daybook MCP server on stdio");

    let state = setup_shared_state(&config).await?;

    let tools = DaybookTools::new(state.journal, state.engine);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP (SSE) transport.
pub async fn serve_sse(config: DaybookConfig) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    tracing::info!(addr = %bind_addr, "starting daybook MCP server on SSE/HTTP");

    let SharedState { journal, engine } = setup_shared_state(&config).await?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(DaybookTools::new(journal.clone(), engine.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down SSE server");
        })
        .await?;

    Ok(())
}
