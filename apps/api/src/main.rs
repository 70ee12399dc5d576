mod bulk;
mod clients;
mod config;
mod content;
mod errors;
mod notify;
mod routes;
mod sites;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::bulk::runner::JobRunner;
use crate::bulk::store::JobStore;
use crate::clients::generator::{self, OpenRouterGenerator};
use crate::clients::humanizer::ScriptHumanizer;
use crate::clients::images::UnsplashSourceProvider;
use crate::clients::wordpress::WordPressClient;
use crate::config::Config;
use crate::notify::{Notifier, NoopNotifier, WebhookNotifier};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("pressline_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pressline API v{}", env!("CARGO_PKG_VERSION"));

    // Publish target registry
    let sites = Arc::new(sites::SiteRegistry::load(&config.sites_file)?);
    info!("Loaded {} publish target(s)", sites.len());

    // Pipeline clients
    let llm = Arc::new(OpenRouterGenerator::new(
        config.openrouter_api_key.clone(),
        config.frontend_url.clone(),
        config.generation_timeout_secs,
    ));
    info!("Content generator initialized (model: {})", generator::MODEL);

    let humanizer = Arc::new(ScriptHumanizer::new(
        config.humanizer_script.clone(),
        config.humanize_timeout_secs,
    ));
    let images = Arc::new(UnsplashSourceProvider::new());
    let publisher = Arc::new(WordPressClient::new(config.publish_timeout_secs));

    let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
        Some(url) => {
            info!("Completion webhook enabled");
            Arc::new(WebhookNotifier::new(url.clone()))
        }
        None => Arc::new(NoopNotifier),
    };

    // Job store and runner
    let store = JobStore::new();
    let runner = Arc::new(JobRunner::new(
        store.clone(),
        llm.clone(),
        humanizer.clone(),
        images,
        publisher,
        notifier,
        config.images_per_post,
    ));

    // Build app state
    let state = AppState {
        store,
        sites,
        runner,
        generator: llm,
        humanizer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
