use std::sync::Arc;

use crate::bulk::runner::JobRunner;
use crate::bulk::store::JobStore;
use crate::clients::generator::OpenRouterGenerator;
use crate::clients::Humanizer;
use crate::config::Config;
use crate::sites::SiteRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    pub sites: Arc<SiteRegistry>,
    pub runner: Arc<JobRunner>,
    /// Used directly by the standalone generate endpoint for custom prompts;
    /// the runner sees it only through the `ContentGenerator` trait.
    pub generator: Arc<OpenRouterGenerator>,
    pub humanizer: Arc<dyn Humanizer>,
    pub config: Config,
}
