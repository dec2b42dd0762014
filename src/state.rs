//! Application state management

use std::sync::Arc;

use esg_lens::config::Config;
use esg_lens::pipeline::Pipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: Pipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline: Arc::new(pipeline),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Shared pipeline, cloned into blocking tasks
    pub fn pipeline(&self) -> Arc<Pipeline> {
        Arc::clone(&self.inner.pipeline)
    }
}
