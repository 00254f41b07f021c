pub mod api;
pub mod model;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;
use xtweet_core::Module;
use xtweet_kv::KVStore;

use service::{TweetConfig, TweetService};

/// The tweet module: posting, listing and reacting to short text posts.
pub struct TweetModule {
    service: Arc<TweetService>,
}

impl TweetModule {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self::with_config(kv, TweetConfig::default())
    }

    pub fn with_config(kv: Arc<dyn KVStore>, config: TweetConfig) -> Self {
        Self {
            service: TweetService::new(kv, config),
        }
    }
}

impl Module for TweetModule {
    fn name(&self) -> &str {
        "tweet"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.service))
    }
}
