pub mod tweet;

use std::sync::Arc;

use thiserror::Error;
use xtweet_kv::{KVError, KVStore};

use crate::model::{Reaction, ReactionPolicy};
use crate::store::TweetStore;

pub use self::tweet::validate;

/// Tweet service error type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TweetError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("tweet {0} not found")]
    NotFound(String),

    #[error("invalid tweet id {0:?}")]
    InvalidId(String),

    #[error("already reacted: {0}")]
    AlreadyReacted(Reaction),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<KVError> for TweetError {
    fn from(e: KVError) -> Self {
        TweetError::Storage(e.to_string())
    }
}

/// Configuration for the tweet service.
#[derive(Debug, Clone, Default)]
pub struct TweetConfig {
    pub reaction_policy: ReactionPolicy,
}

/// The tweet service. Owns the record store and applies business rules
/// on top of it.
pub struct TweetService {
    store: TweetStore,
    config: TweetConfig,
}

impl TweetService {
    pub fn new(kv: Arc<dyn KVStore>, config: TweetConfig) -> Arc<Self> {
        Arc::new(Self {
            store: TweetStore::new(kv),
            config,
        })
    }
}
