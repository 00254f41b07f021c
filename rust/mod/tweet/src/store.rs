use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use xtweet_kv::KVStore;

use crate::model::Tweet;
use crate::service::TweetError;

const KEY_PREFIX: &str = "tweet:tweet:";

/// Attempts at a conditional update before giving up on a hot key.
pub const MAX_SWAP_ATTEMPTS: usize = 16;

/// Tweet records on top of a [`KVStore`].
pub struct TweetStore {
    kv: Arc<dyn KVStore>,
}

impl TweetStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    fn key(id: &str) -> String {
        format!("{KEY_PREFIX}{id}")
    }

    fn decode(bytes: &[u8]) -> Result<Tweet, TweetError> {
        serde_json::from_slice(bytes).map_err(|e| TweetError::Internal(format!("decode tweet: {e}")))
    }

    fn encode(tweet: &Tweet) -> Result<Vec<u8>, TweetError> {
        serde_json::to_vec(tweet).map_err(|e| TweetError::Internal(format!("encode tweet: {e}")))
    }

    /// Insert a new record. Fails if the id is already taken.
    pub fn insert(&self, tweet: &Tweet) -> Result<(), TweetError> {
        let data = Self::encode(tweet)?;
        if self.kv.compare_and_swap(&Self::key(&tweet.id), None, &data)? {
            Ok(())
        } else {
            Err(TweetError::Internal(format!("tweet {} already exists", tweet.id)))
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Tweet>, TweetError> {
        match self.kv.get(&Self::key(id))? {
            Some(bytes) => Self::decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// All records, in key order.
    pub fn list(&self) -> Result<Vec<Tweet>, TweetError> {
        self.kv
            .scan(KEY_PREFIX)?
            .iter()
            .map(|(_, bytes)| Self::decode(bytes))
            .collect()
    }

    /// Read-modify-write a record atomically.
    ///
    /// `apply` runs against a fresh copy on every attempt and may run more
    /// than once. When it returns an error nothing is written. On success
    /// `updated_at` is refreshed and the stored record is returned.
    pub fn modify<F>(&self, id: &str, mut apply: F) -> Result<Tweet, TweetError>
    where
        F: FnMut(&mut Tweet) -> Result<(), TweetError>,
    {
        let key = Self::key(id);
        for attempt in 1..=MAX_SWAP_ATTEMPTS {
            let current = self
                .kv
                .get(&key)?
                .ok_or_else(|| TweetError::NotFound(id.to_string()))?;

            let mut tweet = Self::decode(&current)?;
            apply(&mut tweet)?;
            tweet.updated_at = Utc::now();

            let next = Self::encode(&tweet)?;
            if self.kv.compare_and_swap(&key, Some(&current), &next)? {
                return Ok(tweet);
            }
            debug!(id, attempt, "tweet changed concurrently, retrying");
        }
        Err(TweetError::Internal(format!("contention on tweet {id}")))
    }
}
