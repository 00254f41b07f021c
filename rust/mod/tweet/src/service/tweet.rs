use chrono::Utc;
use tracing::info;
use xtweet_core::{is_valid_id, new_id};

use crate::model::{
    Applied, CreateTweet, MAX_AUTHOR_CHARS, MAX_TWEET_CHARS, ReactionCounts, Tweet, TweetView,
};
use crate::service::{TweetError, TweetService};

/// Check a draft and return the trimmed `(tweet, author)` pair.
///
/// Every violated rule is reported, tweet first, joined with ", ".
pub fn validate(input: &CreateTweet) -> Result<(String, String), TweetError> {
    let tweet = input.tweet.as_deref().unwrap_or_default().trim();
    let author = input.author.as_deref().unwrap_or_default().trim();

    let mut problems = Vec::new();
    if tweet.is_empty() {
        problems.push("Tweet content is required".to_string());
    } else if tweet.chars().count() > MAX_TWEET_CHARS {
        problems.push(format!("Tweet cannot exceed {MAX_TWEET_CHARS} characters"));
    }
    if author.is_empty() {
        problems.push("Author name is required".to_string());
    } else if author.chars().count() > MAX_AUTHOR_CHARS {
        problems.push(format!("Author name cannot exceed {MAX_AUTHOR_CHARS} characters"));
    }

    if problems.is_empty() {
        Ok((tweet.to_string(), author.to_string()))
    } else {
        Err(TweetError::Validation(problems.join(", ")))
    }
}

fn check_id(id: &str) -> Result<(), TweetError> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(TweetError::InvalidId(id.to_string()))
    }
}

impl TweetService {
    /// All tweets, newest first.
    pub fn list(&self) -> Result<Vec<TweetView>, TweetError> {
        let mut tweets = self.store.list()?;
        tweets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(tweets.iter().map(Tweet::view).collect())
    }

    pub fn get_by_id(&self, id: &str) -> Result<TweetView, TweetError> {
        check_id(id)?;
        self.store
            .get(id)?
            .map(|t| t.view())
            .ok_or_else(|| TweetError::NotFound(id.to_string()))
    }

    pub fn create(&self, input: CreateTweet) -> Result<TweetView, TweetError> {
        let (text, author) = validate(&input)?;
        let tweet = Tweet::new(new_id(), text, author, Utc::now());
        self.store.insert(&tweet)?;
        info!(id = %tweet.id, author = %tweet.author, "tweet created");
        Ok(tweet.view())
    }

    pub fn like(&self, id: &str, client: &str) -> Result<ReactionCounts, TweetError> {
        check_id(id)?;
        let policy = self.config.reaction_policy;
        let saved = self.store.modify(id, |t| match t.apply_like(client, policy) {
            Applied::Counted => Ok(()),
            Applied::Duplicate(r) => Err(TweetError::AlreadyReacted(r)),
        })?;
        Ok(saved.counts())
    }

    pub fn dislike(&self, id: &str, client: &str) -> Result<ReactionCounts, TweetError> {
        check_id(id)?;
        let saved = self.store.modify(id, |t| match t.apply_dislike(client) {
            Applied::Counted => Ok(()),
            Applied::Duplicate(r) => Err(TweetError::AlreadyReacted(r)),
        })?;
        Ok(saved.counts())
    }
}
