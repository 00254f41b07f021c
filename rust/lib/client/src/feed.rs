//! Feed helpers shared by front ends: ordering and draft checks.

use std::fmt;
use std::str::FromStr;

use crate::Tweet;

// Copies of the server limits in `tweet::model`. The client does not link
// the server crate, so a change there must be repeated here.
pub const MAX_TWEET_CHARS: usize = 280;
pub const MAX_AUTHOR_CHARS: usize = 50;

/// Feed ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// `createdAt` descending.
    #[default]
    Newest,
    /// `score` descending, ties newest first.
    Popular,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Popular => "popular",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "popular" => Ok(SortOrder::Popular),
            other => Err(format!("unknown sort order {other:?} (expected newest or popular)")),
        }
    }
}

/// Sort a feed in place.
pub fn sort_tweets(tweets: &mut [Tweet], order: SortOrder) {
    match order {
        SortOrder::Newest => tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Popular => tweets.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
}

/// Check a draft before sending it. Mirrors the server's rules so the user
/// gets feedback without a round trip; the server still validates.
///
/// The messages are the ones `tweet::service::validate` joins into its
/// 400 response and must stay identical to them.
///
/// Returns every problem found, tweet first.
pub fn validate_draft(tweet: &str, author: &str) -> Vec<String> {
    let tweet = tweet.trim();
    let author = author.trim();
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
    problems
}
