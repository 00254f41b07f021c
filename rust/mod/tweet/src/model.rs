use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum tweet length, in characters.
pub const MAX_TWEET_CHARS: usize = 280;
/// Maximum author name length, in characters.
pub const MAX_AUTHOR_CHARS: usize = 50;

/// Stored tweet record.
///
/// Persisted as camelCase JSON under `tweet:tweet:{id}`. The reaction sets
/// hold client addresses and must never reach an API response; use
/// [`Tweet::view`] for anything leaving the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: String,
    pub tweet: String,
    pub author: String,
    #[serde(default)]
    pub like: u64,
    #[serde(default)]
    pub dislike: u64,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub liked_by: BTreeSet<String>,
    #[serde(default)]
    pub disliked_by: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public representation of a tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    pub id: String,
    pub tweet: String,
    pub author: String,
    pub like: u64,
    pub dislike: u64,
    pub score: i64,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body of `POST /api/tweets`.
///
/// Both fields are optional at the decoding level so that a missing field
/// is reported through the same validation message as an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTweet {
    #[serde(default)]
    pub tweet: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Counter snapshot returned after a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub like: u64,
    pub dislike: u64,
}

/// Body of a successful like/dislike response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionResponse {
    pub message: String,
    pub like: u64,
    pub dislike: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
        }
    }

    /// "liked" / "disliked", as used in user-facing messages.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Reaction::Like => "liked",
            Reaction::Dislike => "disliked",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How likes are deduplicated.
///
/// `DislikeOnly` counts every like and only tracks dislikes per address.
/// `Symmetric` tracks both and lets an address switch sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReactionPolicy {
    #[default]
    DislikeOnly,
    Symmetric,
}

impl ReactionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionPolicy::DislikeOnly => "dislike-only",
            ReactionPolicy::Symmetric => "symmetric",
        }
    }
}

impl fmt::Display for ReactionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dislike-only" | "dislike_only" => Ok(ReactionPolicy::DislikeOnly),
            "symmetric" => Ok(ReactionPolicy::Symmetric),
            other => Err(format!(
                "unknown reaction policy {other:?} (expected dislike-only or symmetric)"
            )),
        }
    }
}

/// Outcome of applying a reaction to a record in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Counted,
    Duplicate(Reaction),
}

impl Tweet {
    pub fn new(id: String, tweet: String, author: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tweet,
            author,
            like: 0,
            dislike: 0,
            is_edited: false,
            liked_by: BTreeSet::new(),
            disliked_by: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn score(&self) -> i64 {
        i64::try_from(self.like)
            .unwrap_or(i64::MAX)
            .saturating_sub(i64::try_from(self.dislike).unwrap_or(i64::MAX))
    }

    pub fn counts(&self) -> ReactionCounts {
        ReactionCounts {
            like: self.like,
            dislike: self.dislike,
        }
    }

    pub fn view(&self) -> TweetView {
        TweetView {
            id: self.id.clone(),
            tweet: self.tweet.clone(),
            author: self.author.clone(),
            like: self.like,
            dislike: self.dislike,
            score: self.score(),
            is_edited: self.is_edited,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn apply_like(&mut self, client: &str, policy: ReactionPolicy) -> Applied {
        if policy == ReactionPolicy::Symmetric {
            if self.liked_by.contains(client) {
                return Applied::Duplicate(Reaction::Like);
            }
            if self.disliked_by.remove(client) {
                self.dislike = self.dislike.saturating_sub(1);
            }
            self.liked_by.insert(client.to_string());
        }
        self.like += 1;
        Applied::Counted
    }

    /// A dislike always moves the address out of `liked_by`.
    pub fn apply_dislike(&mut self, client: &str) -> Applied {
        if self.disliked_by.contains(client) {
            return Applied::Duplicate(Reaction::Dislike);
        }
        if self.liked_by.remove(client) {
            self.like = self.like.saturating_sub(1);
        }
        self.disliked_by.insert(client.to_string());
        self.dislike += 1;
        Applied::Counted
    }
}
