use chrono::{DateTime, Utc};
use xtweet_client::Tweet;

pub fn counters(like: u64, dislike: u64) -> String {
    format!("👍 {like}  👎 {dislike}")
}

/// Coarse "time ago" label.
pub fn age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds().max(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

pub fn tweet_block(t: &Tweet, now: DateTime<Utc>) -> String {
    format!(
        "{} · {}\n{}\n{}  score {}\nid {}\n",
        t.author,
        age(t.created_at, now),
        t.tweet,
        counters(t.like, t.dislike),
        t.score,
        t.id,
    )
}
