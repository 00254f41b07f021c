//! Feed commands: list, get, post, like, dislike.

use anyhow::{Result, bail};
use xtweet_client::{ApiError, SortOrder, TweetClient, sort_tweets, validate_draft};

use crate::render;

/// Turn an API error into something a person can act on.
fn explain(err: ApiError) -> anyhow::Error {
    match err {
        ApiError::Server { status, message, .. } => anyhow::anyhow!("Error ({status}): {message}"),
        ApiError::Network(e) => anyhow::anyhow!("Cannot reach server: {e}"),
        ApiError::Decode(e) => anyhow::anyhow!("Unexpected server response: {e}"),
    }
}

pub async fn list(client: &TweetClient, sort: SortOrder, json: bool) -> Result<()> {
    let mut tweets = client.list().await.map_err(explain)?;
    sort_tweets(&mut tweets, sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&tweets)?);
    } else if tweets.is_empty() {
        println!("No tweets yet.");
    } else {
        let now = chrono::Utc::now();
        for t in &tweets {
            println!("{}", render::tweet_block(t, now));
        }
    }
    Ok(())
}

pub async fn get(client: &TweetClient, id: &str, json: bool) -> Result<()> {
    let tweet = client.get(id).await.map_err(explain)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tweet)?);
    } else {
        println!("{}", render::tweet_block(&tweet, chrono::Utc::now()));
    }
    Ok(())
}

pub async fn post(client: &TweetClient, text: &str, author: &str, json: bool) -> Result<()> {
    let problems = validate_draft(text, author);
    if !problems.is_empty() {
        bail!("{}", problems.join(", "));
    }

    let tweet = client.create(text, author).await.map_err(explain)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tweet)?);
    } else {
        println!("Posted {}", tweet.id);
    }
    Ok(())
}

pub async fn like(client: &TweetClient, id: &str, json: bool) -> Result<()> {
    let r = client.like(id).await.map_err(explain)?;
    print_reaction(&r, json)
}

pub async fn dislike(client: &TweetClient, id: &str, json: bool) -> Result<()> {
    let r = client.dislike(id).await.map_err(explain)?;
    print_reaction(&r, json)
}

fn print_reaction(r: &xtweet_client::Reaction, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(r)?);
    } else {
        println!("{} ({})", r.message, render::counters(r.like, r.dislike));
    }
    Ok(())
}
