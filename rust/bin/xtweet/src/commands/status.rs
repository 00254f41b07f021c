use anyhow::Result;
use xtweet_client::TweetClient;

/// Print server health and version.
pub async fn status(client: &TweetClient) -> Result<()> {
    println!("Server: {}", client.base_url());
    match client.health().await {
        Ok(health) => println!("Status: {}", health.status),
        Err(e) => {
            println!("Status: unreachable ({e})");
            return Ok(());
        }
    }
    if let Ok(v) = client.version().await {
        println!("Version: {} {}", v.name, v.version);
    }
    Ok(())
}
