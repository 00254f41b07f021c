//! `xtweet`: terminal front end for the X-Tweet API.

mod commands;
mod render;

use clap::{Parser, Subcommand};
use xtweet_client::{SortOrder, TweetClient};

/// X-Tweet terminal client.
#[derive(Parser, Debug)]
#[command(name = "xtweet", about = "X-Tweet terminal client", version)]
struct Cli {
    /// API server URL.
    #[arg(
        long,
        global = true,
        env = "XTWEET_SERVER",
        default_value = "http://localhost:5000"
    )]
    server: String,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the feed.
    List {
        /// newest or popular.
        #[arg(long, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
    },

    /// Show one tweet.
    Get { id: String },

    /// Post a tweet.
    Post {
        /// Author name.
        #[arg(long, short = 'a')]
        author: String,
        /// Tweet text; words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Like a tweet.
    Like { id: String },

    /// Dislike a tweet.
    Dislike { id: String },

    /// Check server status.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = TweetClient::new(&cli.server);
    let json = cli.output == "json";

    match cli.command {
        Commands::List { sort } => commands::feed::list(&client, sort, json).await?,
        Commands::Get { id } => commands::feed::get(&client, &id, json).await?,
        Commands::Post { author, text } => {
            commands::feed::post(&client, &text.join(" "), &author, json).await?
        }
        Commands::Like { id } => commands::feed::like(&client, &id, json).await?,
        Commands::Dislike { id } => commands::feed::dislike(&client, &id, json).await?,
        Commands::Status => commands::status::status(&client).await?,
    }
    Ok(())
}
