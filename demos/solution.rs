#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use discourse_client::{Client, TopicId};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let site = std::env::var("DISCOURSE_SITE")
        .unwrap_or_else(|_| "https://meta.discourse.org".into());
    let topic_id = TopicId(
        std::env::args()
            .nth(1)
            .context("usage: solution TOPIC_ID")?
            .parse()
            .context("failed to parse topic ID")?,
    );

    let client = Client::new().with_base_url(site);
    match client.get_accepted_solution(topic_id).await? {
        Some(post) => {
            println!(
                "accepted solution: post_number={} id={} by {}",
                post.post_number,
                post.id,
                post.display_name()
            );
            let preview = if post.raw.is_empty() { &post.cooked } else { &post.raw };
            println!("{}", preview.chars().take(280).collect::<String>());
        }
        None => println!("no accepted solution (or the solved plugin is disabled)"),
    }

    Ok(())
}
