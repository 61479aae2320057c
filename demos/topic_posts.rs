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
            .context("usage: topic_posts TOPIC_ID")?
            .parse()
            .context("failed to parse topic ID")?,
    );

    let client = Client::new().with_base_url(site);
    let all = client.get_all_posts(topic_id).await?;

    println!(
        "{}: {} posts fetched, {} skipped",
        all.topic.title,
        all.posts.len(),
        all.skipped.len()
    );
    for post in &all.posts {
        println!(
            "#{} by {} (id={}) created {}",
            post.post_number,
            post.username,
            post.id,
            post.created_at.to_rfc3339()
        );
    }

    Ok(())
}
