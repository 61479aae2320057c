#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use discourse_client::{Client, FixedDelay};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let site = std::env::var("DISCOURSE_SITE")?;
    let tag = std::env::args()
        .nth(1)
        .context("usage: tag_search TAG [PAGE]")?;
    let page = std::env::args()
        .nth(2)
        .map(|page| page.parse::<u64>())
        .transpose()
        .context("failed to parse page")?;

    let client = match (
        std::env::var("DISCOURSE_APIKEY"),
        std::env::var("DISCOURSE_USERNAME"),
    ) {
        (Ok(api_key), Ok(username)) => Client::new()
            .with_base_url(site)
            .authenticate(&api_key, &username)
            .client()
            .clone(),
        _ => Client::new().with_base_url(site),
    };

    let topics = match page {
        Some(page) => client.get_tag_page(&tag, page).await?.topic_list.topics,
        None => client.get_all_tag_topics(&tag, &FixedDelay::default()).await?,
    };

    for (i, topic) in topics.iter().enumerate() {
        println!("{}. {}", i + 1, topic.title);
        println!(
            "   id {} | {} views | {} replies | {} likes",
            topic.id,
            topic.views,
            topic.posts_count.saturating_sub(1),
            topic.like_count
        );
        println!("   {}", client.topic_url(&topic.slug, topic.id));
    }
    println!("{} topics", topics.len());

    Ok(())
}
