#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use discourse_client::{PostUpdate, Session};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let site = std::env::var("DISCOURSE_SITE")?;
    let api_key = std::env::var("DISCOURSE_APIKEY")?;
    let username = std::env::var("DISCOURSE_USERNAME")?;

    let session = Session::new(site, &api_key, &username);

    let latest = session.client().get_latest_posts().await?;
    let editable = latest
        .iter()
        .find(|post| post.can_edit)
        .context("no post in the latest list is editable by this user")?;
    println!("updating post {}", editable.id);

    let updated = session
        .update_post(
            editable.id,
            &PostUpdate {
                raw: format!("{}\n\nUpdated from discourse-client.", editable.raw),
                edit_reason: Some("demo edit".into()),
            },
        )
        .await?;
    println!("post {} is now at version {}", updated.id, updated.version);

    Ok(())
}
