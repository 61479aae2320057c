//! discourse-client is a client library for the [Discourse](https://www.discourse.org/) forum
//! API, providing an interface to read topics, posts, tags, and user activity, and to create,
//! edit, and delete posts.
//!
//! ```no_run
//! use discourse_client::{Client, PostUpdate, TopicId};
//!
//! # async fn f() -> Result<(), Box<dyn std::error::Error>> {
//! // Public topics can be read anonymously
//! let client = Client::new().with_base_url("https://forum.example.com".into());
//!
//! // Get every post in a topic, not just the first chunk
//! let all = client.get_all_posts(TopicId(1234)).await?;
//! for post in &all.posts {
//!     println!("#{} by {}", post.post_number, post.display_name());
//! }
//!
//! // Writing needs an API key
//! let session = client.authenticate("0123456789abcdef", "system");
//! let first = &all.posts[0];
//! session
//!     .update_post(
//!         first.id,
//!         &PostUpdate {
//!             raw: format!("{}\n\nEdit: fixed!", first.raw),
//!             edit_reason: Some("follow-up".into()),
//!         },
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::missing_errors_doc)]

pub mod aggregate;
mod client;
mod de;
mod error;
pub mod pacing;
mod post;
mod session;
mod tag;
mod topic;
mod upload;
mod user_action;

pub use crate::aggregate::{PostSource, TopicPosts};
pub use crate::client::Client;
pub use crate::error::Error;
pub use crate::pacing::{FixedDelay, NoDelay, Pacer};
pub use crate::post::{NewPost, Post, PostId, PostUpdate};
pub use crate::session::Session;
pub use crate::tag::{Poster, TagPage, TagRef, TopicList, TopicSummary, User};
pub use crate::topic::{AcceptedAnswer, PostStream, Topic, TopicId};
pub use crate::upload::{Upload, UploadedImage};
pub use crate::user_action::{UserAction, UserActionFilter};
