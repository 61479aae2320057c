use crate::de::null_as_default;
use crate::{Error, Session, TopicId};
use chrono::{DateTime, Utc};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// A post ID.
#[allow(clippy::module_name_repetitions)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct PostId(pub u64);

/// A post, as returned by the server.
///
/// Posts embedded in a topic response usually have an empty [`raw`][`Post::raw`]; fetch the
/// post on its own with [`Client::get_post`][`crate::Client::get_post`] to get its markdown.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Post {
    /// Post ID.
    pub id: PostId,
    /// Position of the post within its topic, starting at 1. Unrelated to the post ID.
    pub post_number: u32,
    /// Topic this post belongs to.
    #[serde(default)]
    pub topic_id: TopicId,
    /// Slug of the topic this post belongs to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic_slug: String,
    /// Username of the author. Empty when the author's account was deleted.
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    /// Full name of the author, if they set one.
    #[serde(default)]
    pub name: Option<String>,
    /// Name to show for the author, as chosen by the site settings.
    #[serde(default)]
    pub display_username: Option<String>,
    /// Avatar URL template, with `{size}` standing in for the pixel size.
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_template: String,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last changed.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Markdown source of the post.
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw: String,
    /// Rendered HTML of the post.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cooked: String,
    /// Post type: 1 regular, 2 moderator action, 3 small action, 4 whisper.
    #[serde(default)]
    pub post_type: u32,
    /// Number of direct replies to this post.
    #[serde(default)]
    pub reply_count: u32,
    /// Post number this post replies to, if it is a reply to a specific post.
    #[serde(default)]
    pub reply_to_post_number: Option<u32>,
    /// Revision number, starting at 1 and increasing with every edit.
    #[serde(default)]
    pub version: u32,
    /// Whether the current user may edit this post.
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_edit: bool,
    /// Whether this post is the accepted answer of its topic (discourse-solved plugin).
    #[serde(default, deserialize_with = "null_as_default")]
    pub accepted_answer: bool,
    /// Whether the topic this post belongs to has an accepted answer (discourse-solved plugin).
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic_accepted_answer: bool,
}

impl Post {
    /// The best name to show for the author: the display username, then the full name, then the
    /// username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        [&self.display_username, &self.name]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .map_or(&self.username, |name| name)
    }
}

/// New content for an existing post.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Default, Serialize)]
pub struct PostUpdate {
    /// The new markdown source of the post.
    pub raw: String,
    /// Reason shown in the post's revision history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_reason: Option<String>,
}

/// Describes a post to create.
///
/// Leave [`topic_id`][`NewPost::topic_id`] empty and set a [`title`][`NewPost::title`] to start
/// a new topic; set `topic_id` to reply to an existing one.
#[derive(Clone, Default, Serialize)]
#[must_use]
pub struct NewPost {
    /// Markdown content.
    pub raw: String,
    /// Title of the new topic. Ignored when replying.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Topic to reply to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    /// Post number within the topic being replied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_post_number: Option<u32>,
    /// Category of the new topic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<u64>,
    /// Tags of the new topic.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Debug for NewPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_value(self).map_err(|_| fmt::Error)?)
    }
}

impl NewPost {
    /// Returns true if the post has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    pub(crate) async fn send(&self, session: &Session) -> Result<Post, Error> {
        if self.is_empty() {
            return Err(Error::EmptyPost);
        }
        tracing::debug!(post = ?self);

        let post: Post =
            crate::client::send_json(session.client.post("posts.json").json(self)).await?;
        tracing::info!(post_id = %post.id, topic_id = %post.topic_id);
        Ok(post)
    }
}

impl PostUpdate {
    pub(crate) async fn send(&self, session: &Session, id: PostId) -> Result<Post, Error> {
        let PostResponse { post } = crate::client::send_json(
            session
                .client
                .put(&format!("posts/{}.json", id))
                .json(&ApiPostUpdate { post: self }),
        )
        .await?;
        tracing::info!(post_id = %post.id, version = post.version);
        Ok(post)
    }
}

#[derive(Serialize)]
struct ApiPostUpdate<'a> {
    post: &'a PostUpdate,
}

#[derive(Deserialize)]
struct PostResponse {
    post: Post,
}

#[derive(Deserialize)]
pub(crate) struct LatestPosts {
    latest_posts: Vec<Post>,
}

impl From<LatestPosts> for Vec<Post> {
    fn from(latest: LatestPosts) -> Vec<Post> {
        latest.latest_posts
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{ApiPostUpdate, NewPost, Post, PostId, PostUpdate};
    use crate::TopicId;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    pub(crate) fn post(id: u64, post_number: u32) -> Post {
        Post {
            id: PostId(id),
            post_number,
            topic_id: TopicId(1),
            topic_slug: "a-topic".into(),
            username: format!("user{}", post_number),
            name: None,
            display_username: None,
            avatar_template: String::new(),
            created_at: Utc.timestamp_opt(1_700_000_000 + i64::from(post_number), 0).unwrap(),
            updated_at: None,
            raw: format!("post number {}", post_number),
            cooked: format!("<p>post number {}</p>", post_number),
            post_type: 1,
            reply_count: 0,
            reply_to_post_number: None,
            version: 1,
            can_edit: false,
            accepted_answer: false,
            topic_accepted_answer: false,
        }
    }

    #[test]
    fn test_deserialize_post() {
        let post: Post = serde_json::from_value(json!({
            "id": 1190,
            "name": null,
            "username": "codinghorror",
            "avatar_template": "/user_avatar/meta.discourse.org/codinghorror/{size}/110067_2.png",
            "created_at": "2013-02-05T21:29:00.280Z",
            "updated_at": "2013-02-06T10:11:12.000Z",
            "cooked": "<p>Hello</p>",
            "raw": "Hello",
            "post_number": 3,
            "post_type": 1,
            "reply_count": 2,
            "reply_to_post_number": null,
            "topic_id": 22706,
            "topic_slug": "welcome",
            "version": 4,
            "can_edit": false,
            "accepted_answer": false,
            "topic_accepted_answer": null,
            "some_field_we_dont_know": {"x": 1}
        }))
        .unwrap();
        assert_eq!(post.id, PostId(1190));
        assert_eq!(post.post_number, 3);
        assert_eq!(post.topic_id, TopicId(22706));
        assert_eq!(post.raw, "Hello");
        assert_eq!(post.version, 4);
        assert!(!post.topic_accepted_answer);
        assert_eq!(
            post.created_at,
            Utc.timestamp_millis_opt(1_360_099_740_280).unwrap()
        );
    }

    #[test]
    fn test_deserialize_minimal_post() {
        let post: Post = serde_json::from_value(json!({
            "id": 7,
            "username": "sam",
            "created_at": "2020-01-01T00:00:00Z",
            "post_number": 1,
        }))
        .unwrap();
        assert_eq!(post.raw, "");
        assert_eq!(post.topic_id, TopicId(0));
        assert!(post.updated_at.is_none());
    }

    #[test]
    fn test_deserialize_post_by_deleted_user() {
        let post: Post = serde_json::from_value(json!({
            "id": 8,
            "username": null,
            "name": null,
            "created_at": "2020-01-01T00:00:00Z",
            "post_number": 2,
        }))
        .unwrap();
        assert_eq!(post.username, "");
        assert_eq!(post.display_name(), "");
    }

    #[test]
    fn test_display_name() {
        let mut post = post(1, 1);
        assert_eq!(post.display_name(), "user1");
        post.name = Some(String::new());
        assert_eq!(post.display_name(), "user1");
        post.name = Some("Sam Saffron".into());
        assert_eq!(post.display_name(), "Sam Saffron");
        post.display_username = Some("sam".into());
        assert_eq!(post.display_name(), "sam");
    }

    #[test]
    fn test_serialize_post_update() {
        let update = PostUpdate {
            raw: "new body".into(),
            edit_reason: Some("typo".into()),
        };
        assert_eq!(
            serde_json::to_value(&ApiPostUpdate { post: &update }).unwrap(),
            json!({"post": {"raw": "new body", "edit_reason": "typo"}})
        );
        let update = PostUpdate {
            raw: "new body".into(),
            edit_reason: None,
        };
        assert_eq!(
            serde_json::to_value(&ApiPostUpdate { post: &update }).unwrap(),
            json!({"post": {"raw": "new body"}})
        );
    }

    #[test]
    fn test_serialize_new_post() {
        let reply = NewPost {
            raw: "me too".into(),
            topic_id: Some(TopicId(42)),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"raw": "me too", "topic_id": 42})
        );

        let topic = NewPost {
            raw: "first post".into(),
            title: Some("A new topic".into()),
            category: Some(5),
            tags: vec!["howto".into()],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&topic).unwrap(),
            json!({"raw": "first post", "title": "A new topic", "category": 5, "tags": ["howto"]})
        );
    }

    #[test]
    fn test_new_post_is_empty() {
        assert!(NewPost::default().is_empty());
        assert!(NewPost {
            raw: " \n".into(),
            ..Default::default()
        }
        .is_empty());
    }
}
