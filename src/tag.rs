use crate::de::null_as_default;
use crate::TopicId;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A tag reference. Older Discourse versions list tags as plain names; newer ones send objects.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TagRef {
    /// A tag given by name only.
    Name(String),
    /// A tag given as an object.
    Object {
        /// Tag name.
        name: String,
    },
}

impl TagRef {
    /// The tag's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TagRef::Name(name) | TagRef::Object { name } => name,
        }
    }
}

/// A page of topics carrying a tag, as returned by [`Client::get_tag_page`][`crate::Client::get_tag_page`].
#[derive(Clone, Debug, Deserialize)]
pub struct TagPage {
    /// Users referenced by the [`Poster`]s of the topics on this page.
    #[serde(default)]
    pub users: Vec<User>,
    /// The topics on this page.
    pub topic_list: TopicList,
}

impl TagPage {
    /// Returns true if there are no pages after this one.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        let topics = &self.topic_list.topics;
        topics.is_empty()
            || u32::try_from(topics.len()).map_or(false, |n| n < self.topic_list.per_page)
    }

    /// Looks up the user behind a poster.
    #[must_use]
    pub fn user(&self, poster: &Poster) -> Option<&User> {
        self.users.iter().find(|user| user.id == poster.user_id)
    }
}

/// A list of topics.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
pub struct TopicList {
    /// Whether the current user may create a topic here.
    #[serde(default)]
    pub can_create_topic: bool,
    /// Number of topics on a full page.
    #[serde(default)]
    pub per_page: u32,
    /// The topics.
    #[serde(default)]
    pub topics: Vec<TopicSummary>,
}

/// A topic as it appears in a topic list. Unlike [`Topic`][`crate::Topic`], this carries no posts.
#[derive(Clone, Debug, Deserialize)]
pub struct TopicSummary {
    /// Topic ID.
    pub id: TopicId,
    /// Plain title.
    pub title: String,
    /// Title with emoji and typographic quotes rendered as HTML entities.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fancy_title: String,
    /// URL slug.
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    /// Number of posts, including the first one.
    #[serde(default)]
    pub posts_count: u32,
    /// Number of replies.
    #[serde(default)]
    pub reply_count: u32,
    /// Post number of the latest post.
    #[serde(default)]
    pub highest_post_number: u32,
    /// When the topic was created.
    pub created_at: DateTime<Utc>,
    /// When the latest post was made.
    #[serde(default)]
    pub last_posted_at: Option<DateTime<Utc>>,
    /// When the topic was last bumped to the top of the list.
    #[serde(default)]
    pub bumped_at: Option<DateTime<Utc>>,
    /// Whether the topic is pinned.
    #[serde(default, deserialize_with = "null_as_default")]
    pub pinned: bool,
    /// Whether the current user unpinned the topic. `None` when the topic was never pinned.
    #[serde(default)]
    pub unpinned: Option<bool>,
    /// Excerpt of the first post; only sent for pinned topics on most sites.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Whether the topic is listed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub visible: bool,
    /// Whether the topic is closed to new replies.
    #[serde(default, deserialize_with = "null_as_default")]
    pub closed: bool,
    /// Whether the topic is archived.
    #[serde(default, deserialize_with = "null_as_default")]
    pub archived: bool,
    /// Tags on the topic.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<TagRef>,
    /// Number of likes across all posts.
    #[serde(default)]
    pub like_count: u32,
    /// Number of views.
    #[serde(default)]
    pub views: u32,
    /// Category the topic is filed under.
    #[serde(default)]
    pub category_id: Option<u64>,
    /// Participants, original poster first and most recent poster last.
    #[serde(default)]
    pub posters: Vec<Poster>,
}

impl TopicSummary {
    /// The most recent poster, if any.
    #[must_use]
    pub fn last_poster(&self) -> Option<&Poster> {
        self.posters.last()
    }
}

/// A participant in a topic, as listed in a [`TopicSummary`].
#[derive(Clone, Debug, Deserialize)]
pub struct Poster {
    /// Refers to a [`User`] in [`TagPage::users`].
    pub user_id: u64,
    /// Role of the poster, e.g. "Original Poster, Most Recent Poster".
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Extra CSS class, `"latest"` for the most recent poster.
    #[serde(default)]
    pub extras: Option<String>,
}

/// A user, as listed alongside a topic list.
#[derive(Clone, Debug, Deserialize)]
pub struct User {
    /// User ID.
    pub id: u64,
    /// Username.
    pub username: String,
    /// Full name, if set.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL template, with `{size}` standing in for the pixel size.
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_template: String,
}
