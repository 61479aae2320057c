use crate::de::null_as_default;
use crate::tag::TagRef;
use crate::{Post, PostId};
use chrono::{DateTime, Utc};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// A topic ID.
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
pub struct TopicId(pub u64);

/// A topic, as returned by [`Client::get_topic`][`crate::Client::get_topic`].
#[derive(Clone, Debug, Deserialize)]
pub struct Topic {
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
    /// Number of posts in the topic, including the first one.
    #[serde(default)]
    pub posts_count: u32,
    /// When the topic was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Category the topic is filed under.
    #[serde(default)]
    pub category_id: Option<u64>,
    /// Tags on the topic.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<TagRef>,
    /// The IDs of every post in the topic and the first few posts themselves.
    pub post_stream: PostStream,
    /// Summary of the accepted answer (discourse-solved plugin).
    #[serde(default)]
    pub accepted_answer: Option<AcceptedAnswer>,
}

/// The posts of a topic.
///
/// Discourse only embeds the first chunk of posts (usually 20) in a topic response, but always
/// lists the IDs of every post in display order.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PostStream {
    /// Posts embedded in the topic response. Not necessarily every post in the topic.
    #[serde(default)]
    pub posts: Vec<Post>,
    /// IDs of every post in the topic, in display order.
    #[serde(default)]
    pub stream: Vec<PostId>,
}

/// Summary of a topic's accepted answer, as provided by the discourse-solved plugin.
#[derive(Clone, Debug, Deserialize)]
pub struct AcceptedAnswer {
    /// Post number of the answer within the topic.
    pub post_number: u32,
    /// Username of the answer's author.
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    /// Full name of the answer's author.
    #[serde(default)]
    pub name: Option<String>,
    /// Plain-text excerpt of the answer.
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
}

/// Where to find a topic's accepted answer.
#[derive(Debug)]
pub(crate) enum Solution<'a> {
    Inline(&'a Post),
    Remote(PostId),
}

impl Topic {
    /// Returns the embedded post with the given post number, if it was part of the topic
    /// response.
    #[must_use]
    pub fn inline_post(&self, post_number: u32) -> Option<&Post> {
        self.post_stream
            .posts
            .iter()
            .find(|post| post.post_number == post_number)
    }

    /// Maps a post number to a post ID through the post stream.
    ///
    /// This is positional: it assumes no post before `post_number` has been removed from the
    /// stream, which holds for most topics but not for those with deleted posts.
    #[must_use]
    pub fn post_id_at(&self, post_number: u32) -> Option<PostId> {
        let index = usize::try_from(post_number).ok()?.checked_sub(1)?;
        self.post_stream.stream.get(index).copied()
    }

    pub(crate) fn solution(&self) -> Option<Solution<'_>> {
        if let Some(answer) = &self.accepted_answer {
            return match self.inline_post(answer.post_number) {
                Some(post) => Some(Solution::Inline(post)),
                None => self.post_id_at(answer.post_number).map(Solution::Remote),
            };
        }
        self.post_stream
            .posts
            .iter()
            .find(|post| post.accepted_answer)
            .map(Solution::Inline)
    }
}
