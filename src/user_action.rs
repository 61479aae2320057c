use crate::de::null_as_default;
use crate::{PostId, TopicId};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Kinds of user actions, for filtering [`Client::get_user_actions`][`crate::Client::get_user_actions`].
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserActionFilter {
    /// Posts the user liked.
    Like,
    /// The user's posts that were liked by someone else.
    WasLiked,
    /// Topics the user started.
    NewTopic,
    /// Replies the user made.
    Reply,
    /// Replies to the user.
    Response,
    /// Posts mentioning the user.
    Mention,
    /// Posts quoting the user.
    Quote,
    /// Edits the user made.
    Edit,
}

impl UserActionFilter {
    /// The numeric action type Discourse uses for this filter.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            UserActionFilter::Like => 1,
            UserActionFilter::WasLiked => 2,
            UserActionFilter::NewTopic => 4,
            UserActionFilter::Reply => 5,
            UserActionFilter::Response => 6,
            UserActionFilter::Mention => 7,
            UserActionFilter::Quote => 9,
            UserActionFilter::Edit => 11,
        }
    }

    /// Maps a numeric action type back to a filter, if it is one this crate knows about.
    #[must_use]
    pub fn from_code(code: u32) -> Option<UserActionFilter> {
        [
            UserActionFilter::Like,
            UserActionFilter::WasLiked,
            UserActionFilter::NewTopic,
            UserActionFilter::Reply,
            UserActionFilter::Response,
            UserActionFilter::Mention,
            UserActionFilter::Quote,
            UserActionFilter::Edit,
        ]
        .into_iter()
        .find(|filter| filter.code() == code)
    }
}

/// An entry in a user's activity stream.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
pub struct UserAction {
    /// Numeric action type; see [`UserAction::kind`].
    pub action_type: u32,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
    /// Plain-text excerpt of the post involved.
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
    /// Topic the action happened in.
    pub topic_id: TopicId,
    /// Title of that topic.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Slug of that topic.
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    /// Post involved, if any.
    #[serde(default)]
    pub post_id: Option<PostId>,
    /// Post number of the post involved, if any.
    #[serde(default)]
    pub post_number: Option<u32>,
    /// Author of the post involved.
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    /// User who performed the action.
    #[serde(default)]
    pub acting_username: Option<String>,
    /// User the action was aimed at.
    #[serde(default)]
    pub target_username: Option<String>,
}

impl UserAction {
    /// The kind of action, if it is one this crate knows about.
    #[must_use]
    pub fn kind(&self) -> Option<UserActionFilter> {
        UserActionFilter::from_code(self.action_type)
    }
}

#[derive(Deserialize)]
pub(crate) struct UserActionPage {
    #[serde(default)]
    user_actions: Vec<UserAction>,
}

impl From<UserActionPage> for Vec<UserAction> {
    fn from(page: UserActionPage) -> Vec<UserAction> {
        page.user_actions
    }
}
