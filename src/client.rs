use crate::aggregate::{self, TopicPosts};
use crate::pacing::{FixedDelay, Pacer};
use crate::tag::{TagPage, TopicSummary};
use crate::user_action::{UserAction, UserActionFilter, UserActionPage};
use crate::{Error, Post, PostId, Session, Topic, TopicId};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fmt::{self, Debug};

macro_rules! request_impl {
    ($($f:ident),* $(,)*) => {
        $(
            #[inline]
            pub(crate) fn $f(&self, path: &str) -> RequestBuilder {
                tracing::info!(path, concat!("Client::", stringify!($f)));
                self.authorize(self.client.$f(format!("{}{}", self.base_url, path)))
            }
        )*
    };
}

/// HTTP client.
///
/// A `Client` on its own makes anonymous requests, which is enough to read public topics. Use
/// [`Client::authenticate`] to get a [`Session`] that can write.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) base_url: Cow<'static, str>,
    pub(crate) client: reqwest::Client,
    pub(crate) credentials: Option<Credentials>,
}

#[derive(Clone)]
pub(crate) struct Credentials {
    api_key: String,
    username: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

impl Client {
    /// Creates a new `Client` with the default base URL, `https://meta.discourse.org/`. Use
    /// [`Client::with_base_url`] to point it at your own forum.
    #[must_use]
    #[allow(clippy::missing_panics_doc)] // tested to not panic
    pub fn new() -> Client {
        const USER_AGENT: &str = concat!("discourse-client/", env!("CARGO_PKG_VERSION"));

        Client {
            base_url: Cow::Borrowed("https://meta.discourse.org/"),
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap(),
            credentials: None,
        }
    }

    /// Creates a new `Client` with a custom base URL.
    #[must_use]
    pub fn with_base_url(mut self, mut base_url: String) -> Client {
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = Cow::Owned(base_url);
        self
    }

    /// Attaches an API key to this client, returning a [`Session`].
    ///
    /// Discourse API keys are sent as static `Api-Key` and `Api-Username` headers on every
    /// request; there is no login exchange.
    #[must_use]
    pub fn authenticate(mut self, api_key: &str, username: &str) -> Session {
        self.credentials = Some(Credentials {
            api_key: api_key.to_owned(),
            username: username.to_owned(),
        });
        tracing::info!(username, "using api key");
        Session { client: self }
    }

    /// Returns the base URL requests are made against, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the browser URL of a topic, e.g. `https://meta.discourse.org/t/some-slug/1234`.
    #[must_use]
    pub fn topic_url(&self, slug: &str, id: TopicId) -> String {
        format!("{}t/{}/{}", self.base_url, slug, id)
    }

    /// Get a topic, including its post stream and the first chunk of posts.
    #[tracing::instrument(skip(self))]
    pub async fn get_topic(&self, id: TopicId) -> Result<Topic, Error> {
        send_json(self.get(&format!("t/{}.json", id))).await
    }

    /// Get a single post.
    #[tracing::instrument(skip(self))]
    pub async fn get_post(&self, id: PostId) -> Result<Post, Error> {
        send_json(self.get(&format!("posts/{}.json", id))).await
    }

    /// Get the most recent posts across the whole forum.
    #[tracing::instrument(skip(self))]
    pub async fn get_latest_posts(&self) -> Result<Vec<Post>, Error> {
        let latest: crate::post::LatestPosts = send_json(self.get("posts.json")).await?;
        Ok(latest.into())
    }

    /// Get every post in a topic, ordered by post number.
    ///
    /// Posts missing from the initial topic response are fetched one at a time, with a short
    /// fixed delay between requests. Posts that can't be fetched are skipped and listed in
    /// [`TopicPosts::skipped`]. Use [`aggregate::collect_posts`] to control the pacing.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_posts(&self, id: TopicId) -> Result<TopicPosts, Error> {
        aggregate::collect_posts(self, &FixedDelay::default(), id).await
    }

    /// Get the post marked as the accepted answer of a topic, if there is one.
    ///
    /// This relies on the discourse-solved plugin; on forums without it, this returns `None`. An
    /// answer that was deleted or hidden since it was accepted also counts as `None`.
    #[tracing::instrument(skip(self))]
    pub async fn get_accepted_solution(&self, id: TopicId) -> Result<Option<Post>, Error> {
        let topic = self.get_topic(id).await?;
        match topic.solution() {
            Some(crate::topic::Solution::Inline(post)) => Ok(Some(post.clone())),
            Some(crate::topic::Solution::Remote(post_id)) => match self.get_post(post_id).await {
                Ok(post) => Ok(Some(post)),
                Err(error) if error.is_not_found() => {
                    tracing::warn!(%post_id, "accepted answer is gone");
                    Ok(None)
                }
                Err(error) => Err(error),
            },
            None => Ok(None),
        }
    }

    /// Get the first page of topics with the given tag.
    #[tracing::instrument(skip(self))]
    pub async fn get_tag(&self, name: &str) -> Result<TagPage, Error> {
        send_json(self.get(&format!("tag/{}.json", name))).await
    }

    /// Get a page of topics with the given tag.
    ///
    /// Pages start at 0. Once a page is shorter than [`TopicList::per_page`][crate::TopicList],
    /// there are no more pages after it.
    #[tracing::instrument(skip(self))]
    pub async fn get_tag_page(&self, name: &str, page: u64) -> Result<TagPage, Error> {
        if page == 0 {
            return self.get_tag(name).await;
        }
        send_json(
            self.get(&format!("tag/{}.json", name))
                .query(&[("page", page.to_string())]),
        )
        .await
    }

    /// Get every topic with the given tag, walking pages until the last one.
    #[tracing::instrument(skip(self, pacer))]
    pub async fn get_all_tag_topics<P>(
        &self,
        name: &str,
        pacer: &P,
    ) -> Result<Vec<TopicSummary>, Error>
    where
        P: Pacer + ?Sized,
    {
        let mut topics = Vec::new();
        let mut page = 0;
        loop {
            if page > 0 {
                pacer.pause().await;
            }
            let tag_page = self.get_tag_page(name, page).await?;
            let last = tag_page.is_last_page();
            topics.extend(tag_page.topic_list.topics);
            if last {
                break;
            }
            page += 1;
        }
        tracing::info!(pages = page + 1, topics = topics.len());
        Ok(topics)
    }

    /// Get the activity stream of a user, optionally restricted to one kind of action.
    ///
    /// Discourse returns 30 actions at a time; pass the number of actions already seen as
    /// `offset` to get the next batch.
    #[tracing::instrument(skip(self))]
    pub async fn get_user_actions(
        &self,
        username: &str,
        filter: Option<UserActionFilter>,
        offset: u64,
    ) -> Result<Vec<UserAction>, Error> {
        let mut query = vec![
            ("username", username.to_owned()),
            ("offset", offset.to_string()),
        ];
        if let Some(filter) = filter {
            query.push(("filter", filter.code().to_string()));
        }
        let page: UserActionPage = send_json(self.get("user_actions.json").query(&query)).await?;
        Ok(page.into())
    }

    request_impl!(delete, get, post, put);

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(Credentials { api_key, username }) => request
                .header("Api-Key", api_key)
                .header("Api-Username", username),
            None => request,
        }
    }
}

impl Default for Client {
    fn default() -> Client {
        Client::new()
    }
}

/// Sends a request and decodes the JSON body, mapping 404 to [`Error::NotFound`].
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, Error> {
    Ok(check_status(request.send().await?)?.json().await?)
}

pub(crate) fn check_status(response: Response) -> Result<Response, Error> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(Error::NotFound {
            path: response.url().path().to_owned(),
        });
    }
    Ok(response.error_for_status()?)
}

#[cfg(test)]
mod tests {
    use super::Client;
    use crate::TopicId;

    #[test]
    fn client_new_doesnt_panic() {
        drop(Client::new());
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = Client::new().with_base_url("https://forum.example.com".into());
        assert_eq!(client.base_url(), "https://forum.example.com/");
        let client = Client::new().with_base_url("https://forum.example.com/".into());
        assert_eq!(client.base_url(), "https://forum.example.com/");
    }

    #[test]
    fn topic_url() {
        let client = Client::new();
        assert_eq!(
            client.topic_url("welcome-to-meta", TopicId(22706)),
            "https://meta.discourse.org/t/welcome-to-meta/22706"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let session = Client::new().authenticate("s3cr3t-key", "system");
        let debug = format!("{:?}", session.client());
        assert!(!debug.contains("s3cr3t-key"));
        assert!(debug.contains("system"));
    }
}
