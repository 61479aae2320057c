//! Reassembling the full list of posts in a topic.
//!
//! A topic response embeds only the first chunk of its posts, along with the IDs of every post in
//! display order. [`collect_posts`] fills in the rest one post at a time.

use crate::pacing::Pacer;
use crate::{Client, Error, Post, PostId, Topic, TopicId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Something that can fetch topics and single posts. [`Client`] is the real one; the trait exists
/// so [`collect_posts`] doesn't care where posts come from.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch a topic, including its post stream.
    async fn topic(&self, id: TopicId) -> Result<Topic, Error>;
    /// Fetch a single post.
    async fn post(&self, id: PostId) -> Result<Post, Error>;
}

#[async_trait]
impl PostSource for Client {
    async fn topic(&self, id: TopicId) -> Result<Topic, Error> {
        self.get_topic(id).await
    }

    async fn post(&self, id: PostId) -> Result<Post, Error> {
        self.get_post(id).await
    }
}

/// Every post of a topic that could be fetched, ordered by post number.
#[derive(Clone, Debug)]
pub struct TopicPosts {
    /// The topic as fetched. Its inline posts have been moved into [`TopicPosts::posts`], so
    /// `topic.post_stream.posts` is empty.
    pub topic: Topic,
    /// The posts, ordered by post number, each ID appearing once.
    pub posts: Vec<Post>,
    /// Posts listed in the topic's stream that couldn't be fetched, in stream order.
    pub skipped: Vec<PostId>,
}

impl TopicPosts {
    /// Returns true if no post was skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Fetches every post of a topic.
///
/// The topic is fetched first; if that fails, the error is returned and no post is fetched. Each
/// post listed in the topic's stream but not embedded in the topic is then fetched on its own,
/// one after the other, with `pacer` deciding how long to wait between fetches. A post that can't
/// be fetched, whatever the reason, is logged and recorded in [`TopicPosts::skipped`].
#[tracing::instrument(skip(source, pacer))]
pub async fn collect_posts<S, P>(
    source: &S,
    pacer: &P,
    topic_id: TopicId,
) -> Result<TopicPosts, Error>
where
    S: PostSource + ?Sized,
    P: Pacer + ?Sized,
{
    let mut topic = source.topic(topic_id).await?;

    let mut loaded: HashMap<PostId, Post> = std::mem::take(&mut topic.post_stream.posts)
        .into_iter()
        .map(|post| (post.id, post))
        .collect();
    tracing::debug!(
        inline = loaded.len(),
        stream = topic.post_stream.stream.len()
    );

    let mut skipped = Vec::new();
    let mut failed = HashSet::new();
    let mut first = true;
    for &id in &topic.post_stream.stream {
        if loaded.contains_key(&id) || failed.contains(&id) {
            continue;
        }
        if !first {
            pacer.pause().await;
        }
        first = false;

        match source.post(id).await {
            Ok(post) => {
                loaded.insert(post.id, post);
            }
            Err(error) => {
                tracing::warn!(post_id = %id, %topic_id, %error, "skipping post");
                failed.insert(id);
                skipped.push(id);
            }
        }
    }

    let mut posts = loaded.into_values().collect::<Vec<_>>();
    posts.sort_by_key(|post| (post.post_number, post.id));
    tracing::info!(posts = posts.len(), skipped = skipped.len());

    Ok(TopicPosts {
        topic,
        posts,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::{collect_posts, PostSource};
    use crate::pacing::{NoDelay, Pacer};
    use crate::post::tests::post;
    use crate::topic::PostStream;
    use crate::{Error, Post, PostId, Topic, TopicId};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory forum: one topic, some posts fetchable by ID, everything else 404s.
    struct FakeForum {
        topic: Option<Topic>,
        posts: HashMap<PostId, Post>,
        fetched: Mutex<Vec<PostId>>,
    }

    impl FakeForum {
        fn new(stream: &[u64], inline: &[(u64, u32)], fetchable: &[(u64, u32)]) -> FakeForum {
            FakeForum {
                topic: Some(Topic {
                    id: TopicId(1),
                    title: "A topic".into(),
                    fancy_title: "A topic".into(),
                    slug: "a-topic".into(),
                    posts_count: u32::try_from(stream.len()).unwrap(),
                    created_at: None,
                    category_id: None,
                    tags: Vec::new(),
                    post_stream: PostStream {
                        posts: inline.iter().map(|&(id, n)| post(id, n)).collect(),
                        stream: stream.iter().copied().map(PostId).collect(),
                    },
                    accepted_answer: None,
                }),
                posts: fetchable
                    .iter()
                    .map(|&(id, n)| (PostId(id), post(id, n)))
                    .collect(),
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn fetched(&self) -> Vec<PostId> {
            self.fetched.lock().unwrap().clone()
        }
    }

    fn not_found(path: String) -> Error {
        Error::NotFound { path }
    }

    #[async_trait]
    impl PostSource for FakeForum {
        async fn topic(&self, id: TopicId) -> Result<Topic, Error> {
            self.topic
                .clone()
                .ok_or_else(|| not_found(format!("/t/{}.json", id)))
        }

        async fn post(&self, id: PostId) -> Result<Post, Error> {
            self.fetched.lock().unwrap().push(id);
            self.posts
                .get(&id)
                .cloned()
                .ok_or_else(|| not_found(format!("/posts/{}.json", id)))
        }
    }

    #[derive(Default)]
    struct CountingPacer(AtomicUsize);

    #[async_trait]
    impl Pacer for CountingPacer {
        async fn pause(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ids(posts: &[Post]) -> Vec<u64> {
        posts.iter().map(|post| post.id.0).collect()
    }

    fn numbers(posts: &[Post]) -> Vec<u32> {
        posts.iter().map(|post| post.post_number).collect()
    }

    #[tokio::test]
    async fn skips_failed_post() {
        let forum = FakeForum::new(&[101, 102, 103], &[(101, 1)], &[(102, 2)]);
        let result = collect_posts(&forum, &NoDelay, TopicId(1)).await.unwrap();
        assert_eq!(ids(&result.posts), [101, 102]);
        assert_eq!(numbers(&result.posts), [1, 2]);
        assert_eq!(result.skipped, [PostId(103)]);
        assert!(!result.is_complete());
        assert!(result.topic.post_stream.posts.is_empty());
        assert_eq!(forum.fetched(), [PostId(102), PostId(103)]);
    }

    #[tokio::test]
    async fn fetches_only_missing_posts() {
        let forum = FakeForum::new(
            &[1, 2, 3, 4, 5],
            &[(1, 1), (2, 2), (4, 4)],
            &[(3, 3), (5, 5)],
        );
        let result = collect_posts(&forum, &NoDelay, TopicId(1)).await.unwrap();
        assert_eq!(ids(&result.posts), [1, 2, 3, 4, 5]);
        assert!(result.is_complete());
        assert_eq!(forum.fetched(), [PostId(3), PostId(5)]);
    }

    #[tokio::test]
    async fn orders_by_post_number_not_id_or_stream() {
        // IDs deliberately out of step with post numbers, and the stream in neither order.
        let forum = FakeForum::new(
            &[500, 20, 7, 310],
            &[(310, 4), (500, 2)],
            &[(20, 1), (7, 3)],
        );
        let result = collect_posts(&forum, &NoDelay, TopicId(1)).await.unwrap();
        assert_eq!(numbers(&result.posts), [1, 2, 3, 4]);
        assert_eq!(ids(&result.posts), [20, 500, 7, 310]);
    }

    #[tokio::test]
    async fn topic_failure_fetches_nothing() {
        let mut forum = FakeForum::new(&[101, 102], &[], &[(101, 1), (102, 2)]);
        forum.topic = None;
        let error = collect_posts(&forum, &NoDelay, TopicId(1))
            .await
            .unwrap_err();
        assert!(error.is_not_found());
        assert!(forum.fetched().is_empty());
    }

    #[tokio::test]
    async fn no_duplicates() {
        // 102 is listed twice in the stream and also embedded.
        let forum = FakeForum::new(&[101, 102, 102, 103, 103], &[(102, 2)], &[(101, 1)]);
        let result = collect_posts(&forum, &NoDelay, TopicId(1)).await.unwrap();
        assert_eq!(ids(&result.posts), [101, 102]);
        assert_eq!(result.skipped, [PostId(103)]);
        assert_eq!(forum.fetched(), [PostId(101), PostId(103)]);
    }

    #[tokio::test]
    async fn failed_post_listed_once_in_stream_order() {
        let forum = FakeForum::new(&[9, 4, 9, 7, 4, 9], &[], &[(7, 3)]);
        let result = collect_posts(&forum, &NoDelay, TopicId(1)).await.unwrap();
        assert_eq!(ids(&result.posts), [7]);
        assert_eq!(result.skipped, [PostId(9), PostId(4)]);
        assert_eq!(forum.fetched(), [PostId(9), PostId(4), PostId(7)]);
    }

    #[tokio::test]
    async fn pauses_between_fetches_only() {
        let pacer = CountingPacer::default();
        let forum = FakeForum::new(&[1, 2, 3, 4], &[(1, 1)], &[(2, 2), (4, 4)]);
        collect_posts(&forum, &pacer, TopicId(1)).await.unwrap();
        // three fetches (2, 3, 4), two gaps between them
        assert_eq!(pacer.0.load(Ordering::SeqCst), 2);

        let pacer = CountingPacer::default();
        let forum = FakeForum::new(&[1, 2], &[(1, 1), (2, 2)], &[]);
        collect_posts(&forum, &pacer, TopicId(1)).await.unwrap();
        assert_eq!(pacer.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn idempotent() {
        let forum = FakeForum::new(
            &[11, 12, 13, 14, 15, 16],
            &[(11, 1), (15, 5)],
            &[(12, 2), (13, 3), (16, 6)],
        );
        let first = collect_posts(&forum, &NoDelay, TopicId(1)).await.unwrap();
        let second = collect_posts(&forum, &NoDelay, TopicId(1)).await.unwrap();
        assert_eq!(first.posts, second.posts);
        assert_eq!(first.skipped, second.skipped);
    }

    #[tokio::test]
    async fn all_posts_fail() {
        let forum = FakeForum::new(&[1, 2, 3], &[], &[]);
        let result = collect_posts(&forum, &NoDelay, TopicId(1)).await.unwrap();
        assert!(result.posts.is_empty());
        assert_eq!(result.skipped, [PostId(1), PostId(2), PostId(3)]);
    }
}
