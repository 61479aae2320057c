use crate::{Client, Error, NewPost, Post, PostId, PostUpdate, Upload, UploadedImage};

/// Authenticated session, for operations that need an API key.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) client: Client,
}

impl Session {
    /// Creates a session for the forum at `base_url`, authenticating every request with the given
    /// API key on behalf of `username`.
    ///
    /// Securely storing the API key is an exercise left to the caller.
    #[must_use]
    pub fn new(base_url: String, api_key: &str, username: &str) -> Session {
        Client::new()
            .with_base_url(base_url)
            .authenticate(api_key, username)
    }

    /// The underlying client, for reads. Requests made through it are authenticated too, so
    /// private topics are visible.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Create a post: either a new topic or a reply to an existing one.
    #[tracing::instrument(skip(self))]
    pub async fn create_post(&self, post: &NewPost) -> Result<Post, Error> {
        post.send(self).await
    }

    /// Replace the content of a post, returning the post as it is after the edit.
    #[tracing::instrument(skip(self))]
    pub async fn update_post(&self, id: PostId, update: &PostUpdate) -> Result<Post, Error> {
        update.send(self, id).await
    }

    /// Delete a post.
    #[tracing::instrument(skip(self))]
    pub async fn delete_post(&self, id: PostId) -> Result<(), Error> {
        crate::client::check_status(
            self.client
                .delete(&format!("posts/{}.json", id))
                .send()
                .await?,
        )?;
        Ok(())
    }

    /// Upload an image, to be embedded in a post with [`UploadedImage::markdown`].
    #[tracing::instrument(skip(self, upload))]
    pub async fn upload_image(&self, upload: Upload) -> Result<UploadedImage, Error> {
        upload.send(self).await
    }
}
