use crate::{Error, Session};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;

/// A file to upload with [`Session::upload_image`].
#[derive(Debug)]
pub struct Upload {
    stream: Body,
    filename: String,
    content_type: String,
    content_length: u64,
}

/// An image stored on the server.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
pub struct UploadedImage {
    /// Upload ID.
    #[serde(default)]
    pub id: u64,
    /// URL of the stored file.
    pub url: String,
    /// `upload://` URL, which Discourse resolves when the image is embedded in a post.
    #[serde(default)]
    pub short_url: Option<String>,
    /// Name of the file as it was uploaded.
    #[serde(default)]
    pub original_filename: Option<String>,
    /// Width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Height in pixels.
    #[serde(default)]
    pub height: u32,
}

impl UploadedImage {
    /// Markdown that embeds this image in a post, in the form the Discourse composer produces.
    #[must_use]
    pub fn markdown(&self, alt_text: &str) -> String {
        format!(
            "![{}|{}x{}]({})",
            alt_text,
            self.width,
            self.height,
            self.short_url.as_deref().unwrap_or(&self.url)
        )
    }
}

impl Upload {
    /// Create an `Upload` from a buffer.
    ///
    /// # Panics
    ///
    /// Panics if the length of `content` overflows a [`u64`].
    pub fn new(content: impl Into<Bytes>, filename: String, content_type: String) -> Upload {
        let content: Bytes = content.into();
        Upload {
            content_length: content.len().try_into().unwrap(),
            stream: content.into(),
            filename,
            content_type,
        }
    }

    /// Create an `Upload` from a file on disk. The file is streamed, not read into memory.
    #[cfg(feature = "fs")]
    pub async fn new_from_file(
        path: impl AsRef<std::path::Path>,
        content_type: String,
    ) -> Result<Upload, std::io::Error> {
        use tokio::fs::File;
        use tokio_util::codec::{BytesCodec, FramedRead};

        let filename = path
            .as_ref()
            .file_name()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("file")
            .to_owned();

        let file = File::open(path).await?;
        let content_length = file.metadata().await?.len();
        let stream = Body::wrap_stream(FramedRead::new(file, BytesCodec::new()));

        Ok(Upload {
            stream,
            filename,
            content_type,
            content_length,
        })
    }

    /// Name the file will be uploaded under.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[tracing::instrument(
        skip(self, session),
        fields(filename = %self.filename, content_length = self.content_length)
    )]
    pub(crate) async fn send(self, session: &Session) -> Result<UploadedImage, Error> {
        let form = Form::new().text("type", "composer").part(
            "file",
            Part::stream_with_length(self.stream, self.content_length)
                .file_name(self.filename)
                .mime_str(&self.content_type)?,
        );

        let response = session
            .client
            .post("uploads.json")
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(Error::UploadRejected { status, body });
        }

        let image: UploadedImage = response.json().await?;
        tracing::info!(url = %image.url, image.width, image.height);
        Ok(image)
    }
}
