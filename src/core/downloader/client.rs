use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::core::error::{BootstrapError, BootstrapResult};

/// Plain GET downloader. No retry, no resume, no checksum.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn http_client(&self) -> &Client {
        &self.client
    }

    // ── Metadata requests ───────────────────────────────

    /// GET `url` and decode the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> BootstrapResult<T> {
        self.get_json_with(self.client.get(url), url).await
    }

    /// Same as [`get_json`](Self::get_json) for a caller-prepared request.
    pub async fn get_json_with<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> BootstrapResult<T> {
        let response = checked(request.send().await?, url)?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET `url` and return the body as text.
    pub async fn get_text(&self, url: &str) -> BootstrapResult<String> {
        let response = checked(self.client.get(url).send().await?, url)?;
        Ok(response.text().await?)
    }

    // ── File download ───────────────────────────────────

    /// Stream `url` into `dest`.
    ///
    /// `dest.part` is created before the request goes out so local
    /// filesystem problems surface first. It is renamed onto `dest` only once
    /// the whole body is written and removed on any failure, so `dest`
    /// existing always means a complete download.
    pub async fn download_file(&self, url: &str, dest: &Path) -> BootstrapResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| BootstrapError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let part = part_path(dest);
        let file = tokio::fs::File::create(&part)
            .await
            .map_err(|source| BootstrapError::Io {
                path: part.clone(),
                source,
            })?;

        let result = self.stream_into(url, file, &part).await;
        if let Err(err) = result {
            if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                warn!("Failed to remove partial download {:?}: {}", part, cleanup);
            }
            return Err(err);
        }

        tokio::fs::rename(&part, dest)
            .await
            .map_err(|source| BootstrapError::Io {
                path: dest.to_path_buf(),
                source,
            })?;

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(())
    }

    async fn stream_into(
        &self,
        url: &str,
        mut file: tokio::fs::File,
        part: &Path,
    ) -> BootstrapResult<()> {
        let response = checked(self.client.get(url).send().await?, url)?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|source| BootstrapError::Io {
                    path: part.to_path_buf(),
                    source,
                })?;
        }

        file.flush().await.map_err(|source| BootstrapError::Io {
            path: part.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

fn checked(response: Response, url: &str) -> BootstrapResult<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(BootstrapError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}
