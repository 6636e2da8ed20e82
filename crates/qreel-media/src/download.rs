//! Source clip acquisition over HTTP.

use futures::StreamExt;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use crate::error::{MediaError, MediaResult};
use crate::metrics;

/// Stream `source_url` into `dest`, returning the number of bytes written.
///
/// Only `http`, `https` and `file` URLs are accepted. A non-success status,
/// a transport error or an empty body is an acquisition failure; `dest` may
/// hold a partial body afterwards and is expected to live in scratch space.
pub async fn download_source(
    client: &reqwest::Client,
    source_url: &str,
    dest: &Path,
    timeout: Duration,
) -> MediaResult<u64> {
    let url = Url::parse(source_url)
        .map_err(|e| MediaError::acquisition_failed(format!("invalid source URL {:?}: {}", source_url, e)))?;

    let start = Instant::now();
    let bytes = match url.scheme() {
        "http" | "https" => fetch_http(client, url, dest, timeout).await?,
        "file" => copy_local(&url, dest).await?,
        other => {
            return Err(MediaError::acquisition_failed(format!(
                "unsupported URL scheme: {}",
                other
            )))
        }
    };

    if bytes == 0 {
        return Err(MediaError::acquisition_failed(format!(
            "empty body from {}",
            source_url
        )));
    }

    metrics::record_download_duration(start.elapsed().as_secs_f64());
    info!(bytes, dest = %dest.display(), "Downloaded source clip");
    Ok(bytes)
}

async fn fetch_http(
    client: &reqwest::Client,
    url: Url,
    dest: &Path,
    timeout: Duration,
) -> MediaResult<u64> {
    debug!(url = %url, "Fetching source clip");

    let response = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| MediaError::acquisition_failed(format!("request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MediaError::acquisition_failed(format!(
            "{} returned HTTP {}",
            url, status
        )));
    }

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            MediaError::acquisition_failed(format!("body of {} interrupted: {}", url, e))
        })?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

async fn copy_local(url: &Url, dest: &Path) -> MediaResult<u64> {
    let path = url
        .to_file_path()
        .map_err(|_| MediaError::acquisition_failed(format!("not a local path: {}", url)))?;

    tokio::fs::copy(&path, dest)
        .await
        .map_err(|e| MediaError::acquisition_failed(format!("cannot read {}: {}", path.display(), e)))
}
