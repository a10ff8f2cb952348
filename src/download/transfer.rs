//! Streaming HTTP body transfer into a local file.

use std::path::Path;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::catalog::CatalogError;

/// Streams `response` into a new file at `file_path`, returning bytes written.
///
/// Non-success statuses and mid-stream failures are reported as
/// [`CatalogError::TransferError`]; the partial file is removed on failure.
///
/// # Errors
///
/// Returns [`CatalogError::TransferError`] for HTTP failures and
/// [`CatalogError::PathConflict`]/[`CatalogError::Io`] when the file cannot be written.
pub async fn write_response_to_file(
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::transfer_status(url, status.as_u16()));
    }

    let mut file = File::create(file_path)
        .await
        .map_err(|e| CatalogError::from_fs(file_path, e))?;

    let result = stream_to_file(&mut file, response, url, file_path).await;
    if result.is_err() {
        debug!(path = %file_path.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(file_path).await;
    }
    result
}

async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, CatalogError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| CatalogError::transfer(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| CatalogError::from_fs(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| CatalogError::from_fs(file_path, e))?;

    Ok(bytes_written)
}
