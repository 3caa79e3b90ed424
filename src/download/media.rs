//! Media file downloading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::sleep;

use crate::api::types::{PostMedia, PostMeta};
use crate::api::IgClient;
use crate::download::state::DownloadState;
use crate::error::Result;
use crate::media::{timestamp_slug, MediaItem, MediaKind};

/// Minimum body size to show a progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Download every media item of one post into `target_dir`, plus a JSON
/// metadata sidecar. A failed item is counted and skipped; the rest of the
/// post still downloads.
pub async fn download_post_media(
    api: &IgClient,
    state: &mut DownloadState,
    post: &PostMedia,
    target_dir: &Path,
) -> Result<()> {
    for item in &post.items {
        // pacing between media requests
        let delay_ms = rand::thread_rng().gen_range(400..750);
        sleep(Duration::from_millis(delay_ms)).await;

        if let Err(e) = download_media_item(api, state, item, target_dir).await {
            state.increment_failed();
            tracing::warn!("Failed to download {}: {}", item.generate_filename(), e);
        }
    }

    write_post_metadata(&post.meta, target_dir)?;
    Ok(())
}

/// Download a single media item. Files already on disk are skipped.
pub async fn download_media_item(
    api: &IgClient,
    state: &mut DownloadState,
    item: &MediaItem,
    target_dir: &Path,
) -> Result<Option<PathBuf>> {
    let filename = item.generate_filename();
    let output_path = target_dir.join(&filename);

    if output_path.exists() {
        state.increment_skipped();
        tracing::debug!("Skipping existing file: {}", output_path.display());
        return Ok(None);
    }

    tokio::fs::create_dir_all(target_dir).await?;
    fetch_to_file(api, &item.url, &output_path).await?;

    match item.kind {
        MediaKind::Image => state.increment_pic(),
        MediaKind::Video => state.increment_vid(),
    }
    tracing::info!("Downloaded: {}", output_path.display());

    Ok(Some(output_path))
}

/// Stream a URL into a file, with a progress bar for large bodies.
pub async fn fetch_to_file(api: &IgClient, url: &str, output_path: &Path) -> Result<()> {
    let response = api.download(url).await?;

    let content_length = response.content_length();
    let progress = content_length
        .filter(|len| *len > PROGRESS_THRESHOLD)
        .map(|len| {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb
        });

    let mut file = File::create(output_path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        if let Some(pb) = &progress {
            pb.inc(chunk.len() as u64);
        }
    }

    file.flush().await?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(())
}

/// Write the post's metadata sidecar next to its media.
fn write_post_metadata(meta: &PostMeta, target_dir: &Path) -> Result<()> {
    let path = target_dir.join(format!(
        "{}_{}.json",
        timestamp_slug(meta.taken_at),
        meta.shortcode
    ));

    let content = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_write_post_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let meta = PostMeta {
            shortcode: "B_K4CykAOtf".to_string(),
            taken_at: 1587205800,
            caption: Some("spring".to_string()),
            likes: Some(42),
            comments: None,
        };

        write_post_metadata(&meta, dir.path()).unwrap();

        let path = dir
            .path()
            .join("2020-04-18_10-30-00_UTC_B_K4CykAOtf.json");
        let content = std::fs::read_to_string(path).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["shortcode"], "B_K4CykAOtf");
        assert_eq!(value["caption"], "spring");
    }
}
