//! Single post download logic.

use crate::api::IgClient;
use crate::config::Config;
use crate::download::media::download_post_media;
use crate::download::state::DownloadState;
use crate::error::Result;
use crate::fs::{ensure_dir, target_dir};

/// Download a single post by shortcode into a directory named after the
/// target.
pub async fn download_post(
    api: &IgClient,
    config: &Config,
    state: &mut DownloadState,
    shortcode: &str,
    target_name: &str,
) -> Result<()> {
    tracing::info!("Fetching post {}...", shortcode);
    let post = api.post(shortcode).await?;

    let dir = target_dir(config, target_name)?;
    ensure_dir(&dir)?;

    tracing::info!("Found {} media item(s) in post", post.items.len());
    download_post_media(api, state, &post, &dir).await?;

    tracing::info!(
        "Post download complete: {} pictures, {} videos",
        state.pic_count,
        state.vid_count
    );

    Ok(())
}
