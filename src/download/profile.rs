//! Profile download logic.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use crate::api::IgClient;
use crate::config::Config;
use crate::download::media::{download_post_media, fetch_to_file};
use crate::download::state::DownloadState;
use crate::error::Result;
use crate::fs::{ensure_dir, target_dir};

/// Download a profile's timeline posts and profile picture into a directory
/// named after the profile.
pub async fn download_profile(
    api: &IgClient,
    config: &Config,
    state: &mut DownloadState,
    profile_name: &str,
) -> Result<()> {
    tracing::info!("Fetching profile {}...", profile_name);
    let mut profile = api.profile(profile_name).await?;

    if profile.is_private {
        tracing::warn!(
            "{} is private; posts are only visible to accounts that follow it",
            profile_name
        );
    }
    if let Some(count) = profile.posts_count {
        tracing::info!("{} has {} posts", profile_name, count);
    }

    let dir = target_dir(config, profile_name)?;
    ensure_dir(&dir)?;

    // profile picture first
    if let Some(url) = profile.profile_pic_url.clone() {
        let path = dir.join(format!("{}_profile_pic.jpg", profile_name));
        if path.exists() {
            state.increment_skipped();
        } else if let Err(e) = fetch_to_file(api, &url, &path).await {
            state.increment_failed();
            tracing::warn!("Failed to download profile picture: {}", e);
        } else {
            state.increment_pic();
            tracing::info!("Downloaded: {}", path.display());
        }
    }

    let mut page = std::mem::take(&mut profile.first_page);
    loop {
        for post in &page.posts {
            download_post_media(api, state, post, &dir).await?;
        }

        let Some(cursor) = page.end_cursor else {
            break;
        };

        // pacing between timeline pages
        let delay_ms = rand::thread_rng().gen_range(2000..4000);
        sleep(Duration::from_millis(delay_ms)).await;

        page = api.profile_posts(&profile.id, &cursor).await?;
    }

    tracing::info!(
        "Profile download complete: {} pictures, {} videos",
        state.pic_count,
        state.vid_count
    );

    Ok(())
}
