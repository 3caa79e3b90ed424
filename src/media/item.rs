//! Media item representation.

use chrono::{DateTime, TimeZone, Utc};

/// Kind of media content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Default file extension for this kind.
    pub fn file_extension(&self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
        }
    }
}

/// A downloadable media item belonging to a post.
#[derive(Debug, Clone)]
pub struct MediaItem {
    /// Shortcode of the owning post.
    pub shortcode: String,

    /// Position within a multi-media (sidecar) post, 1-based.
    /// `None` for single-media posts.
    pub index: Option<u32>,

    pub kind: MediaKind,

    /// Direct download URL.
    pub url: String,

    /// Post creation time, unix seconds.
    pub taken_at: i64,
}

impl MediaItem {
    /// Generate the filename for this media item:
    /// `<UTC timestamp>_<shortcode>[_<index>].<ext>`.
    pub fn generate_filename(&self) -> String {
        match self.index {
            Some(n) => format!(
                "{}_{}_{}.{}",
                timestamp_slug(self.taken_at),
                self.shortcode,
                n,
                self.kind.file_extension()
            ),
            None => format!(
                "{}_{}.{}",
                timestamp_slug(self.taken_at),
                self.shortcode,
                self.kind.file_extension()
            ),
        }
    }
}

/// Filename-safe UTC timestamp, shared by media and metadata files.
pub fn timestamp_slug(taken_at: i64) -> String {
    let dt: DateTime<Utc> = Utc
        .timestamp_opt(taken_at, 0)
        .single()
        .unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap());
    dt.format("%Y-%m-%d_%H-%M-%S_UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: MediaKind, index: Option<u32>) -> MediaItem {
        MediaItem {
            shortcode: "B_K4CykAOtf".to_string(),
            index,
            kind,
            url: "https://example.com/media".to_string(),
            // 2020-04-18 10:30:00 UTC
            taken_at: 1587205800,
        }
    }

    #[test]
    fn test_single_image_filename() {
        assert_eq!(
            item(MediaKind::Image, None).generate_filename(),
            "2020-04-18_10-30-00_UTC_B_K4CykAOtf.jpg"
        );
    }

    #[test]
    fn test_sidecar_video_filename() {
        assert_eq!(
            item(MediaKind::Video, Some(2)).generate_filename(),
            "2020-04-18_10-30-00_UTC_B_K4CykAOtf_2.mp4"
        );
    }

    #[test]
    fn test_invalid_timestamp_falls_back_to_epoch() {
        let mut it = item(MediaKind::Image, None);
        it.taken_at = i64::MAX;
        assert!(it.generate_filename().starts_with("1970-01-01_00-00-00_UTC"));
    }
}
