//! API response types and payload parsing.
//!
//! The GraphQL payloads are deeply nested and loosely versioned, so parsing
//! walks `serde_json::Value` trees instead of committing to rigid structs.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::media::{MediaItem, MediaKind};

/// Metadata of one post, saved alongside its media.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostMeta {
    pub shortcode: String,
    pub taken_at: i64,
    pub caption: Option<String>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
}

/// One post with its downloadable media items.
#[derive(Debug, Clone)]
pub struct PostMedia {
    pub meta: PostMeta,
    pub items: Vec<MediaItem>,
}

/// One page of a profile's timeline.
#[derive(Debug, Clone, Default)]
pub struct TimelinePage {
    pub posts: Vec<PostMedia>,
    /// Cursor for the next page, `None` when exhausted.
    pub end_cursor: Option<String>,
}

/// Profile lookup result, including the first timeline page.
#[derive(Debug, Clone)]
pub struct ProfileInfo {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub profile_pic_url: Option<String>,
    pub is_private: bool,
    pub posts_count: Option<u64>,
    pub first_page: TimelinePage,
}

/// Parse the `data.user` object of a `web_profile_info` response.
pub fn parse_profile(user: &Value) -> Result<ProfileInfo> {
    let id = user
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Api("profile payload has no user id".to_string()))?
        .to_string();

    let username = user
        .get("username")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let first_page = user
        .get("edge_owner_to_timeline_media")
        .map(parse_timeline)
        .unwrap_or_default();

    Ok(ProfileInfo {
        id,
        username,
        full_name: user
            .get("full_name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        profile_pic_url: user
            .get("profile_pic_url_hd")
            .or_else(|| user.get("profile_pic_url"))
            .and_then(|v| v.as_str())
            .map(str::to_string),
        is_private: user
            .get("is_private")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        posts_count: user
            .get("edge_owner_to_timeline_media")
            .and_then(|t| t.get("count"))
            .and_then(|v| v.as_u64()),
        first_page,
    })
}

/// Parse an `edge_owner_to_timeline_media` object into a timeline page.
pub fn parse_timeline(timeline: &Value) -> TimelinePage {
    let posts = timeline
        .get("edges")
        .and_then(|v| v.as_array())
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| edge.get("node"))
                .filter_map(parse_post_node)
                .collect()
        })
        .unwrap_or_default();

    let page_info = timeline.get("page_info");
    let has_next = page_info
        .and_then(|p| p.get("has_next_page"))
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let end_cursor = if has_next {
        page_info
            .and_then(|p| p.get("end_cursor"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    } else {
        None
    };

    TimelinePage { posts, end_cursor }
}

/// Parse one GraphQL media node (timeline entry or `shortcode_media`).
///
/// Sidecar posts expand into one item per child, indexed in display order.
/// Returns `None` when the node has no usable media URL.
pub fn parse_post_node(node: &Value) -> Option<PostMedia> {
    let shortcode = node.get("shortcode").and_then(|v| v.as_str())?.to_string();
    let taken_at = node
        .get("taken_at_timestamp")
        .and_then(|v| v.as_i64())
        .unwrap_or(0);

    let caption = node
        .get("edge_media_to_caption")
        .and_then(|c| c.get("edges"))
        .and_then(|v| v.as_array())
        .and_then(|edges| edges.first())
        .and_then(|edge| edge.get("node"))
        .and_then(|n| n.get("text"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let likes = node
        .get("edge_liked_by")
        .or_else(|| node.get("edge_media_preview_like"))
        .and_then(|e| e.get("count"))
        .and_then(|v| v.as_u64());

    let comments = node
        .get("edge_media_to_comment")
        .and_then(|e| e.get("count"))
        .and_then(|v| v.as_u64());

    let children = node
        .get("edge_sidecar_to_children")
        .and_then(|s| s.get("edges"))
        .and_then(|v| v.as_array());

    let items = match children {
        Some(edges) => edges
            .iter()
            .filter_map(|edge| edge.get("node"))
            .enumerate()
            .filter_map(|(i, child)| {
                media_item_from_node(child, &shortcode, taken_at, Some(i as u32 + 1))
            })
            .collect::<Vec<_>>(),
        None => media_item_from_node(node, &shortcode, taken_at, None)
            .into_iter()
            .collect(),
    };

    if items.is_empty() {
        return None;
    }

    Some(PostMedia {
        meta: PostMeta {
            shortcode,
            taken_at,
            caption,
            likes,
            comments,
        },
        items,
    })
}

fn media_item_from_node(
    node: &Value,
    shortcode: &str,
    taken_at: i64,
    index: Option<u32>,
) -> Option<MediaItem> {
    let is_video = node
        .get("is_video")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let (kind, url) = if is_video {
        let url = node
            .get("video_url")
            .or_else(|| node.get("display_url"))
            .and_then(|v| v.as_str())?;
        let kind = if node.get("video_url").and_then(|v| v.as_str()).is_some() {
            MediaKind::Video
        } else {
            // video node without a direct video URL, fall back to the poster
            MediaKind::Image
        };
        (kind, url)
    } else {
        (
            MediaKind::Image,
            node.get("display_url").and_then(|v| v.as_str())?,
        )
    };

    Some(MediaItem {
        shortcode: shortcode.to_string(),
        index,
        kind,
        url: url.to_string(),
        taken_at,
    })
}

/// Locate the media node in a single-post lookup response. The endpoint has
/// answered with either a GraphQL wrapper or an `items` array over time.
pub fn parse_post_payload(body: &Value, shortcode: &str) -> Result<PostMedia> {
    let node = body
        .get("graphql")
        .and_then(|g| g.get("shortcode_media"))
        .or_else(|| {
            body.get("items")
                .and_then(|v| v.as_array())
                .and_then(|items| items.first())
        })
        .ok_or_else(|| Error::PostNotFound(shortcode.to_string()))?;

    parse_post_node(node).ok_or_else(|| Error::PostNotFound(shortcode.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image_node() -> Value {
        json!({
            "shortcode": "B_K4CykAOtf",
            "taken_at_timestamp": 1587205800,
            "is_video": false,
            "display_url": "https://cdn.example.com/pic.jpg",
            "edge_media_to_caption": {
                "edges": [{"node": {"text": "spring"}}]
            },
            "edge_liked_by": {"count": 42},
            "edge_media_to_comment": {"count": 7}
        })
    }

    #[test]
    fn test_parse_image_node() {
        let post = parse_post_node(&image_node()).unwrap();
        assert_eq!(post.meta.shortcode, "B_K4CykAOtf");
        assert_eq!(post.meta.caption.as_deref(), Some("spring"));
        assert_eq!(post.meta.likes, Some(42));
        assert_eq!(post.items.len(), 1);
        assert_eq!(post.items[0].kind, MediaKind::Image);
        assert_eq!(post.items[0].index, None);
    }

    #[test]
    fn test_parse_video_node() {
        let node = json!({
            "shortcode": "Cvideo123",
            "taken_at_timestamp": 1587205800,
            "is_video": true,
            "display_url": "https://cdn.example.com/poster.jpg",
            "video_url": "https://cdn.example.com/clip.mp4"
        });
        let post = parse_post_node(&node).unwrap();
        assert_eq!(post.items[0].kind, MediaKind::Video);
        assert_eq!(post.items[0].url, "https://cdn.example.com/clip.mp4");
    }

    #[test]
    fn test_parse_sidecar_node() {
        let node = json!({
            "shortcode": "Csidecar1",
            "taken_at_timestamp": 1587205800,
            "is_video": false,
            "display_url": "https://cdn.example.com/cover.jpg",
            "edge_sidecar_to_children": {
                "edges": [
                    {"node": {"is_video": false, "display_url": "https://cdn.example.com/1.jpg"}},
                    {"node": {"is_video": true, "video_url": "https://cdn.example.com/2.mp4"}}
                ]
            }
        });
        let post = parse_post_node(&node).unwrap();
        assert_eq!(post.items.len(), 2);
        assert_eq!(post.items[0].index, Some(1));
        assert_eq!(post.items[1].index, Some(2));
        assert_eq!(post.items[1].kind, MediaKind::Video);
    }

    #[test]
    fn test_parse_node_without_media_is_none() {
        let node = json!({"shortcode": "Cempty", "taken_at_timestamp": 0});
        assert!(parse_post_node(&node).is_none());
    }

    #[test]
    fn test_parse_profile_with_timeline() {
        let user = json!({
            "id": "123456",
            "username": "someuser",
            "full_name": "Some User",
            "is_private": false,
            "profile_pic_url": "https://cdn.example.com/small.jpg",
            "profile_pic_url_hd": "https://cdn.example.com/hd.jpg",
            "edge_owner_to_timeline_media": {
                "count": 2,
                "page_info": {"has_next_page": true, "end_cursor": "QVFE=="},
                "edges": [{"node": image_node()}]
            }
        });
        let profile = parse_profile(&user).unwrap();
        assert_eq!(profile.id, "123456");
        assert_eq!(
            profile.profile_pic_url.as_deref(),
            Some("https://cdn.example.com/hd.jpg")
        );
        assert_eq!(profile.posts_count, Some(2));
        assert_eq!(profile.first_page.posts.len(), 1);
        assert_eq!(profile.first_page.end_cursor.as_deref(), Some("QVFE=="));
    }

    #[test]
    fn test_parse_timeline_last_page_has_no_cursor() {
        let timeline = json!({
            "page_info": {"has_next_page": false, "end_cursor": "QVFE=="},
            "edges": []
        });
        let page = parse_timeline(&timeline);
        assert!(page.posts.is_empty());
        assert!(page.end_cursor.is_none());
    }

    #[test]
    fn test_parse_profile_without_id_is_error() {
        assert!(parse_profile(&json!({"username": "x"})).is_err());
    }

    #[test]
    fn test_parse_post_payload_graphql_shape() {
        let body = json!({"graphql": {"shortcode_media": image_node()}});
        let post = parse_post_payload(&body, "B_K4CykAOtf").unwrap();
        assert_eq!(post.meta.shortcode, "B_K4CykAOtf");
    }

    #[test]
    fn test_parse_post_payload_items_shape() {
        let body = json!({"items": [image_node()]});
        assert!(parse_post_payload(&body, "B_K4CykAOtf").is_ok());
    }

    #[test]
    fn test_parse_post_payload_missing() {
        let body = json!({"status": "ok"});
        assert!(matches!(
            parse_post_payload(&body, "gone"),
            Err(Error::PostNotFound(_))
        ));
    }
}
