use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::utils::{decode_entities, is_image_host_url, null_default};

pub mod kind {
    pub const LISTING: &str = "Listing";
    pub const COMMENT: &str = "t1";
    pub const LINK: &str = "t3";
    pub const MORE: &str = "more";
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Thing<T> {
    #[serde(default)]
    pub kind: String,
    pub data: T,
}

impl<T> Thing<T> {
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de>"))]
pub struct Listing<T> {
    #[serde(deserialize_with = "null_default")]
    pub after: String,
    #[serde(deserialize_with = "null_default")]
    pub children: Vec<T>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            after: String::new(),
            children: Vec::new(),
        }
    }
}

/// A post ("link") as it appears in both the post-detail payload and the
/// forum listing payload.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkData {
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub author: String,
    #[serde(deserialize_with = "null_default")]
    pub created_utc: f64,
    #[serde(deserialize_with = "null_default")]
    pub score: i64,
    #[serde(deserialize_with = "null_default")]
    pub num_comments: i64,
    #[serde(deserialize_with = "null_default")]
    pub selftext: String,
    #[serde(deserialize_with = "null_default")]
    pub permalink: String,
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    #[serde(deserialize_with = "null_default")]
    pub is_self: bool,
    #[serde(deserialize_with = "null_default")]
    pub is_gallery: bool,
    #[serde(deserialize_with = "null_default")]
    pub is_video: bool,
    #[serde(deserialize_with = "null_default")]
    pub post_hint: String,
    #[serde(deserialize_with = "null_default")]
    pub removed_by_category: String,
    #[serde(deserialize_with = "null_default")]
    pub preview: Preview,
    #[serde(deserialize_with = "null_default")]
    pub media_metadata: BTreeMap<String, MediaMetadata>,
    #[serde(deserialize_with = "null_default")]
    pub gallery_data: GalleryData,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaMetadata {
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    /// Media type, e.g. "Image" or "AnimatedImage".
    #[serde(deserialize_with = "null_default")]
    pub e: String,
    /// Mime type.
    #[serde(deserialize_with = "null_default")]
    pub m: String,
    #[serde(deserialize_with = "null_default")]
    pub s: MediaSource,
}

impl MediaMetadata {
    pub fn is_valid_image(&self) -> bool {
        self.status == "valid" && self.e.eq_ignore_ascii_case("Image") && !self.s.u.is_empty()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSource {
    #[serde(deserialize_with = "null_default")]
    pub u: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryData {
    #[serde(deserialize_with = "null_default")]
    pub items: Vec<GalleryItem>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryItem {
    #[serde(deserialize_with = "null_default")]
    pub media_id: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preview {
    #[serde(deserialize_with = "null_default")]
    pub images: Vec<PreviewImage>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewImage {
    #[serde(deserialize_with = "null_default")]
    pub source: PreviewSource,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSource {
    #[serde(deserialize_with = "null_default")]
    pub url: String,
}

impl LinkData {
    /// Valid gallery images in gallery order. Media ids the gallery does not
    /// list follow in id order.
    pub fn gallery_images(&self) -> Vec<String> {
        if !self.is_gallery || self.media_metadata.is_empty() {
            return vec![];
        }
        let mut ids: Vec<&str> = self
            .gallery_data
            .items
            .iter()
            .map(|item| item.media_id.as_str())
            .filter(|id| self.media_metadata.contains_key(*id))
            .collect();
        for id in self.media_metadata.keys() {
            if !ids.contains(&id.as_str()) {
                ids.push(id);
            }
        }
        ids.into_iter()
            .filter_map(|id| self.media_metadata.get(id))
            .filter(|media| media.is_valid_image())
            .map(|media| decode_entities(&media.s.u))
            .collect()
    }

    pub fn preview_images(&self) -> Vec<String> {
        self.preview
            .images
            .iter()
            .filter(|img| !img.source.url.is_empty())
            .map(|img| decode_entities(&img.source.url))
            .collect()
    }

    pub fn has_direct_image(&self) -> bool {
        is_image_host_url(&self.url)
    }
}
