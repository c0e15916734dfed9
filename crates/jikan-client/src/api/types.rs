//! Jikan API v4 response types.
//!
//! Only the fields the catalog displays are modelled; everything else in the
//! upstream payload is ignored. Optional fields default when absent so a
//! sparse record never fails to decode.

use serde::{Deserialize, Deserializer, Serialize};

/// List response with pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PaginatedResponse<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pagination: Pagination,
}

/// List response without pagination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct DataResponse<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<T>,
}

/// Explicit `null` decodes like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Single-record response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Pagination metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub last_visible_page: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
}

/// Genre entry from `/genres/anime`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub mal_id: u32,
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

/// Anime record, shared by list and detail endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub mal_id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub images: Option<Images>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub aired: Option<Aired>,
    #[serde(default)]
    pub trailer: Option<Trailer>,
}

impl Anime {
    /// Regular-size poster URL
    pub fn image_url(&self) -> Option<&str> {
        self.images.as_ref().and_then(Images::image_url)
    }

    /// Large poster URL, used by the slider
    pub fn large_image_url(&self) -> Option<&str> {
        self.images.as_ref().and_then(Images::large_image_url)
    }

    /// YouTube video id of the trailer
    pub fn trailer_youtube_id(&self) -> Option<&str> {
        self.trailer
            .as_ref()
            .and_then(|t| t.youtube_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Start of the airing period as reported upstream
    pub fn aired_from(&self) -> Option<&str> {
        self.aired.as_ref().and_then(|a| a.from.as_deref())
    }
}

/// Image variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub jpg: Option<ImageSet>,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

impl Images {
    pub fn image_url(&self) -> Option<&str> {
        self.jpg
            .as_ref()
            .and_then(|set| set.image_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    pub fn large_image_url(&self) -> Option<&str> {
        self.jpg
            .as_ref()
            .and_then(|set| set.large_image_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub small_image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

/// Aired dates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aired {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub string: Option<String>,
}

/// Trailer reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    #[serde(default)]
    pub youtube_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Episode entry from `/anime/{id}/episodes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub mal_id: u32,
    #[serde(default)]
    pub title: Option<String>,
}

/// Streaming service link from `/anime/{id}/streaming`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingLink {
    pub name: String,
    pub url: String,
}

/// Character entry from `/anime/{id}/characters`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRole {
    pub character: Character,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub mal_id: u32,
    pub name: String,
    #[serde(default)]
    pub images: Option<Images>,
}

impl Character {
    pub fn image_url(&self) -> Option<&str> {
        self.images.as_ref().and_then(Images::image_url)
    }
}
