//! Upstream endpoints consumed by the catalog.
//!
//! Each endpoint knows its path, its query parameters and the cache key its
//! response is stored under.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/genres/anime`
    Genres,
    /// `/anime?genres=<id>&page=<n>`
    AnimeByGenre { genre_id: u32, page: u32 },
    /// `/anime?q=<query>&page=<n>`
    Search { query: String, page: u32 },
    /// `/top/anime?page=<n>`
    TopAnime { page: u32 },
    /// `/top/anime?limit=<n>`
    Featured { limit: u32 },
    /// `/seasons/now`
    SeasonNow,
    /// `/seasons/upcoming`
    SeasonUpcoming,
    /// `/anime/<id>`
    Anime(u32),
    /// `/anime/<id>/episodes`
    Episodes(u32),
    /// `/anime/<id>/streaming`
    Streaming(u32),
    /// `/anime/<id>/characters`
    Characters(u32),
}

impl Endpoint {
    /// Path segments below the API base URL
    pub fn segments(&self) -> Vec<String> {
        let segments: &[&str] = match self {
            Endpoint::Genres => &["genres", "anime"],
            Endpoint::AnimeByGenre { .. } | Endpoint::Search { .. } => &["anime"],
            Endpoint::TopAnime { .. } | Endpoint::Featured { .. } => &["top", "anime"],
            Endpoint::SeasonNow => &["seasons", "now"],
            Endpoint::SeasonUpcoming => &["seasons", "upcoming"],
            Endpoint::Anime(id) => return vec!["anime".to_string(), id.to_string()],
            Endpoint::Episodes(id) => return anime_child(*id, "episodes"),
            Endpoint::Streaming(id) => return anime_child(*id, "streaming"),
            Endpoint::Characters(id) => return anime_child(*id, "characters"),
        };
        segments.iter().map(|s| s.to_string()).collect()
    }

    /// Query parameters, unencoded
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::AnimeByGenre { genre_id, page } => {
                vec![("genres", genre_id.to_string()), ("page", page.to_string())]
            }
            Endpoint::Search { query, page } => {
                vec![("q", query.clone()), ("page", page.to_string())]
            }
            Endpoint::TopAnime { page } => vec![("page", page.to_string())],
            Endpoint::Featured { limit } => vec![("limit", limit.to_string())],
            _ => Vec::new(),
        }
    }

    /// Key the response is cached under
    pub fn cache_key(&self) -> String {
        match self {
            Endpoint::Genres => "genres".to_string(),
            Endpoint::AnimeByGenre { genre_id, page } => {
                format!("genre_{}_page_{}", genre_id, page)
            }
            Endpoint::Search { query, page } => format!("search_{}_page_{}", query, page),
            Endpoint::TopAnime { page } => format!("top_animes_page_{}", page),
            Endpoint::Featured { .. } => "featured_animes".to_string(),
            Endpoint::SeasonNow => "season_top_animes".to_string(),
            Endpoint::SeasonUpcoming => "upcoming_animes".to_string(),
            Endpoint::Anime(id) => format!("anime_{}", id),
            Endpoint::Episodes(id) => format!("anime_{}_episodes", id),
            Endpoint::Streaming(id) => format!("anime_{}_streaming", id),
            Endpoint::Characters(id) => format!("anime_{}_characters", id),
        }
    }
}

fn anime_child(id: u32, child: &str) -> Vec<String> {
    vec!["anime".to_string(), id.to_string(), child.to_string()]
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments().join("/"))?;
        for (i, (name, value)) in self.query().iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, name, value)?;
        }
        Ok(())
    }
}
