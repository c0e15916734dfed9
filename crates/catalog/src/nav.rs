//! Links between pages.
//!
//! Cards navigate to the details page with the anime id in the `id` query
//! parameter; the browser page takes `genre`, `q` and `page`.

use url::form_urlencoded;

/// Link to the details page of one anime
pub fn details_href(details_path: &str, mal_id: u32) -> String {
    format!("{}?id={}", details_path, mal_id)
}

/// Link selecting a genre in the catalog browser
pub fn genre_href(genre_id: u32) -> String {
    format!("?genre={}", genre_id)
}

/// Read the anime id from a query string such as `?id=21`
pub fn anime_id_from_query(query: &str) -> Option<u32> {
    query_param(query, "id").and_then(|id| id.trim().parse().ok())
}

/// First value of `name` in a query string; a leading `?` is optional
pub fn query_param(query: &str, name: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
