//! Card and list fragments for the list pages.

use super::{attr, empty_message, or_na, text, RenderOptions};
use crate::nav;
use jikan_client::api::{Anime, Genre};

const NO_ANIME: &str = "No anime found.";

/// Result grid; each card links to the details page
pub fn anime_cards(animes: &[Anime], opts: &RenderOptions) -> String {
    if animes.is_empty() {
        return empty_message(NO_ANIME);
    }

    animes
        .iter()
        .map(|anime| {
            let score = anime
                .score
                .map(|score| format!(r#"<div class="anime-score">★ {}</div>"#, score))
                .unwrap_or_default();

            format!(
                concat!(
                    r#"<a class="anime-card" data-id="{id}" href="{href}">"#,
                    r#"<img src="{src}" alt="{alt}">"#,
                    "<h3>{title}</h3>{score}</a>"
                ),
                id = anime.mal_id,
                href = attr(&nav::details_href(&opts.details_path, anime.mal_id)),
                src = attr(opts.image_or_placeholder(anime.image_url())),
                alt = attr(&anime.title),
                title = text(&anime.title),
                score = score,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Slides for the featured carousel, using the large poster
pub fn slider_slides(animes: &[Anime], opts: &RenderOptions) -> String {
    if animes.is_empty() {
        return empty_message(NO_ANIME);
    }

    animes
        .iter()
        .map(|anime| {
            format!(
                r#"<a href="{href}"><img src="{src}" alt="{alt}" class="slide"></a>"#,
                href = attr(&nav::details_href(&opts.details_path, anime.mal_id)),
                src = attr(opts.image_or_placeholder(anime.large_image_url())),
                alt = attr(&anime.title),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ranked cards for the current season's top anime
pub fn season_top_cards(animes: &[Anime], opts: &RenderOptions) -> String {
    if animes.is_empty() {
        return empty_message(NO_ANIME);
    }

    animes
        .iter()
        .enumerate()
        .map(|(index, anime)| {
            let synopsis = match anime.synopsis.as_deref().filter(|s| !s.is_empty()) {
                Some(synopsis) => format!("{}...", excerpt(synopsis, opts.synopsis_excerpt_chars)),
                None => "Description not available".to_string(),
            };
            let href = attr(&nav::details_href(&opts.details_path, anime.mal_id));

            format!(
                concat!(
                    r#"<div class="season-card" data-id="{id}"><div class="box"><div class="content">"#,
                    "<h2>{rank:02}</h2>",
                    r#"<div class="score">★ {score}</div>"#,
                    r#"<img src="{src}" alt="{alt}">"#,
                    "<h3>{title}</h3>",
                    "<p>{synopsis}</p>",
                    r#"<a class="details-btn" href="{href}">View details</a>"#,
                    "</div></div></div>"
                ),
                id = anime.mal_id,
                rank = index + 1,
                score = or_na(anime.score),
                src = attr(opts.image_or_placeholder(anime.image_url())),
                alt = attr(&anime.title),
                title = text(&anime.title),
                synopsis = text(&synopsis),
                href = href,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cards for upcoming anime with their release date
pub fn upcoming_cards(animes: &[Anime], opts: &RenderOptions) -> String {
    if animes.is_empty() {
        return empty_message(NO_ANIME);
    }

    animes
        .iter()
        .map(|anime| {
            let release = anime
                .aired_from()
                .map(release_date)
                .unwrap_or("Unknown");

            format!(
                concat!(
                    r#"<a class="anime-card" data-id="{id}" href="{href}">"#,
                    r#"<img src="{src}" alt="{alt}">"#,
                    "<h3>{title}</h3>",
                    "<p>Release date: {release}</p></a>"
                ),
                id = anime.mal_id,
                href = attr(&nav::details_href(&opts.details_path, anime.mal_id)),
                src = attr(opts.image_or_placeholder(anime.image_url())),
                alt = attr(&anime.title),
                title = text(&anime.title),
                release = text(release),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Genre filter buttons, sorted by name
pub fn category_buttons(genres: &[Genre], selected: Option<u32>) -> String {
    if genres.is_empty() {
        return empty_message("No categories available.");
    }

    let mut sorted: Vec<&Genre> = genres.iter().collect();
    sorted.sort_by_key(|genre| genre.name.to_lowercase());

    sorted
        .into_iter()
        .map(|genre| {
            let class = if selected == Some(genre.mal_id) {
                "category-button active"
            } else {
                "category-button"
            };
            format!(
                r#"<a class="{class}" data-id="{id}" href="{href}">{name}</a>"#,
                class = class,
                id = genre.mal_id,
                href = attr(&nav::genre_href(genre.mal_id)),
                name = text(&genre.name),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// First `max_chars` characters of `s`
pub(crate) fn excerpt(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}

/// Date part of an ISO-8601 timestamp
fn release_date(aired_from: &str) -> &str {
    aired_from.split('T').next().unwrap_or(aired_from)
}
