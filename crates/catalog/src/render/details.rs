//! Fragments for the details page.

use super::{attr, empty_message, or_na, text, RenderOptions};
use jikan_client::api::{Anime, CharacterRole, Episode, StreamingLink};

/// Poster, title, key facts and synopsis
pub fn anime_details(anime: &Anime, opts: &RenderOptions) -> String {
    let synopsis = anime
        .synopsis
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("No synopsis available.");

    format!(
        concat!(
            r#"<img src="{src}" alt="{alt}" class="anime-poster">"#,
            "<h2>{title}</h2>",
            r#"<div class="anime-info">"#,
            r#"<div class="info-item"><span>Score:</span> {score}</div>"#,
            r#"<div class="info-item"><span>Episodes:</span> {episodes}</div>"#,
            r#"<div class="info-item"><span>Status:</span> {status}</div>"#,
            "</div>",
            r#"<div class="synopsis"><strong>Synopsis:</strong> {synopsis}</div>"#
        ),
        src = attr(opts.image_or_placeholder(anime.image_url())),
        alt = attr(&anime.title),
        title = text(&anime.title),
        score = or_na(anime.score),
        episodes = or_na(anime.episodes),
        status = text(&or_na(anime.status.as_deref())),
        synopsis = text(synopsis),
    )
}

/// Embedded YouTube trailer, or a notice when there is none
pub fn trailer(anime: &Anime) -> String {
    match anime.trailer_youtube_id() {
        Some(id) => format!(
            concat!(
                r#"<iframe width="100%" height="315" "#,
                r#"src="https://www.youtube.com/embed/{id}" "#,
                r#"frameborder="0" allow="autoplay; encrypted-media" allowfullscreen></iframe>"#
            ),
            id = attr(id),
        ),
        None => r#"<p id="noTrailerMessage">No trailer available.</p>"#.to_string(),
    }
}

pub fn episode_list(episodes: &[Episode]) -> String {
    if episodes.is_empty() {
        return empty_message("No episodes found.");
    }

    let items: String = episodes
        .iter()
        .map(|episode| {
            format!(
                "<li><strong>Episode {}:</strong> {}</li>",
                episode.mal_id,
                text(episode.title.as_deref().unwrap_or("Untitled"))
            )
        })
        .collect();

    format!("<h3>Episodes</h3><ul>{}</ul>", items)
}

pub fn streaming_links(links: &[StreamingLink]) -> String {
    if links.is_empty() {
        return empty_message("No streaming links found.");
    }

    let items: String = links
        .iter()
        .map(|link| {
            format!(
                r#"<li><a href="{}" target="_blank" rel="noopener">{}</a></li>"#,
                attr(&link.url),
                text(&link.name)
            )
        })
        .collect();

    format!("<h3>Streaming</h3><ul>{}</ul>", items)
}

/// Main characters; nothing at all when the list is empty
pub fn character_grid(characters: &[CharacterRole], opts: &RenderOptions) -> String {
    if characters.is_empty() {
        return String::new();
    }

    let items: String = characters
        .iter()
        .take(opts.characters_shown)
        .map(|role| {
            format!(
                r#"<div class="character"><img src="{}" alt="{}"><p>{}</p></div>"#,
                attr(opts.image_or_placeholder(role.character.image_url())),
                attr(&role.character.name),
                text(&role.character.name)
            )
        })
        .collect();

    format!(
        r#"<h3>Main Characters</h3><div class="character-list">{}</div>"#,
        items
    )
}
