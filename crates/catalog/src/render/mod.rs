//! Pure renderers from API records to markup fragments.
//!
//! Nothing here touches the network or holds state; callers insert the
//! returned fragments into page sections. Every interpolated value is
//! HTML-escaped.

pub mod cards;
pub mod details;
pub mod layout;

pub use cards::{anime_cards, category_buttons, season_top_cards, slider_slides, upcoming_cards};
pub use details::{anime_details, character_grid, episode_list, streaming_links, trailer};
pub use layout::{render_document, PageView, Section};

use crate::pagination::PaginationState;
use html_escape::{encode_double_quoted_attribute, encode_text};
use shared::config::CatalogConfig;

/// Rendering settings shared by all fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub details_path: String,
    pub placeholder_image: String,
    pub synopsis_excerpt_chars: usize,
    pub characters_shown: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}

impl RenderOptions {
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            details_path: config.details_path.clone(),
            placeholder_image: config.placeholder_image.clone(),
            synopsis_excerpt_chars: config.synopsis_excerpt_chars,
            characters_shown: config.characters_shown,
        }
    }

    /// Image URL, or the placeholder when absent
    pub fn image_or_placeholder<'a>(&'a self, url: Option<&'a str>) -> &'a str {
        url.unwrap_or(self.placeholder_image.as_str())
    }
}

pub(crate) fn text(value: &str) -> String {
    encode_text(value).into_owned()
}

pub(crate) fn attr(value: &str) -> String {
    encode_double_quoted_attribute(value).into_owned()
}

/// Value or `N/A`
pub(crate) fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

/// "Nothing found" message for an empty list
pub fn empty_message(message: &str) -> String {
    format!(r#"<p class="empty">{}</p>"#, text(message))
}

/// Page-scoped error message
pub fn error_message(message: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, text(message))
}

/// Error confined to one section of a page
pub fn section_error(message: &str) -> String {
    format!(r#"<p class="error">Error: {}</p>"#, text(message))
}

/// Previous/next controls with the current page number
pub fn pagination_controls(state: &PaginationState) -> String {
    let disabled = |flag: bool| if flag { " disabled" } else { "" };
    format!(
        concat!(
            r#"<div class="pagination">"#,
            r#"<button id="prevPage" data-page="{prev}"{prev_disabled}>Previous</button>"#,
            r#"<span id="currentPage">{current}</span>"#,
            r#"<button id="nextPage" data-page="{next}"{next_disabled}>Next</button>"#,
            "</div>"
        ),
        prev = state.current_page().saturating_sub(1).max(1),
        prev_disabled = disabled(state.prev_disabled()),
        current = state.current_page(),
        next = state.current_page() + 1,
        next_disabled = disabled(state.next_disabled()),
    )
}
