//! Details page for one anime.
//!
//! The four requests are independent: each retries on its own and a failure
//! only takes down its own section.

use super::{section_html, settle, Loadable, PageContext};
use crate::nav;
use crate::render::{self, PageView};
use jikan_client::api::{
    Anime, CharacterRole, DataResponse, Episode, ItemResponse, PaginatedResponse, StreamingLink,
};
use jikan_client::Endpoint;
use tracing::{info, warn};

pub const ANIME_DETAILS: &str = "animeDetails";
pub const TRAILER: &str = "trailerContainer";
pub const EPISODES: &str = "episodesList";
pub const STREAMING: &str = "externalLinks";
pub const CHARACTERS: &str = "characters";

const NO_ID: &str = "No anime ID specified in the URL.";
const NOT_FOUND: &str = "Anime data not found.";

#[derive(Debug, Clone, Default)]
pub struct DetailsState {
    pub anime_id: Option<u32>,
    pub anime: Loadable<Anime>,
    pub episodes: Loadable<Vec<Episode>>,
    pub streaming: Loadable<Vec<StreamingLink>>,
    pub characters: Loadable<Vec<CharacterRole>>,
    pub loading: bool,
}

impl DetailsState {
    pub fn new(anime_id: Option<u32>) -> Self {
        Self {
            anime_id,
            ..Default::default()
        }
    }

    /// State for a page opened with `query`, e.g. `?id=21`
    pub fn from_query(query: &str) -> Self {
        Self::new(nav::anime_id_from_query(query))
    }
}

pub struct DetailsPage<'a> {
    ctx: &'a PageContext,
}

impl<'a> DetailsPage<'a> {
    pub fn new(ctx: &'a PageContext) -> Self {
        Self { ctx }
    }

    pub async fn load(&self, state: &mut DetailsState) {
        let Some(id) = state.anime_id else {
            warn!("Details page opened without an anime id");
            return;
        };

        state.loading = true;
        info!(anime_id = id, "Loading anime details");
        let client = self.ctx.fetcher.client();

        let anime_endpoint = Endpoint::Anime(id);
        let episodes_endpoint = Endpoint::Episodes(id);
        let streaming_endpoint = Endpoint::Streaming(id);
        let characters_endpoint = Endpoint::Characters(id);
        let (anime, episodes, streaming, characters) = tokio::join!(
            client.get_with_retry::<ItemResponse<Anime>>(&anime_endpoint),
            client.get_with_retry::<PaginatedResponse<Episode>>(&episodes_endpoint),
            client.get_with_retry::<DataResponse<StreamingLink>>(&streaming_endpoint),
            client.get_with_retry::<DataResponse<CharacterRole>>(&characters_endpoint),
        );

        state.anime = match settle(ANIME_DETAILS, anime) {
            Loadable::Ready(ItemResponse { data: None }) => Loadable::Failed(NOT_FOUND.to_string()),
            other => other.map(|response| response.data.unwrap_or_default()),
        };
        state.episodes = settle(EPISODES, episodes).map(|response| response.data);
        state.streaming = settle(STREAMING, streaming).map(|response| response.data);
        state.characters = settle(CHARACTERS, characters).map(|response| response.data);
        state.loading = false;
    }

    pub fn view(&self, state: &DetailsState) -> PageView {
        let opts = &self.ctx.render;
        let title = state
            .anime
            .ready()
            .map(|anime| anime.title.clone())
            .unwrap_or_else(|| "Anime Details".to_string());
        let mut view = PageView::new(title);
        view.loading = state.loading;

        if state.anime_id.is_none() {
            view.show_error(NO_ID);
            return view;
        }

        let (details, trailer) = match &state.anime {
            Loadable::Ready(anime) => (render::anime_details(anime, opts), render::trailer(anime)),
            Loadable::Failed(message) => (render::section_error(message), String::new()),
            Loadable::Pending => (String::new(), String::new()),
        };
        view.set_section(ANIME_DETAILS, details);
        view.set_section(TRAILER, trailer);
        view.set_section(EPISODES, section_html(&state.episodes, |e| render::episode_list(e)));
        view.set_section(
            STREAMING,
            section_html(&state.streaming, |links| render::streaming_links(links)),
        );
        view.set_section(
            CHARACTERS,
            section_html(&state.characters, |roles| render::character_grid(roles, opts)),
        );
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::{context_for, offline_context};

    const ANIME: &str = r#"{"data":{
        "mal_id":1,
        "title":"Cowboy Bebop",
        "score":8.75,
        "episodes":26,
        "status":"Finished Airing",
        "trailer":{"youtube_id":"qig4KOK2R2g"}
    }}"#;
    const EPISODES_BODY: &str = r#"{"data":[{"mal_id":1,"title":"Asteroid Blues"}],"pagination":{"has_next_page":false}}"#;
    const CHARACTERS_BODY: &str = r#"{"data":[{"character":{"mal_id":1,"name":"Spike Spiegel"},"role":"Main"}]}"#;

    #[tokio::test]
    async fn test_missing_id_is_page_error() {
        let ctx = offline_context();
        let page = DetailsPage::new(&ctx);
        let mut state = DetailsState::from_query("?lang=en");

        page.load(&mut state).await;
        assert!(state.anime.is_pending());

        let view = page.view(&state);
        assert_eq!(view.error.as_deref(), Some(NO_ID));
        assert!(view.sections.is_empty());
    }

    #[tokio::test]
    async fn test_one_failure_degrades_one_section() {
        let mut server = mockito::Server::new_async().await;
        let _anime = server
            .mock("GET", "/anime/1")
            .with_status(200)
            .with_body(ANIME)
            .create_async()
            .await;
        let _episodes = server
            .mock("GET", "/anime/1/episodes")
            .with_status(200)
            .with_body(EPISODES_BODY)
            .create_async()
            .await;
        let streaming = server
            .mock("GET", "/anime/1/streaming")
            .with_status(500)
            .expect(3)
            .create_async()
            .await;
        let _characters = server
            .mock("GET", "/anime/1/characters")
            .with_status(200)
            .with_body(CHARACTERS_BODY)
            .create_async()
            .await;

        let ctx = context_for(&server);
        let page = DetailsPage::new(&ctx);
        let mut state = DetailsState::from_query("?id=1");
        page.load(&mut state).await;

        let view = page.view(&state);
        assert_eq!(view.title, "Cowboy Bebop");
        assert_eq!(view.error, None);
        assert!(view.section(ANIME_DETAILS).unwrap().contains("<span>Score:</span> 8.75"));
        assert!(view.section(TRAILER).unwrap().contains("youtube.com/embed/qig4KOK2R2g"));
        assert!(view.section(EPISODES).unwrap().contains("Asteroid Blues"));
        assert_eq!(
            view.section(STREAMING),
            Some(r#"<p class="error">Error: request failed after 3 attempts</p>"#)
        );
        assert!(view.section(CHARACTERS).unwrap().contains("Spike Spiegel"));

        streaming.assert_async().await;
    }

    #[tokio::test]
    async fn test_anime_without_data() {
        let mut server = mockito::Server::new_async().await;
        let _anime = server
            .mock("GET", "/anime/7")
            .with_status(200)
            .with_body(r#"{"data":null}"#)
            .create_async()
            .await;
        let mut _lists = Vec::new();
        for path in ["/anime/7/episodes", "/anime/7/streaming", "/anime/7/characters"] {
            let mock = server
                .mock("GET", path)
                .with_status(200)
                .with_body(r#"{"data":[]}"#)
                .create_async()
                .await;
            _lists.push(mock);
        }

        let ctx = context_for(&server);
        let page = DetailsPage::new(&ctx);
        let mut state = DetailsState::new(Some(7));
        page.load(&mut state).await;

        assert_eq!(state.anime.error(), Some(NOT_FOUND));
        let view = page.view(&state);
        assert!(view.section(ANIME_DETAILS).unwrap().contains(NOT_FOUND));
        assert_eq!(view.section(TRAILER), Some(""));
        assert!(view.section(EPISODES).unwrap().contains("No episodes found."));
        assert!(view.section(STREAMING).unwrap().contains("No streaming links found."));
        assert_eq!(view.section(CHARACTERS), Some(""));
    }
}
