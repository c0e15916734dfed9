//! Home page: featured slider, top list with search-as-you-type, and the
//! current season's top anime.

use super::{section_html, settle, Loadable, PageContext};
use crate::pagination::PaginationState;
use crate::render::{self, PageView};
use crate::slider::{AutoAdvance, SliderState};
use jikan_client::api::{Anime, PaginatedResponse, Pagination};
use jikan_client::Endpoint;
use std::time::Duration;
use tracing::info;

pub const SLIDER: &str = "sliderContainer";
pub const ANIME_LIST: &str = "animeList";
pub const PAGINATION: &str = "pagination";
pub const SEASON_TOP: &str = "seasonTopAnime";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeAction {
    /// Current content of the search box
    SearchInput(String),
    NextPage,
    PrevPage,
}

#[derive(Debug, Clone)]
pub struct HomeState {
    pub pagination: PaginationState,
    /// Active search; `None` while the top list is shown
    pub query: Option<String>,
    pub list: Loadable<Vec<Anime>>,
    pub featured: Loadable<Vec<Anime>>,
    pub season_top: Loadable<Vec<Anime>>,
    pub slider: SliderState,
    pub loading: bool,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            pagination: PaginationState::new(),
            query: None,
            list: Loadable::Pending,
            featured: Loadable::Pending,
            season_top: Loadable::Pending,
            slider: SliderState::new(0),
            loading: false,
        }
    }
}

impl HomeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a user action; returns the list request it calls for, if any.
    ///
    /// Input of at least `min_chars` characters (trimmed) searches from page 1.
    /// Shorter input while a search is active goes back to the top list.
    /// Paging only moves through the top list.
    pub fn apply(&mut self, action: HomeAction, min_chars: usize) -> Option<Endpoint> {
        match action {
            HomeAction::SearchInput(input) => {
                let query = input.trim();
                if query.chars().count() >= min_chars {
                    self.query = Some(query.to_string());
                    self.pagination.reset();
                    Some(Endpoint::Search {
                        query: query.to_string(),
                        page: 1,
                    })
                } else if self.query.take().is_some() {
                    self.pagination.reset();
                    Some(Endpoint::TopAnime { page: 1 })
                } else {
                    None
                }
            }
            HomeAction::NextPage => {
                if self.query.is_some() {
                    return None;
                }
                let page = self.pagination.next()?;
                Some(Endpoint::TopAnime { page })
            }
            HomeAction::PrevPage => {
                if self.query.is_some() {
                    return None;
                }
                let page = self.pagination.prev()?;
                Some(Endpoint::TopAnime { page })
            }
        }
    }

    /// Search results come back as a single page
    pub fn receive_list(&mut self, response: PaginatedResponse<Anime>) {
        if self.query.is_some() {
            self.pagination.update(&Pagination::default());
        } else {
            self.pagination.update(&response.pagination);
        }
        self.list = Loadable::Ready(response.data);
    }

    pub fn receive_featured(&mut self, animes: Vec<Anime>, visible: usize) {
        self.slider = SliderState::with_window(animes.len(), visible);
        self.featured = Loadable::Ready(animes);
    }

    pub fn receive_season_top(&mut self, mut animes: Vec<Anime>, count: usize) {
        animes.truncate(count);
        self.season_top = Loadable::Ready(animes);
    }
}

pub struct HomePage<'a> {
    ctx: &'a PageContext,
}

impl<'a> HomePage<'a> {
    pub fn new(ctx: &'a PageContext) -> Self {
        Self { ctx }
    }

    /// Load all three sections concurrently; each one settles on its own
    pub async fn load(&self, state: &mut HomeState) {
        state.loading = true;
        let fetcher = &self.ctx.fetcher;
        let featured_endpoint = Endpoint::Featured {
            limit: self.ctx.config.featured_limit,
        };
        let top_endpoint = Endpoint::TopAnime { page: 1 };

        let (featured, top, season) = tokio::join!(
            fetcher.fetch::<PaginatedResponse<Anime>>(&featured_endpoint),
            fetcher.fetch::<PaginatedResponse<Anime>>(&top_endpoint),
            fetcher.fetch::<PaginatedResponse<Anime>>(&Endpoint::SeasonNow),
        );

        match settle(SLIDER, featured) {
            Loadable::Ready(response) => state.receive_featured(
                response.data,
                self.ctx.config.slider.home_visible_slides,
            ),
            other => state.featured = other.map(|response| response.data),
        }

        state.query = None;
        state.pagination.reset();
        match settle(ANIME_LIST, top) {
            Loadable::Ready(response) => state.receive_list(response),
            other => state.list = other.map(|response| response.data),
        }

        match settle(SEASON_TOP, season) {
            Loadable::Ready(response) => {
                state.receive_season_top(response.data, self.ctx.config.season_top_count)
            }
            other => state.season_top = other.map(|response| response.data),
        }

        state.loading = false;
        info!(
            featured = state.featured.ready().map_or(0, Vec::len),
            season_top = state.season_top.ready().map_or(0, Vec::len),
            "Home page loaded"
        );
    }

    /// Apply an action and reload the list when it asks for it
    pub async fn dispatch(&self, state: &mut HomeState, action: HomeAction) {
        let Some(endpoint) = state.apply(action, self.ctx.config.search_min_chars) else {
            return;
        };

        state.loading = true;
        info!(endpoint = %endpoint, "Loading list");
        let result = self
            .ctx
            .fetcher
            .fetch::<PaginatedResponse<Anime>>(&endpoint)
            .await;

        match settle(ANIME_LIST, result) {
            Loadable::Ready(response) => state.receive_list(response),
            other => state.list = other.map(|response| response.data),
        }
        state.loading = false;
    }

    /// Timer driving the home carousel over the loaded slides
    pub fn auto_advance(&self, state: &HomeState) -> AutoAdvance {
        AutoAdvance::new(
            state.slider.clone(),
            Duration::from_millis(self.ctx.config.slider.home_interval_ms),
        )
    }

    pub fn view(&self, state: &HomeState) -> PageView {
        let opts = &self.ctx.render;
        let mut view = PageView::new("Anime Catalog");
        view.loading = state.loading;

        let slider = section_html(&state.featured, |animes| {
            format!(
                r#"<div class="slider" style="transform: translateX(-{:.2}%)">{}</div>"#,
                state.slider.translate_percent(),
                render::slider_slides(animes, opts)
            )
        });
        view.set_section(SLIDER, slider);
        view.set_section(
            ANIME_LIST,
            section_html(&state.list, |animes| render::anime_cards(animes, opts)),
        );
        view.set_section(PAGINATION, render::pagination_controls(&state.pagination));
        view.set_section(
            SEASON_TOP,
            section_html(&state.season_top, |animes| {
                render::season_top_cards(animes, opts)
            }),
        );
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::{context_for, offline_context};
    use mockito::Matcher;

    fn page_body(titles: &[&str], has_next: bool) -> String {
        let data: Vec<String> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| format!(r#"{{"mal_id":{},"title":"{}"}}"#, i + 1, title))
            .collect();
        format!(
            r#"{{"data":[{}],"pagination":{{"has_next_page":{}}}}}"#,
            data.join(","),
            has_next
        )
    }

    #[test]
    fn test_search_input_threshold() {
        let mut state = HomeState::new();

        assert_eq!(state.apply(HomeAction::SearchInput("na".to_string()), 3), None);
        assert_eq!(
            state.apply(HomeAction::SearchInput(" nar ".to_string()), 3),
            Some(Endpoint::Search { query: "nar".to_string(), page: 1 })
        );
        assert_eq!(state.query.as_deref(), Some("nar"));

        assert_eq!(
            state.apply(HomeAction::SearchInput("na".to_string()), 3),
            Some(Endpoint::TopAnime { page: 1 })
        );
        assert_eq!(state.query, None);
    }

    #[test]
    fn test_paging_top_list_only() {
        let mut state = HomeState::new();
        state.pagination.update(&Pagination {
            has_next_page: true,
            ..Default::default()
        });
        assert_eq!(
            state.apply(HomeAction::NextPage, 3),
            Some(Endpoint::TopAnime { page: 2 })
        );

        state.apply(HomeAction::SearchInput("bebop".to_string()), 3);
        assert_eq!(state.pagination.current_page(), 1);
        assert_eq!(state.apply(HomeAction::NextPage, 3), None);
        assert_eq!(state.apply(HomeAction::PrevPage, 3), None);
    }

    #[test]
    fn test_search_results_disable_paging() {
        let mut state = HomeState::new();
        state.apply(HomeAction::SearchInput("bebop".to_string()), 3);
        state.receive_list(PaginatedResponse {
            data: vec![Anime::default()],
            pagination: Pagination {
                has_next_page: true,
                ..Default::default()
            },
        });
        assert!(state.pagination.next_disabled());
        assert!(state.pagination.prev_disabled());
    }

    #[tokio::test]
    async fn test_load_sections_independently() {
        let mut server = mockito::Server::new_async().await;
        let _featured = server
            .mock("GET", "/top/anime")
            .match_query(Matcher::UrlEncoded("limit".into(), "12".into()))
            .with_status(200)
            .with_body(page_body(&["A", "B", "C", "D", "E", "F"], true))
            .create_async()
            .await;
        let _top = server
            .mock("GET", "/top/anime")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(page_body(&["Top One", "Top Two"], true))
            .create_async()
            .await;
        let season = server
            .mock("GET", "/seasons/now")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let ctx = context_for(&server);
        let page = HomePage::new(&ctx);
        let mut state = HomeState::new();
        page.load(&mut state).await;

        assert_eq!(state.slider.positions(), 3);
        assert!(!state.pagination.next_disabled());
        assert!(state.season_top.error().is_some());

        let view = page.view(&state);
        assert_eq!(view.section(SLIDER).unwrap().matches(r#"class="slide""#).count(), 6);
        assert!(view.section(SLIDER).unwrap().contains("translateX(-0.00%)"));
        assert!(view.section(ANIME_LIST).unwrap().contains("Top Two"));
        assert!(view.section(SEASON_TOP).unwrap().starts_with(r#"<p class="error">Error: "#));
        assert_eq!(view.error, None);
        assert!(!view.loading);

        season.assert_async().await;
    }

    #[tokio::test]
    async fn test_season_top_truncated() {
        let mut server = mockito::Server::new_async().await;
        let _top = server
            .mock("GET", "/top/anime")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(page_body(&["Top"], false))
            .create_async()
            .await;
        let _season = server
            .mock("GET", "/seasons/now")
            .with_status(200)
            .with_body(page_body(&["1", "2", "3", "4", "5", "6", "7", "8"], false))
            .create_async()
            .await;

        let ctx = context_for(&server);
        let page = HomePage::new(&ctx);
        let mut state = HomeState::new();
        page.load(&mut state).await;

        assert_eq!(state.season_top.ready().map(Vec::len), Some(6));
        let view = page.view(&state);
        assert!(view.section(SEASON_TOP).unwrap().contains("<h2>06</h2>"));
        assert!(!view.section(SEASON_TOP).unwrap().contains("<h2>07</h2>"));
    }

    #[tokio::test]
    async fn test_dispatch_search() {
        let mut server = mockito::Server::new_async().await;
        let search = server
            .mock("GET", "/anime")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "one piece".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(page_body(&["One Piece"], true))
            .expect(1)
            .create_async()
            .await;

        let ctx = context_for(&server);
        let page = HomePage::new(&ctx);
        let mut state = HomeState::new();

        page.dispatch(&mut state, HomeAction::SearchInput("on".to_string())).await;
        assert!(state.list.is_pending());

        page.dispatch(&mut state, HomeAction::SearchInput("one piece".to_string()))
            .await;
        let view = page.view(&state);
        assert!(view.section(ANIME_LIST).unwrap().contains("One Piece"));
        assert!(view.section(PAGINATION).unwrap().contains(r#"id="nextPage" data-page="2" disabled"#));

        search.assert_async().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_advance_uses_home_interval() {
        let ctx = offline_context();
        let page = HomePage::new(&ctx);
        let mut state = HomeState::new();
        state.receive_featured(vec![Anime::default(); 6], 4);

        let mut slider = page.auto_advance(&state);
        slider.start();
        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(slider.snapshot().current_index(), 1);
    }
}
