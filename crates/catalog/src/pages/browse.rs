//! Catalog browser: genre filter, search and paginated results.
//!
//! Browsing by genre and searching are mutually exclusive; switching to
//! either one starts over at page 1.

use super::{settle, Loadable, PageContext};
use crate::pagination::PaginationState;
use crate::render::{self, PageView};
use jikan_client::api::{Anime, DataResponse, Genre, PaginatedResponse};
use jikan_client::Endpoint;
use tracing::info;

pub const CATEGORY_LIST: &str = "categoryList";
pub const ANIME_LIST: &str = "animeList";
pub const PAGINATION: &str = "pagination";

const NO_CATEGORIES: &str = "No categories available.";
const CATEGORIES_FAILED: &str = "Failed to load categories.";
const RESULTS_FAILED: &str = "Failed to load anime.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BrowseMode {
    /// Nothing selected yet
    #[default]
    Idle,
    Genre(u32),
    Search(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    SelectGenre(u32),
    Search(String),
    NextPage,
    PrevPage,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    pub mode: BrowseMode,
    pub pagination: PaginationState,
    pub genres: Loadable<Vec<Genre>>,
    pub results: Loadable<Vec<Anime>>,
    pub loading: bool,
}

impl BrowseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a user action; returns the request it calls for, if any
    pub fn apply(&mut self, action: BrowseAction) -> Option<Endpoint> {
        match action {
            BrowseAction::SelectGenre(genre_id) => {
                self.mode = BrowseMode::Genre(genre_id);
                self.pagination.reset();
            }
            BrowseAction::Search(query) => {
                let query = query.trim();
                if query.is_empty() {
                    return None;
                }
                self.mode = BrowseMode::Search(query.to_string());
                self.pagination.reset();
            }
            BrowseAction::NextPage => {
                self.pagination.next()?;
            }
            BrowseAction::PrevPage => {
                self.pagination.prev()?;
            }
        }
        self.current_request()
    }

    /// Request for the current mode and page
    pub fn current_request(&self) -> Option<Endpoint> {
        let page = self.pagination.current_page();
        match &self.mode {
            BrowseMode::Idle => None,
            BrowseMode::Genre(genre_id) => Some(Endpoint::AnimeByGenre {
                genre_id: *genre_id,
                page,
            }),
            BrowseMode::Search(query) => Some(Endpoint::Search {
                query: query.clone(),
                page,
            }),
        }
    }

    /// Keep the genres worth showing; an empty remainder is an error
    pub fn receive_genres(&mut self, genres: Vec<Genre>, excluded: &[u32]) {
        let filtered: Vec<Genre> = genres
            .into_iter()
            .filter(|genre| genre.mal_id != 0 && !excluded.contains(&genre.mal_id))
            .collect();

        self.genres = if filtered.is_empty() {
            Loadable::Failed(NO_CATEGORIES.to_string())
        } else {
            Loadable::Ready(filtered)
        };
    }

    pub fn receive_results(&mut self, response: PaginatedResponse<Anime>) {
        self.pagination.update(&response.pagination);
        self.results = Loadable::Ready(response.data);
    }

    fn selected_genre(&self) -> Option<u32> {
        match self.mode {
            BrowseMode::Genre(genre_id) => Some(genre_id),
            _ => None,
        }
    }
}

pub struct BrowsePage<'a> {
    ctx: &'a PageContext,
}

impl<'a> BrowsePage<'a> {
    pub fn new(ctx: &'a PageContext) -> Self {
        Self { ctx }
    }

    /// Fetch the genre list for the filter buttons
    pub async fn load_categories(&self, state: &mut BrowseState) {
        state.loading = true;
        state.genres = Loadable::Pending;
        let result = self
            .ctx
            .fetcher
            .fetch::<DataResponse<Genre>>(&Endpoint::Genres)
            .await;

        match settle(CATEGORY_LIST, result) {
            Loadable::Ready(response) => {
                state.receive_genres(response.data, &self.ctx.config.excluded_genres);
                if let Some(genres) = state.genres.ready() {
                    info!(count = genres.len(), "Categories loaded");
                }
            }
            Loadable::Failed(_) => state.genres = Loadable::Failed(CATEGORIES_FAILED.to_string()),
            Loadable::Pending => {}
        }
        state.loading = false;
    }

    /// Apply an action and load whatever it asks for
    pub async fn dispatch(&self, state: &mut BrowseState, action: BrowseAction) {
        if let Some(endpoint) = state.apply(action) {
            self.load_results(state, &endpoint).await;
        }
    }

    /// Load the current mode and page again, e.g. after `go_to`
    pub async fn reload(&self, state: &mut BrowseState) {
        if let Some(endpoint) = state.current_request() {
            self.load_results(state, &endpoint).await;
        }
    }

    async fn load_results(&self, state: &mut BrowseState, endpoint: &Endpoint) {
        state.loading = true;
        state.results = Loadable::Pending;
        info!(endpoint = %endpoint, "Loading results");

        let result = self
            .ctx
            .fetcher
            .fetch::<PaginatedResponse<Anime>>(endpoint)
            .await;

        match settle(ANIME_LIST, result) {
            Loadable::Ready(response) => state.receive_results(response),
            _ => state.results = Loadable::Failed(RESULTS_FAILED.to_string()),
        }
        state.loading = false;
    }

    pub fn view(&self, state: &BrowseState) -> PageView {
        let mut view = PageView::new("Categories");
        view.loading = state.loading;

        match &state.genres {
            Loadable::Ready(genres) => view.set_section(
                CATEGORY_LIST,
                render::category_buttons(genres, state.selected_genre()),
            ),
            Loadable::Failed(message) => {
                view.set_section(CATEGORY_LIST, "");
                view.show_error(message.clone());
            }
            Loadable::Pending => view.set_section(CATEGORY_LIST, ""),
        }

        match &state.results {
            Loadable::Ready(animes) => {
                view.set_section(ANIME_LIST, render::anime_cards(animes, &self.ctx.render))
            }
            Loadable::Failed(message) => {
                view.set_section(ANIME_LIST, "");
                view.show_error(message.clone());
            }
            Loadable::Pending => view.set_section(ANIME_LIST, ""),
        }

        view.set_section(PAGINATION, render::pagination_controls(&state.pagination));
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::context_for;
    use mockito::Matcher;

    const GENRES: &str = r#"{"data":[
        {"mal_id":1,"name":"Action","count":5000},
        {"mal_id":12,"name":"Hentai","count":1500},
        {"mal_id":4,"name":"Comedy","count":7000},
        {"mal_id":0,"name":"Broken","count":1}
    ]}"#;

    fn genre_page(has_next: bool) -> String {
        format!(
            r#"{{"data":[{{"mal_id":1,"title":"Cowboy Bebop"}}],"pagination":{{"has_next_page":{}}}}}"#,
            has_next
        )
    }

    #[test]
    fn test_select_genre_resets_page_and_clears_search() {
        let mut state = BrowseState::new();
        state.mode = BrowseMode::Search("naruto".to_string());
        state.pagination.go_to(4);

        let request = state.apply(BrowseAction::SelectGenre(1));
        assert_eq!(request, Some(Endpoint::AnimeByGenre { genre_id: 1, page: 1 }));
        assert_eq!(state.mode, BrowseMode::Genre(1));
        assert_eq!(state.pagination.current_page(), 1);
    }

    #[test]
    fn test_search_resets_page_and_clears_genre() {
        let mut state = BrowseState::new();
        state.mode = BrowseMode::Genre(1);
        state.pagination.go_to(3);

        let request = state.apply(BrowseAction::Search("  frieren ".to_string()));
        assert_eq!(
            request,
            Some(Endpoint::Search { query: "frieren".to_string(), page: 1 })
        );
        assert_eq!(state.selected_genre(), None);
        assert_eq!(state.pagination.current_page(), 1);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let mut state = BrowseState::new();
        state.mode = BrowseMode::Genre(1);
        assert_eq!(state.apply(BrowseAction::Search("   ".to_string())), None);
        assert_eq!(state.mode, BrowseMode::Genre(1));
    }

    #[test]
    fn test_paging_respects_disabled_controls() {
        let mut state = BrowseState::new();
        state.apply(BrowseAction::SelectGenre(1));

        assert_eq!(state.apply(BrowseAction::PrevPage), None);
        assert_eq!(state.apply(BrowseAction::NextPage), None);

        state.receive_results(PaginatedResponse {
            data: Vec::new(),
            pagination: jikan_client::api::Pagination {
                has_next_page: true,
                ..Default::default()
            },
        });
        assert_eq!(
            state.apply(BrowseAction::NextPage),
            Some(Endpoint::AnimeByGenre { genre_id: 1, page: 2 })
        );
        assert_eq!(
            state.apply(BrowseAction::PrevPage),
            Some(Endpoint::AnimeByGenre { genre_id: 1, page: 1 })
        );
    }

    #[test]
    fn test_receive_genres_filters_excluded() {
        let mut state = BrowseState::new();
        let genres: DataResponse<Genre> = serde_json::from_str(GENRES).unwrap();
        state.receive_genres(genres.data, &[12]);

        let names: Vec<&str> = state
            .genres
            .ready()
            .unwrap()
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, vec!["Action", "Comedy"]);
    }

    #[test]
    fn test_receive_genres_all_excluded_is_error() {
        let mut state = BrowseState::new();
        state.receive_genres(
            vec![Genre { mal_id: 12, name: "Hentai".to_string(), count: 1 }],
            &[12],
        );
        assert_eq!(state.genres.error(), Some(NO_CATEGORIES));
    }

    #[tokio::test]
    async fn test_load_categories_and_browse_genre() {
        let mut server = mockito::Server::new_async().await;
        let _genres = server
            .mock("GET", "/genres/anime")
            .with_status(200)
            .with_body(GENRES)
            .create_async()
            .await;
        let page_one = server
            .mock("GET", "/anime")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("genres".into(), "1".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(genre_page(true))
            .expect(1)
            .create_async()
            .await;
        let page_two = server
            .mock("GET", "/anime")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("genres".into(), "1".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(genre_page(false))
            .expect(1)
            .create_async()
            .await;

        let ctx = context_for(&server);
        let page = BrowsePage::new(&ctx);
        let mut state = BrowseState::new();

        page.load_categories(&mut state).await;
        page.dispatch(&mut state, BrowseAction::SelectGenre(1)).await;
        assert!(!state.pagination.next_disabled());

        page.dispatch(&mut state, BrowseAction::NextPage).await;
        assert_eq!(state.pagination.current_page(), 2);
        assert!(state.pagination.next_disabled());

        let view = page.view(&state);
        let categories = view.section(CATEGORY_LIST).unwrap();
        assert!(categories.contains("Action"));
        assert!(!categories.contains("Hentai"));
        assert!(categories.contains(r#"class="category-button active" data-id="1""#));
        assert!(view.section(ANIME_LIST).unwrap().contains("Cowboy Bebop"));
        assert!(view.section(PAGINATION).unwrap().contains(r#"<span id="currentPage">2</span>"#));
        assert_eq!(view.error, None);
        assert!(!view.loading);

        page_one.assert_async().await;
        page_two.assert_async().await;
    }

    #[tokio::test]
    async fn test_failures_become_page_errors() {
        let mut server = mockito::Server::new_async().await;
        let _genres = server
            .mock("GET", "/genres/anime")
            .with_status(500)
            .create_async()
            .await;
        let _search = server
            .mock("GET", "/anime")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let ctx = context_for(&server);
        let page = BrowsePage::new(&ctx);
        let mut state = BrowseState::new();

        page.load_categories(&mut state).await;
        assert_eq!(state.genres.error(), Some(CATEGORIES_FAILED));

        page.dispatch(&mut state, BrowseAction::Search("bebop".to_string())).await;
        assert_eq!(state.results.error(), Some(RESULTS_FAILED));

        let view = page.view(&state);
        assert_eq!(view.error.as_deref(), Some(RESULTS_FAILED));
    }

    #[tokio::test]
    async fn test_category_request_sets_loading_while_in_flight() {
        let mut server = mockito::Server::new_async().await;
        let _genres = server
            .mock("GET", "/genres/anime")
            .with_status(200)
            .with_body(GENRES)
            .create_async()
            .await;

        let ctx = context_for(&server);
        let page = BrowsePage::new(&ctx);
        let mut state = BrowseState::new();

        // Poll the request once, then abandon it before the response arrives
        tokio::select! {
            biased;
            _ = page.load_categories(&mut state) => panic!("category request finished without yielding"),
            _ = std::future::ready(()) => {}
        }
        assert!(state.loading);
        assert!(state.genres.is_pending());
        assert!(page.view(&state).loading);

        page.load_categories(&mut state).await;
        assert!(!state.loading);
        assert!(state.genres.ready().is_some());
        assert!(!page.view(&state).loading);
    }

    #[tokio::test]
    async fn test_null_data_renders_empty_states() {
        let mut server = mockito::Server::new_async().await;
        let _genres = server
            .mock("GET", "/genres/anime")
            .with_status(200)
            .with_body(r#"{"data":null}"#)
            .create_async()
            .await;
        let _search = server
            .mock("GET", "/anime")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":null,"pagination":null}"#)
            .create_async()
            .await;

        let ctx = context_for(&server);
        let page = BrowsePage::new(&ctx);
        let mut state = BrowseState::new();

        page.load_categories(&mut state).await;
        assert_eq!(state.genres.error(), Some(NO_CATEGORIES));

        page.dispatch(&mut state, BrowseAction::Search("nothing".to_string())).await;
        assert_eq!(state.results.ready().map(Vec::len), Some(0));
        assert!(state.pagination.next_disabled());

        let view = page.view(&state);
        assert!(view.section(ANIME_LIST).unwrap().contains("No anime found."));
    }

}
