//! Upcoming season list.

use super::{settle, Loadable, PageContext};
use crate::render::{self, PageView};
use jikan_client::api::{Anime, PaginatedResponse};
use jikan_client::Endpoint;
use tracing::info;

pub const UPCOMING_LIST: &str = "upcomingAnimeList";

const LOAD_FAILED: &str = "Failed to load upcoming anime.";

#[derive(Debug, Clone, Default)]
pub struct UpcomingState {
    pub animes: Loadable<Vec<Anime>>,
    pub loading: bool,
}

pub struct UpcomingPage<'a> {
    ctx: &'a PageContext,
}

impl<'a> UpcomingPage<'a> {
    pub fn new(ctx: &'a PageContext) -> Self {
        Self { ctx }
    }

    /// Single request, no cache and no retry
    pub async fn load(&self, state: &mut UpcomingState) {
        state.loading = true;
        let result = self
            .ctx
            .fetcher
            .client()
            .get::<PaginatedResponse<Anime>>(&Endpoint::SeasonUpcoming)
            .await;

        state.animes = match settle(UPCOMING_LIST, result) {
            Loadable::Ready(response) => {
                info!(count = response.data.len(), "Upcoming anime loaded");
                Loadable::Ready(response.data)
            }
            _ => Loadable::Failed(LOAD_FAILED.to_string()),
        };
        state.loading = false;
    }

    pub fn view(&self, state: &UpcomingState) -> PageView {
        let mut view = PageView::new("Upcoming Anime");
        view.loading = state.loading;

        match &state.animes {
            Loadable::Ready(animes) => view.set_section(
                UPCOMING_LIST,
                render::upcoming_cards(animes, &self.ctx.render),
            ),
            Loadable::Failed(message) => {
                view.set_section(UPCOMING_LIST, "");
                view.show_error(message.clone());
            }
            Loadable::Pending => view.set_section(UPCOMING_LIST, ""),
        }
        view
    }
}
