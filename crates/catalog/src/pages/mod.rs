//! Page controllers.
//!
//! Each page keeps its UI state in a plain struct. Actions go through a pure
//! `apply` that updates the state and returns the request to issue; the
//! controller runs the request, feeds the outcome back into the state, and
//! `view` turns the state into a `PageView`.

pub mod browse;
pub mod details;
pub mod home;
pub mod upcoming;

pub use browse::{BrowseAction, BrowseMode, BrowsePage, BrowseState};
pub use details::{DetailsPage, DetailsState};
pub use home::{HomeAction, HomePage, HomeState};
pub use upcoming::{UpcomingPage, UpcomingState};

use crate::render::RenderOptions;
use jikan_client::{CachedFetcher, FetchError};
use shared::config::CatalogConfig;
use tracing::warn;

/// What every controller needs: data access and rendering settings
#[derive(Clone)]
pub struct PageContext {
    pub fetcher: CachedFetcher,
    pub config: CatalogConfig,
    pub render: RenderOptions,
}

impl PageContext {
    pub fn new(fetcher: CachedFetcher, config: CatalogConfig) -> Self {
        let render = RenderOptions::from_config(&config);
        Self {
            fetcher,
            config,
            render,
        }
    }
}

/// Data behind one page section
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Loadable<T> {
    #[default]
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Loadable::Pending)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Loadable::Pending => Loadable::Pending,
            Loadable::Ready(value) => Loadable::Ready(f(value)),
            Loadable::Failed(message) => Loadable::Failed(message),
        }
    }
}

/// Turn a request outcome into section data, logging failures
pub(crate) fn settle<T>(section: &str, result: Result<T, FetchError>) -> Loadable<T> {
    match result {
        Ok(value) => Loadable::Ready(value),
        Err(e) => {
            warn!(section = section, error = %e, "Section failed to load");
            Loadable::Failed(e.to_string())
        }
    }
}

/// Section markup for loaded data, a section error, or nothing while pending
pub(crate) fn section_html<T>(data: &Loadable<T>, render: impl FnOnce(&T) -> String) -> String {
    match data {
        Loadable::Ready(value) => render(value),
        Loadable::Failed(message) => crate::render::section_error(message),
        Loadable::Pending => String::new(),
    }
}
