//! Anime catalog front end.
//!
//! Page controllers over the Jikan client, pure HTML renderers, pagination
//! and slider state, and the links between pages.

pub mod nav;
pub mod pages;
pub mod pagination;
pub mod render;
pub mod slider;

pub use pages::{
    BrowseAction, BrowsePage, BrowseState, DetailsPage, DetailsState, HomeAction, HomePage,
    HomeState, Loadable, PageContext, UpcomingPage, UpcomingState,
};
pub use pagination::PaginationState;
pub use render::{render_document, PageView, RenderOptions};
pub use slider::{AutoAdvance, SliderState};
