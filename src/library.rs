//! Track catalog: directory scanning, the ordered track list with its cursor,
//! and the `playlist.json` order that survives restarts.

mod catalog;
mod display;
mod error;
mod model;
mod persist;
mod scan;

pub use catalog::Catalog;
pub use display::display_from_fields;
pub use error::LibraryError;
pub use model::Track;
pub use persist::{PlaylistStore, apply_saved_order};
pub use scan::scan;
