pub mod app;
pub mod map_pane;
pub mod viewer_pane;

pub use app::{App, AppProps};
