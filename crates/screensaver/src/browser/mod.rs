//! Browser runtime: binds a [`Session`](crate::Session) to the page.
//!
//! Everything here needs `web_sys` and only builds for `wasm32`.

pub mod app;
pub mod storage;

pub use app::ScreensaverApp;
pub use storage::LocalStorage;
