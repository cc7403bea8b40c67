// Dioxus UI: the app shell and the radial mind map view
pub mod app;
pub mod components;
pub mod views;

pub use app::App;
