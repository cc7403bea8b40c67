pub mod config;
pub mod domain;
pub mod layout;
pub mod repository;
pub mod services;
pub mod ui_dioxus;

// Make test_helpers available for integration tests
pub mod test_helpers;
