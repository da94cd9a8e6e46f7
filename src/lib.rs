// Library surface for the typing test. The terminal entry point in main.rs
// drives these modules; integration tests import them directly.
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod generator;
pub mod session;
pub mod ui;

pub use error::{SessionError, SettingsError};
pub use generator::{RandomWordSource, ScriptedWordSource, WordBank, WordSource};
pub use session::engine::SessionEngine;
pub use session::settings::{Mode, Settings, TestType};
