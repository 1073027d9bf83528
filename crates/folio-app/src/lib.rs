//! Folio App Library
//!
//! Application shell for the Folio page builder: user actions, sessions,
//! configuration and the toolbar model.

pub mod config;
pub mod error;
pub mod session;
pub mod ui;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use session::{ActionOutcome, Session};
pub use ui::{toolbar, ToolbarItem, UiAction};
