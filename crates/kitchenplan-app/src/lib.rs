//! KitchenPlan Application
//!
//! The editor shell: the window and event loop, UI actions and dialogs,
//! the editor that owns the layout, and the headless session mode.

mod config;
mod editor;
mod session;
mod ui;

#[cfg(feature = "native")]
mod app;
#[cfg(feature = "native")]
mod file_ops;

#[cfg(feature = "native")]
pub use app::{step_frame, App, CanvasFrame};
pub use config::{AppConfig, ASSET_ROOT_ENV};
pub use editor::Editor;
pub use session::{prepare_editor, run_session, SessionArgs, SessionError, SessionSummary};
pub use ui::{render_ui, UiAction, UiState};
