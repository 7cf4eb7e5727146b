//! Command line of the `kitchenplan` binary and its headless mode.
//!
//! `kitchenplan [LAYOUT.json]` opens the editor window, with the layout
//! imported when given. `--headless` (implied by `--export OUT.json`)
//! imports the layout, builds and renders the plan once, logs a summary
//! and optionally exports instead.

use crate::config::AppConfig;
use crate::editor::Editor;
use kitchenplan_core::format::LayoutFileError;
use kitchenplan_core::items::ItemKind;
use kitchenplan_render::{PlanRenderer, RendererError};
use std::path::PathBuf;
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),
    #[error("Option {0} needs a value")]
    MissingValue(&'static str),
    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
    #[error(transparent)]
    Layout(#[from] LayoutFileError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionArgs {
    /// Layout to import.
    pub layout: Option<PathBuf>,
    /// Where to export the layout.
    pub export: Option<PathBuf>,
    /// Run without a window.
    pub headless: bool,
}

impl SessionArgs {
    /// Parse arguments, program name excluded.
    pub fn parse<I, S>(args: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            if arg == "--export" || arg == "-o" {
                let path = args.next().ok_or(SessionError::MissingValue("--export"))?;
                parsed.export = Some(PathBuf::from(path));
            } else if let Some(path) = arg.strip_prefix("--export=") {
                parsed.export = Some(PathBuf::from(path));
            } else if arg == "--headless" {
                parsed.headless = true;
            } else if arg.starts_with('-') {
                return Err(SessionError::UnknownOption(arg));
            } else if parsed.layout.is_none() {
                parsed.layout = Some(PathBuf::from(arg));
            } else {
                return Err(SessionError::UnexpectedArgument(arg));
            }
        }
        if parsed.export.is_some() {
            parsed.headless = true;
        }
        Ok(parsed)
    }
}

/// What a session did.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub items: usize,
    /// Item count per kind, in catalog order.
    pub per_kind: Vec<(ItemKind, usize)>,
    /// Items drawn with a placeholder because their model is unavailable.
    pub placeholders: usize,
    pub scene_nodes: usize,
    pub exported: Option<PathBuf>,
}

/// Create the editor, load the models and import the layout named on the
/// command line.
pub fn prepare_editor(args: &SessionArgs, config: AppConfig) -> Result<Editor, SessionError> {
    let mut editor = Editor::new(config);
    editor.load_assets();

    if let Some(path) = &args.layout {
        editor.import_file(path)?;
    }
    Ok(editor)
}

/// Run a headless session.
pub fn run_session(args: &SessionArgs, config: AppConfig) -> Result<SessionSummary, SessionError> {
    let editor = prepare_editor(args, config)?;

    for fixture in editor.store().fixtures() {
        log::debug!("{} at {:?}", fixture.kind().name(), fixture.position());
    }

    let scene = editor.scene();
    let mut renderer = PlanRenderer::new();
    renderer.render_frame(&editor.render_context(&scene))?;

    let items = editor.store().items();
    let per_kind = ItemKind::ALL
        .iter()
        .map(|&kind| (kind, items.iter().filter(|item| item.kind == kind).count()))
        .collect::<Vec<_>>();
    for (kind, count) in &per_kind {
        log::info!("{}: {}", kind.label(), count);
    }

    let exported = match &args.export {
        Some(path) => {
            editor.store().export_layout().write_to(path)?;
            log::info!("Exported layout to {:?}", path);
            Some(path.clone())
        }
        None => None,
    };

    let summary = SessionSummary {
        items: items.len(),
        per_kind,
        placeholders: scene.placeholder_count(),
        scene_nodes: scene.nodes.len(),
        exported,
    };
    log::info!(
        "Layout has {} items ({} placeholders) in a {} m x {} m room",
        summary.items,
        summary.placeholders,
        editor.store().boundary().width,
        editor.store().boundary().depth
    );
    Ok(summary)
}
