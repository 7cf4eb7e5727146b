//! KitchenPlan Render Library
//!
//! Renderer abstraction and implementations for KitchenPlan.
//! The default implementation uses Vello to draw the layout as a floor plan.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{
    GRID_STEP, GridStyle, RenderContext, RenderResult, Renderer, RendererError, polygon_path,
};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::PlanRenderer;
