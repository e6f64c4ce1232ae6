//! Render pipeline
//!
//! `Renderer` drives the feature stages over one `LinkContext` and returns the rendered text
//! with a serialisable report.

pub mod context;
pub mod renderer;
pub mod result;

pub use context::LinkContext;
pub use renderer::Renderer;
pub use result::{ModuleReport, RenderOutput, RenderReport, StageTiming};
