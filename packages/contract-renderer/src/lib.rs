/*
 * Contract Renderer - single-file contract linker
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Arena ids, spans, tree-sitter helpers
 * - features/    : One slice per stage (discovery → namespacing → ordering → dead code
 *                  → assembly → folding → post-processing)
 * - pipeline/    : Orchestration (Renderer, LinkContext, RenderReport)
 * - config/      : RenderConfig value object, YAML loading, validation
 *
 * A render is single-threaded and owns all of its state; nothing is shared between renders.
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Stage entry points take the whole context
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (render stages)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{HashAlgorithm, RenderConfig, RenderConfigBuilder};
pub use errors::{ErrorCategory, ImportViolation, RenderError, Result, SourceLocation};
pub use pipeline::{ModuleReport, RenderOutput, RenderReport, Renderer};

/// Render `template` with `config`; shorthand for `Renderer::new(config).render(template)`
pub fn render(template: impl AsRef<std::path::Path>, config: RenderConfig) -> Result<RenderOutput> {
    Renderer::new(config).render(template.as_ref())
}
