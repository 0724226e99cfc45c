//! Chart generation and packaging for the Olares app builder.
//!
//! # Pipeline
//!
//! ```text
//! Configuration
//!   1. Defaulting ── appid from name, maintainer fallback (on a copy)
//!   2. Render     ── every registry template via MiniJinja → FileSet
//!   3. Package    ── FileSet → tar under <name>/ → gzip (mtime 0)
//! ```
//!
//! # Templates
//!
//! The [`TemplateStore`] holds one resource per output path, stored as
//! `<path>.j2`. The embedded set is compiled into the binary; a directory
//! with the same layout may replace it. Templates see the configuration
//! with its JSON (camelCase) field names, plus two helpers:
//! - `eq(a, b)` for comparisons in `if` blocks
//! - `helm(expr)` to emit a Helm expression such as `{{ .Release.Namespace }}`
//!
//! # Archive layout
//!
//! All ten files are always rendered; `templates/pvc.yaml` is only packaged
//! (and exported) when `storage.pvc.enabled` is set.

pub mod export;
pub mod generate;
pub mod package;
pub mod render;
pub mod store;

pub use export::{ExportError, write_chart};
pub use generate::{BuildError, ChartBuilder, FileSet, GenerateError, GeneratedChart};
pub use package::{PackageError, archive_file_name, entry_paths, package};
pub use render::{TemplateError, render};
pub use store::{ChartTemplate, REGISTRY, StoreError, TemplateStore};
