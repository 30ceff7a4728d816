//! # scidown
//!
//! Render Markdown to HTML, an HTML table of contents, or LaTeX, with
//! extension toggles resolved from an ordered list of options.
//!
//! ## Why this crate?
//!
//! The Markdown grammar is delegated to a document engine (by default
//! [`comrak`]). What this crate owns is everything around it: a registry of
//! named extension and output flags, a resolver that folds command-line
//! style tokens over a baseline so that the last occurrence wins, a factory
//! for the renderer variants, and an executor that manages the buffers of
//! one run and optionally times the render call.
//!
//! ## Pipeline Overview
//!
//! ```text
//! tokens ─▶ options::resolve ─▶ ConversionConfig
//!                                    │
//! Markdown bytes ─▶ pipeline::execute ┤
//!                    ├─ factory    renderer + HTML template
//!                    ├─ buffers    input / output, unit-sized
//!                    ├─ render     timed
//!                    └─ copy-out   RenderOutput { bytes, timing }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use scidown::{convert, resolve_default};
//!
//! let config = resolve_default(["--no-style", "--all-span", "--no-autolink"])?;
//! let output = convert(b"# Hello", &config)?;
//! assert!(String::from_utf8_lossy(&output.bytes).contains("<h1>Hello</h1>"));
//! # Ok::<(), scidown::ScidownError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `scidown` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! scidown = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod flags;
pub mod options;
pub mod pipeline;
pub mod template;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, RendererKind};
pub use convert::{convert, convert_path, convert_to_file, Converter};
pub use engine::{ComrakEngine, Document, Engine, Localization, RenderRequest, Renderer};
pub use error::ScidownError;
pub use flags::{Extensions, OutputFlags};
pub use options::{resolve, resolve_default};
pub use pipeline::execute::{execute, RenderOutput, RenderTiming};
pub use template::HtmlTemplate;
