//! The document library the pipeline delegates to.
//!
//! Everything that knows Markdown grammar or an output format sits behind
//! two traits:
//!
//! * [`Engine`]: constructs a renderer for each variant
//! * [`Renderer`]: turns Markdown bytes into output bytes inside a
//!   [`Buffer`]
//!
//! [`Document`] binds a renderer to the parsing extensions, the HTML
//! augmentation payload and the nesting limit for one run. Dropping a
//! renderer handle is its teardown.
//!
//! [`ComrakEngine`] is the implementation the crate ships; tests and
//! embedders can supply their own.
//!
//! ```text
//! Engine ──▶ Box<dyn Renderer> ──▶ Document<'r> ──render──▶ Buffer
//! ```

pub mod html;
pub mod latex;
pub mod markdown;
pub mod toc;

use crate::config::RendererKind;
use crate::error::ScidownError;
use crate::flags::{Extensions, OutputFlags};
use crate::pipeline::buffer::Buffer;
use crate::template::HtmlTemplate;
use std::fmt;

pub use markdown::ComrakEngine;

/// Caption labels for figures, listings and tables.
///
/// Injected into renderers rather than hardcoded so the same engine serves
/// any language.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Localization {
    pub figure: String,
    pub listing: String,
    pub table: String,
}

impl Default for Localization {
    fn default() -> Self {
        Self {
            figure: "Figure".into(),
            listing: "Listing".into(),
            table: "Table".into(),
        }
    }
}

/// Constructs renderers, one constructor per variant.
pub trait Engine {
    /// (X)HTML body renderer.
    fn html_renderer(
        &self,
        flags: OutputFlags,
        toc_level: u32,
        local: &Localization,
    ) -> Result<Box<dyn Renderer>, ScidownError>;

    /// Table-of-contents renderer.
    fn html_toc_renderer(
        &self,
        toc_level: u32,
        local: &Localization,
    ) -> Result<Box<dyn Renderer>, ScidownError>;

    /// LaTeX renderer.
    fn latex_renderer(
        &self,
        flags: OutputFlags,
        toc_level: u32,
        local: &Localization,
    ) -> Result<Box<dyn Renderer>, ScidownError>;
}

/// Everything a renderer needs for one render call.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub source: &'a [u8],
    pub extensions: Extensions,
    pub augmentation: Option<&'a HtmlTemplate>,
    pub max_nesting: usize,
}

/// An opaque renderer handle.
pub trait Renderer {
    fn kind(&self) -> RendererKind;

    /// Render `request.source`, appending the result to `output`.
    fn render(&self, request: &RenderRequest<'_>, output: &mut Buffer) -> Result<(), ScidownError>;
}

/// A renderer bound to the parsing settings of one run.
pub struct Document<'r> {
    renderer: &'r dyn Renderer,
    extensions: Extensions,
    augmentation: Option<HtmlTemplate>,
    max_nesting: usize,
}

impl<'r> Document<'r> {
    pub fn new(
        renderer: &'r dyn Renderer,
        extensions: Extensions,
        augmentation: Option<HtmlTemplate>,
        max_nesting: usize,
    ) -> Self {
        Self {
            renderer,
            extensions,
            augmentation,
            max_nesting,
        }
    }

    /// Render `input` into `output`.
    pub fn render(&self, output: &mut Buffer, input: &[u8]) -> Result<(), ScidownError> {
        let request = RenderRequest {
            source: input,
            extensions: self.extensions,
            augmentation: self.augmentation.as_ref(),
            max_nesting: self.max_nesting,
        };
        self.renderer.render(&request, output)
    }

    pub fn extensions(&self) -> Extensions {
        self.extensions
    }
}

impl fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("renderer", &self.renderer.kind())
            .field("extensions", &self.extensions)
            .field("augmentation", &self.augmentation.is_some())
            .field("max_nesting", &self.max_nesting)
            .finish()
    }
}

/// Turn an I/O error raised while writing into `output` back into the
/// matching library error.
pub(crate) fn emit_error(err: std::io::Error, output: &mut Buffer) -> ScidownError {
    output
        .take_alloc_failure()
        .unwrap_or_else(|| ScidownError::Render(err.to_string()))
}
