//! Configuration types for a conversion run.
//!
//! A [`ConversionConfig`] is the fully resolved set of knobs for one run:
//! renderer variant, extension and output flag sets, limits and buffer
//! units. It is produced by folding option tokens over the baseline
//! ([`ConversionConfig::default`]) in [`crate::options::resolve`], then
//! handed unchanged to the renderer factory and the executor.
//!
//! The builder exists for library callers that want to skip token parsing
//! and set fields directly; `build()` applies the same validation the
//! resolver does.

use crate::error::ScidownError;
use crate::flags::{Extensions, OutputFlags};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default reading block size in bytes.
pub const DEFAULT_INPUT_UNIT: usize = 1024;
/// Default writing block size in bytes.
pub const DEFAULT_OUTPUT_UNIT: usize = 64;
/// Default maximum block nesting depth.
pub const DEFAULT_MAX_NESTING: usize = 16;

/// The resolved configuration for a single conversion.
///
/// # Example
/// ```rust
/// use scidown::{ConversionConfig, Extensions, RendererKind};
///
/// let config = ConversionConfig::builder()
///     .renderer(RendererKind::Latex)
///     .toc_level(3)
///     .disable_extensions(Extensions::MATH)
///     .build()
///     .unwrap();
/// assert!(!config.extensions.contains(Extensions::MATH));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Report the time spent in the render call. Default: false.
    pub show_time: bool,

    /// Input buffer block size in bytes. Must be positive. Default: 1024.
    pub input_unit: usize,

    /// Output buffer block size in bytes. Must be positive. Default: 64.
    pub output_unit: usize,

    /// Target format. Default: [`RendererKind::Html`].
    pub renderer: RendererKind,

    /// Deepest header level included in the table of contents; 0 disables it.
    pub toc_level: u32,

    /// Output-specific rendering flags.
    /// Default: mermaid, charter, gnuplot and style.
    pub output_flags: OutputFlags,

    /// Parsing extensions. Default: every block, span and other flag;
    /// negative flags off.
    pub extensions: Extensions,

    /// Maximum level of block nesting parsed. Must be positive. Default: 16.
    pub max_nesting: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            show_time: false,
            input_unit: DEFAULT_INPUT_UNIT,
            output_unit: DEFAULT_OUTPUT_UNIT,
            renderer: RendererKind::default(),
            toc_level: 0,
            output_flags: OutputFlags::MERMAID
                | OutputFlags::CHARTER
                | OutputFlags::GNUPLOT
                | OutputFlags::STYLE,
            extensions: Extensions::BLOCK | Extensions::SPAN | Extensions::FLAGS,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder starting from the defaults.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check the constraints every resolved configuration must satisfy.
    pub fn validate(&self) -> Result<(), ScidownError> {
        if self.input_unit == 0 {
            return Err(ScidownError::InvalidConfig(
                "input unit must be ≥ 1".into(),
            ));
        }
        if self.output_unit == 0 {
            return Err(ScidownError::InvalidConfig(
                "output unit must be ≥ 1".into(),
            ));
        }
        if self.max_nesting == 0 {
            return Err(ScidownError::InvalidConfig(
                "max nesting must be ≥ 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn show_time(mut self, v: bool) -> Self {
        self.config.show_time = v;
        self
    }

    pub fn input_unit(mut self, n: usize) -> Self {
        self.config.input_unit = n;
        self
    }

    pub fn output_unit(mut self, n: usize) -> Self {
        self.config.output_unit = n;
        self
    }

    pub fn renderer(mut self, kind: RendererKind) -> Self {
        self.config.renderer = kind;
        self
    }

    pub fn toc_level(mut self, level: u32) -> Self {
        self.config.toc_level = level;
        self
    }

    pub fn output_flags(mut self, flags: OutputFlags) -> Self {
        self.config.output_flags = flags;
        self
    }

    pub fn extensions(mut self, extensions: Extensions) -> Self {
        self.config.extensions = extensions;
        self
    }

    pub fn enable_extensions(mut self, extensions: Extensions) -> Self {
        self.config.extensions.insert(extensions);
        self
    }

    pub fn disable_extensions(mut self, extensions: Extensions) -> Self {
        self.config.extensions.remove(extensions);
        self
    }

    pub fn max_nesting(mut self, n: usize) -> Self {
        self.config.max_nesting = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ScidownError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// The output format a run renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RendererKind {
    /// (X)HTML body, spliced into the HTML template. (default)
    #[default]
    Html,
    /// Only the table of contents, as nested HTML lists.
    HtmlToc,
    /// LaTeX.
    Latex,
}

impl RendererKind {
    /// All variants, in the order the command line lists them.
    pub const ALL: [RendererKind; 3] = [RendererKind::Html, RendererKind::Latex, RendererKind::HtmlToc];

    /// The selector token for this variant.
    pub fn option_name(self) -> &'static str {
        match self {
            RendererKind::Html => "html",
            RendererKind::HtmlToc => "html-toc",
            RendererKind::Latex => "latex",
        }
    }

    /// One-line description used in help output.
    pub fn description(self) -> &'static str {
        match self {
            RendererKind::Html => "Render (X)HTML. The default.",
            RendererKind::HtmlToc => "Render the Table of Contents in (X)HTML.",
            RendererKind::Latex => "Render as LaTeX.",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

impl FromStr for RendererKind {
    type Err = ScidownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RendererKind::ALL
            .into_iter()
            .find(|kind| kind.option_name() == s)
            .ok_or_else(|| ScidownError::InvalidConfig(format!("unknown renderer '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_baseline() {
        let c = ConversionConfig::default();
        assert!(!c.show_time);
        assert_eq!(c.input_unit, 1024);
        assert_eq!(c.output_unit, 64);
        assert_eq!(c.renderer, RendererKind::Html);
        assert_eq!(c.toc_level, 0);
        assert_eq!(c.max_nesting, 16);
        assert!(c.extensions.contains(Extensions::BLOCK | Extensions::SPAN | Extensions::FLAGS));
        assert!(!c.extensions.intersects(Extensions::NEGATIVE));
        assert!(c.output_flags.contains(OutputFlags::MERMAID | OutputFlags::STYLE));
        assert!(!c.output_flags.contains(OutputFlags::ESCAPE));
    }

    #[test]
    fn builder_rejects_zero_units() {
        let err = ConversionConfig::builder().output_unit(0).build().unwrap_err();
        assert!(err.to_string().contains("output unit"));
        assert!(ConversionConfig::builder().input_unit(0).build().is_err());
        assert!(ConversionConfig::builder().max_nesting(0).build().is_err());
    }

    #[test]
    fn builder_toggles_extensions() {
        let c = ConversionConfig::builder()
            .extensions(Extensions::empty())
            .enable_extensions(Extensions::TABLES | Extensions::MATH)
            .disable_extensions(Extensions::MATH)
            .build()
            .unwrap();
        assert_eq!(c.extensions, Extensions::TABLES);
    }

    #[test]
    fn renderer_kind_round_trips_through_option_name() {
        for kind in RendererKind::ALL {
            assert_eq!(kind.option_name().parse::<RendererKind>().unwrap(), kind);
        }
        assert!("pdf".parse::<RendererKind>().is_err());
    }

    #[test]
    fn serializes_renderer_in_kebab_case() {
        let json = serde_json::to_string(&RendererKind::HtmlToc).unwrap();
        assert_eq!(json, "\"html-toc\"");
    }
}
