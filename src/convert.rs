//! Conversion entry points.
//!
//! [`Converter`] bundles the collaborators a run needs (engine, localization
//! and HTML template) so callers configure them once. The free functions use
//! the shipped [`ComrakEngine`] with default labels and template.

use crate::config::ConversionConfig;
use crate::engine::{ComrakEngine, Engine, Localization};
use crate::error::ScidownError;
use crate::pipeline::execute::{execute, RenderOutput};
use crate::pipeline::input::InputSource;
use crate::template::HtmlTemplate;
use std::path::Path;
use tracing::{info, warn};

/// A configured conversion front end.
///
/// # Example
/// ```rust
/// use scidown::{ConversionConfig, Converter, OutputFlags};
///
/// let config = ConversionConfig::builder()
///     .output_flags(OutputFlags::empty())
///     .build()
///     .unwrap();
/// let output = Converter::new().convert(b"# Hello", &config).unwrap();
/// assert!(String::from_utf8(output.bytes).unwrap().contains("<h1>Hello</h1>"));
/// ```
pub struct Converter<E = ComrakEngine> {
    engine: E,
    localization: Localization,
    template: HtmlTemplate,
}

impl Default for Converter<ComrakEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter<ComrakEngine> {
    pub fn new() -> Self {
        Self::with_engine(ComrakEngine)
    }
}

impl<E: Engine> Converter<E> {
    /// Use a different document engine.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            localization: Localization::default(),
            template: HtmlTemplate::default(),
        }
    }

    pub fn localization(mut self, localization: Localization) -> Self {
        self.localization = localization;
        self
    }

    pub fn template(mut self, template: HtmlTemplate) -> Self {
        self.template = template;
        self
    }

    /// Render in-memory Markdown.
    pub fn convert(&self, input: &[u8], config: &ConversionConfig) -> Result<RenderOutput, ScidownError> {
        info!(
            "Rendering {} bytes as {}",
            input.len(),
            config.renderer
        );
        execute(
            &self.engine,
            config,
            &self.localization,
            &self.template,
            input,
        )
    }

    /// Render a file, or standard input when `path` is `None` or `-`.
    pub fn convert_path(
        &self,
        path: Option<&Path>,
        config: &ConversionConfig,
    ) -> Result<RenderOutput, ScidownError> {
        let source = InputSource::from_arg(path);
        let bytes = source.read()?;
        self.convert(&bytes, config)
    }

    /// Render and write the result to `output_path`.
    ///
    /// Uses atomic write (temp file + rename) so readers never see a partial
    /// document.
    pub fn convert_to_file(
        &self,
        path: Option<&Path>,
        output_path: impl AsRef<Path>,
        config: &ConversionConfig,
    ) -> Result<RenderOutput, ScidownError> {
        let output = self.convert_path(path, config)?;
        write_atomic(output_path.as_ref(), &output.bytes)?;
        Ok(output)
    }
}

/// Render in-memory Markdown with the default engine and template.
pub fn convert(input: &[u8], config: &ConversionConfig) -> Result<RenderOutput, ScidownError> {
    Converter::new().convert(input, config)
}

/// Render a file (or stdin) with the default engine and template.
pub fn convert_path(path: Option<&Path>, config: &ConversionConfig) -> Result<RenderOutput, ScidownError> {
    Converter::new().convert_path(path, config)
}

/// Render a file (or stdin) into `output_path` with the default engine and
/// template.
pub fn convert_to_file(
    path: Option<&Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<RenderOutput, ScidownError> {
    Converter::new().convert_to_file(path, output_path, config)
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ScidownError> {
    let write_err = |source| ScidownError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    std::fs::write(&tmp_path, bytes).map_err(write_err)?;
    if let Err(source) = std::fs::rename(&tmp_path, path) {
        if let Err(e) = std::fs::remove_file(&tmp_path) {
            warn!("Could not remove {}: {}", tmp_path.display(), e);
        }
        return Err(write_err(source));
    }

    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
