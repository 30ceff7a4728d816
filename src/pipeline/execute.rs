//! One conversion run: buffers, document, timed render, copy-out.
//!
//! Every resource the run acquires is a local owned value. They are declared
//! renderer, document, output buffer, input buffer, so on any return path
//! (success, `?`, or panic) they are released in the reverse order: input
//! buffer, output buffer, document, renderer.

use crate::config::ConversionConfig;
use crate::engine::{Document, Engine, Localization};
use crate::error::ScidownError;
use crate::pipeline::buffer::Buffer;
use crate::pipeline::factory::{build_renderer, BuiltRenderer};
use crate::template::HtmlTemplate;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Rendered bytes plus the optional timing report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub bytes: Vec<u8>,
    /// Present only when timing was requested and could be measured.
    pub timing: Option<RenderTiming>,
}

/// Wall-clock time of the render call alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTiming {
    elapsed: Duration,
}

impl RenderTiming {
    pub fn new(elapsed: Duration) -> Self {
        Self { elapsed }
    }
}

impl fmt::Display for RenderTiming {
    /// Milliseconds below one second, seconds otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        if secs < 1.0 {
            write!(f, "Time spent on rendering: {:7.2} ms.", secs * 1e3)
        } else {
            write!(f, "Time spent on rendering: {:6.3} s.", secs)
        }
    }
}

/// Render `input` with the renderer `config` selects.
pub fn execute(
    engine: &dyn Engine,
    config: &ConversionConfig,
    local: &Localization,
    template: &HtmlTemplate,
    input: &[u8],
) -> Result<RenderOutput, ScidownError> {
    config.validate()?;

    let BuiltRenderer {
        renderer,
        augmentation,
    } = build_renderer(engine, config, local, template)?;
    let document = Document::new(
        renderer.as_ref(),
        config.extensions,
        augmentation,
        config.max_nesting,
    );
    let mut output = Buffer::new(config.output_unit, "output buffer")?;
    let mut source = Buffer::new(config.input_unit, "input buffer")?;
    source.load(input)?;

    let t1 = Instant::now();
    document.render(&mut output, source.as_bytes())?;
    let t2 = Instant::now();

    let bytes = output.to_vec()?;
    debug!(
        "Rendered {} input bytes into {} output bytes",
        source.len(),
        bytes.len()
    );

    let timing = if config.show_time {
        match t2.checked_duration_since(t1) {
            Some(elapsed) => Some(RenderTiming::new(elapsed)),
            None => {
                warn!("Clock went backwards during rendering; timing report skipped");
                None
            }
        }
    } else {
        None
    };

    Ok(RenderOutput { bytes, timing })
}
