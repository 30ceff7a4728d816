//! Renderer factory: one renderer handle per variant.

use crate::config::{ConversionConfig, RendererKind};
use crate::engine::{Engine, Localization, Renderer};
use crate::error::ScidownError;
use crate::template::HtmlTemplate;
use std::fmt;
use tracing::debug;

/// A renderer handle plus the augmentation payload it renders with.
///
/// Dropping it tears the renderer down.
pub struct BuiltRenderer {
    pub renderer: Box<dyn Renderer>,
    /// Prologue/epilogue spliced around HTML output. `None` for the
    /// table-of-contents and LaTeX variants.
    pub augmentation: Option<HtmlTemplate>,
}

impl fmt::Debug for BuiltRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltRenderer")
            .field("renderer", &self.renderer.kind())
            .field("augmentation", &self.augmentation.is_some())
            .finish()
    }
}

/// Build the renderer selected by `config.renderer`.
pub fn build_renderer(
    engine: &dyn Engine,
    config: &ConversionConfig,
    local: &Localization,
    template: &HtmlTemplate,
) -> Result<BuiltRenderer, ScidownError> {
    let built = match config.renderer {
        RendererKind::Html => BuiltRenderer {
            renderer: engine.html_renderer(config.output_flags, config.toc_level, local)?,
            augmentation: Some(template.clone()),
        },
        RendererKind::HtmlToc => BuiltRenderer {
            renderer: engine.html_toc_renderer(config.toc_level, local)?,
            augmentation: None,
        },
        RendererKind::Latex => BuiltRenderer {
            renderer: engine.latex_renderer(config.output_flags, config.toc_level, local)?,
            augmentation: None,
        },
    };
    debug!(
        "Built {} renderer (toc level {}, flags {:?})",
        config.renderer, config.toc_level, config.output_flags
    );
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ComrakEngine;

    fn build(kind: RendererKind) -> BuiltRenderer {
        let config = ConversionConfig::builder().renderer(kind).build().unwrap();
        build_renderer(
            &ComrakEngine,
            &config,
            &Localization::default(),
            &HtmlTemplate::default(),
        )
        .unwrap()
    }

    #[test]
    fn html_carries_the_template() {
        let built = build(RendererKind::Html);
        assert_eq!(built.renderer.kind(), RendererKind::Html);
        assert_eq!(built.augmentation, Some(HtmlTemplate::default()));
    }

    #[test]
    fn toc_and_latex_have_no_augmentation() {
        for kind in [RendererKind::HtmlToc, RendererKind::Latex] {
            let built = build(kind);
            assert_eq!(built.renderer.kind(), kind);
            assert!(built.augmentation.is_none());
        }
    }

    #[test]
    fn injected_template_is_used_verbatim() {
        let template = HtmlTemplate::new("<!-- a -->", "<!-- b -->");
        let built = build_renderer(
            &ComrakEngine,
            &ConversionConfig::default(),
            &Localization::default(),
            &template,
        )
        .unwrap();
        assert_eq!(built.augmentation, Some(template));
    }
}
