//! HTML augmentation blocks spliced around the rendered body.
//!
//! The HTML renderer wraps every document in a prologue (scripts and style
//! sheets for math, code highlighting and diagrams) and an epilogue (the
//! calls that start those scripts). They are plain data: the defaults live
//! here, and callers swap them via [`HtmlTemplate::new`] or
//! [`HtmlTemplate::from_files`] without touching the pipeline.

use crate::error::ScidownError;
use std::path::Path;
use tracing::debug;

/// Default prologue: KaTeX, highlight.js and mermaid assets.
pub const DEFAULT_PROLOGUE: &str = concat!(
    "<link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/katex@0.11.1/dist/katex.min.css\" crossorigin=\"anonymous\">\n",
    "<link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/9.18.1/styles/xcode.min.css\">\n",
    "<script src=\"https://cdn.jsdelivr.net/npm/katex@0.11.1/dist/katex.min.js\" crossorigin=\"anonymous\"></script>\n",
    "<script src=\"https://cdn.jsdelivr.net/npm/katex@0.11.1/dist/contrib/auto-render.min.js\" crossorigin=\"anonymous\"></script>\n",
    "<script src=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/9.18.1/highlight.min.js\"></script>\n",
    "<script src=\"https://cdn.jsdelivr.net/npm/mermaid@8.4.0/dist/mermaid.min.js\"></script>\n",
);

/// Default epilogue: body font and script start-up.
pub const DEFAULT_EPILOGUE: &str = concat!(
    "<style>\n",
    "  body {\n",
    "    font-family: -apple-system, 'Segoe UI', 'Hiragino Sans', sans-serif;\n",
    "  }\n",
    "</style>\n",
    "<script>renderMathInElement(document.body); hljs.initHighlightingOnLoad(); ",
    "mermaid.initialize({startOnLoad:true});</script>\n",
);

/// Prologue and epilogue for HTML output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HtmlTemplate {
    pub prologue: String,
    pub epilogue: String,
}

impl Default for HtmlTemplate {
    fn default() -> Self {
        Self {
            prologue: DEFAULT_PROLOGUE.to_string(),
            epilogue: DEFAULT_EPILOGUE.to_string(),
        }
    }
}

impl HtmlTemplate {
    pub fn new(prologue: impl Into<String>, epilogue: impl Into<String>) -> Self {
        Self {
            prologue: prologue.into(),
            epilogue: epilogue.into(),
        }
    }

    /// A template that adds nothing around the body.
    pub fn empty() -> Self {
        Self::new("", "")
    }

    /// Load either block from a file, keeping the default for the other.
    pub fn from_files(
        prologue: Option<&Path>,
        epilogue: Option<&Path>,
    ) -> Result<Self, ScidownError> {
        let mut template = Self::default();
        if let Some(path) = prologue {
            template.prologue = read_block(path)?;
        }
        if let Some(path) = epilogue {
            template.epilogue = read_block(path)?;
        }
        Ok(template)
    }
}

fn read_block(path: &Path) -> Result<String, ScidownError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScidownError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded template block from {} ({} bytes)", path.display(), text.len());
    Ok(text)
}
