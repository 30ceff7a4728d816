//! Table-of-contents renderer.
//!
//! Emits only nested `<ul>` lists of the document's headings, linking to the
//! anchors the HTML renderer writes when `toc_level > 0`. Anchors come from
//! the same [`comrak::Anchorizer`] walk, so every heading is anchorized in
//! document order even when it is too deep to be listed.

use super::markdown::{collect_text, parse, parse_options};
use super::{emit_error, RenderRequest, Renderer};
use crate::config::RendererKind;
use crate::error::ScidownError;
use crate::pipeline::buffer::Buffer;
use comrak::nodes::NodeValue;
use comrak::html::escape;
use comrak::{Anchorizer, Arena};
use std::io::{self, Write};

#[derive(Debug, Clone)]
pub struct HtmlTocRenderer {
    toc_level: u32,
}

/// One listed heading.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TocEntry {
    level: u32,
    anchor: String,
    text: String,
}

impl HtmlTocRenderer {
    pub fn new(toc_level: u32) -> Self {
        Self { toc_level }
    }
}

impl Renderer for HtmlTocRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::HtmlToc
    }

    fn render(&self, request: &RenderRequest<'_>, output: &mut Buffer) -> Result<(), ScidownError> {
        if self.toc_level == 0 {
            return Ok(());
        }
        let options = parse_options(request.extensions);
        let arena = Arena::new();
        let root = parse(&arena, request.source, &options, request.max_nesting);

        let mut anchorizer = Anchorizer::new();
        let mut entries = Vec::new();
        for node in root.descendants() {
            let level = match &node.data.borrow().value {
                NodeValue::Heading(heading) => u32::from(heading.level),
                _ => continue,
            };
            let mut text = String::new();
            collect_text(node, &mut text);
            let anchor = anchorizer.anchorize(text.clone());
            if level <= self.toc_level {
                entries.push(TocEntry {
                    level,
                    anchor,
                    text,
                });
            }
        }

        nested_list(&entries, output).map_err(|e| emit_error(e, output))
    }
}

fn nested_list(entries: &[TocEntry], out: &mut dyn Write) -> io::Result<()> {
    let mut current = 0;
    for entry in entries {
        if entry.level > current {
            while entry.level > current {
                out.write_all(b"<ul>\n<li>\n")?;
                current += 1;
            }
        } else if entry.level < current {
            out.write_all(b"</li>\n")?;
            while entry.level < current {
                out.write_all(b"</ul>\n</li>\n")?;
                current -= 1;
            }
            out.write_all(b"<li>\n")?;
        } else {
            out.write_all(b"</li>\n<li>\n")?;
        }
        write!(out, "<a href=\"#{}\">", entry.anchor)?;
        escape(out, entry.text.as_bytes())?;
        out.write_all(b"</a>\n")?;
    }
    while current > 0 {
        out.write_all(b"</li>\n</ul>\n")?;
        current -= 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Extensions;

    fn render(toc_level: u32, source: &str) -> String {
        let renderer = HtmlTocRenderer::new(toc_level);
        let request = RenderRequest {
            source: source.as_bytes(),
            extensions: Extensions::empty(),
            augmentation: None,
            max_nesting: 16,
        };
        let mut out = Buffer::new(16, "output buffer").unwrap();
        renderer.render(&request, &mut out).unwrap();
        String::from_utf8(out.to_vec().unwrap()).unwrap()
    }

    #[test]
    fn zero_level_renders_nothing() {
        assert_eq!(render(0, "# A\n## B\n"), "");
    }

    #[test]
    fn lists_headings_up_to_level() {
        let toc = render(2, "# Intro\n## Setup\n### Deep\n## Usage\n");
        assert!(toc.contains("<a href=\"#intro\">Intro</a>"));
        assert!(toc.contains("<a href=\"#setup\">Setup</a>"));
        assert!(toc.contains("<a href=\"#usage\">Usage</a>"));
        assert!(!toc.contains("Deep"));
    }

    #[test]
    fn lists_are_balanced() {
        let toc = render(3, "## B\n# A\n### C\n# D\n");
        assert_eq!(toc.matches("<ul>").count(), toc.matches("</ul>").count());
        assert_eq!(toc.matches("<li>").count(), toc.matches("</li>").count());
    }

    #[test]
    fn duplicate_headings_get_unique_anchors() {
        let toc = render(1, "# Notes\n# Notes\n");
        assert!(toc.contains("href=\"#notes\""));
        assert!(toc.contains("href=\"#notes-1\""));
    }

    #[test]
    fn heading_text_is_escaped() {
        let toc = render(1, "# a < b\n");
        assert!(toc.contains(">a &lt; b</a>"), "got: {toc}");
    }

    #[test]
    fn nested_structure_for_simple_outline() {
        let toc = render(2, "# A\n## B\n");
        assert_eq!(
            toc,
            "<ul>\n<li>\n<a href=\"#a\">A</a>\n<ul>\n<li>\n<a href=\"#b\">B</a>\n</li>\n</ul>\n</li>\n</ul>\n"
        );
    }
}
