//! (X)HTML renderer.
//!
//! The body comes straight from comrak's HTML formatter. Around it the
//! renderer splices the augmentation payload: with the `style` flag the
//! result is a standalone page (prologue in `<head>`, epilogue before
//! `</body>`), otherwise the blocks are simply placed before and after the
//! fragment.

use super::markdown::{convert_diagrams, parse, parse_options};
use super::{emit_error, RenderRequest, Renderer};
use crate::config::RendererKind;
use crate::error::ScidownError;
use crate::flags::OutputFlags;
use crate::pipeline::buffer::Buffer;
use comrak::{format_html, Arena};
use tracing::debug;

const HTML_DOCTYPE: &str = "<!DOCTYPE html>\n<html>\n";
const XHTML_DOCTYPE: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" ",
    "\"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n",
    "<html xmlns=\"http://www.w3.org/1999/xhtml\">\n",
);

#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    flags: OutputFlags,
    toc_level: u32,
}

impl HtmlRenderer {
    pub fn new(flags: OutputFlags, toc_level: u32) -> Self {
        Self { flags, toc_level }
    }

    fn standalone(&self) -> bool {
        self.flags.contains(OutputFlags::STYLE)
    }

    fn xhtml(&self) -> bool {
        self.flags.contains(OutputFlags::USE_XHTML)
    }

    fn write_head(&self, output: &mut Buffer, prologue: &str) -> Result<(), ScidownError> {
        if self.standalone() {
            let doctype = if self.xhtml() { XHTML_DOCTYPE } else { HTML_DOCTYPE };
            output.put(doctype.as_bytes())?;
            output.put(b"<head>\n")?;
            output.put(if self.xhtml() {
                b"<meta charset=\"utf-8\" />\n".as_slice()
            } else {
                b"<meta charset=\"utf-8\">\n".as_slice()
            })?;
            output.put(prologue.as_bytes())?;
            output.put(b"</head>\n<body>\n")
        } else {
            output.put(prologue.as_bytes())
        }
    }

    fn write_tail(&self, output: &mut Buffer, epilogue: &str) -> Result<(), ScidownError> {
        output.put(epilogue.as_bytes())?;
        if self.standalone() {
            output.put(b"</body>\n</html>\n")?;
        }
        Ok(())
    }
}

impl Renderer for HtmlRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Html
    }

    fn render(&self, request: &RenderRequest<'_>, output: &mut Buffer) -> Result<(), ScidownError> {
        let mut options = parse_options(request.extensions);
        options.render.hardbreaks = self.flags.contains(OutputFlags::HARD_WRAP);
        options.render.escape = self.flags.contains(OutputFlags::ESCAPE);
        options.render.unsafe_ = !self.flags.contains(OutputFlags::SKIP_HTML);
        if self.toc_level > 0 {
            options.extension.header_ids = Some(String::new());
        }

        let arena = Arena::new();
        let root = parse(&arena, request.source, &options, request.max_nesting);

        if options.render.unsafe_ && !options.render.escape {
            let diagrams = convert_diagrams(root, self.flags)?;
            if diagrams > 0 {
                debug!("Rendered {} diagram blocks as containers", diagrams);
            }
        }

        let (prologue, epilogue) = request
            .augmentation
            .map(|t| (t.prologue.as_str(), t.epilogue.as_str()))
            .unwrap_or(("", ""));

        self.write_head(output, prologue)?;
        format_html(root, &options, output).map_err(|e| emit_error(e, output))?;
        self.write_tail(output, epilogue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Extensions;
    use crate::template::HtmlTemplate;

    fn render(flags: OutputFlags, toc_level: u32, source: &str, template: Option<&HtmlTemplate>) -> String {
        let renderer = HtmlRenderer::new(flags, toc_level);
        let request = RenderRequest {
            source: source.as_bytes(),
            extensions: Extensions::BLOCK | Extensions::SPAN,
            augmentation: template,
            max_nesting: 16,
        };
        let mut out = Buffer::new(64, "output buffer").unwrap();
        renderer.render(&request, &mut out).unwrap();
        String::from_utf8(out.to_vec().unwrap()).unwrap()
    }

    #[test]
    fn renders_a_heading_fragment() {
        let html = render(OutputFlags::empty(), 0, "# Hello\n", None);
        assert_eq!(html, "<h1>Hello</h1>\n");
    }

    #[test]
    fn style_flag_wraps_a_standalone_page() {
        let template = HtmlTemplate::new("<!-- head -->\n", "<!-- tail -->\n");
        let html = render(OutputFlags::STYLE, 0, "text\n", Some(&template));
        assert!(html.starts_with("<!DOCTYPE html>"));
        let head = html.find("<!-- head -->").unwrap();
        let body = html.find("<p>text</p>").unwrap();
        let tail = html.find("<!-- tail -->").unwrap();
        assert!(head < html.find("</head>").unwrap());
        assert!(head < body && body < tail);
        assert!(html.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn xhtml_flag_selects_xhtml_doctype() {
        let html = render(OutputFlags::STYLE | OutputFlags::USE_XHTML, 0, "x\n", None);
        assert!(html.starts_with("<?xml"));
        assert!(html.contains("xmlns=\"http://www.w3.org/1999/xhtml\""));
    }

    #[test]
    fn fragment_mode_still_splices_template() {
        let template = HtmlTemplate::new("[", "]");
        let html = render(OutputFlags::empty(), 0, "x\n", Some(&template));
        assert_eq!(html, "[<p>x</p>\n]");
    }

    #[test]
    fn raw_html_handling_follows_flags() {
        let src = "<span>raw</span>\n";
        assert!(render(OutputFlags::empty(), 0, src, None).contains("<span>raw</span>"));
        assert!(!render(OutputFlags::SKIP_HTML, 0, src, None).contains("<span>"));
        assert!(render(OutputFlags::ESCAPE, 0, src, None).contains("&lt;span&gt;"));
    }

    #[test]
    fn hard_wrap_turns_newlines_into_breaks() {
        let html = render(OutputFlags::HARD_WRAP, 0, "a\nb\n", None);
        assert!(html.contains("<br />"), "got: {html}");
    }

    #[test]
    fn toc_level_adds_heading_anchors() {
        let html = render(OutputFlags::empty(), 2, "## Getting Started\n", None);
        assert!(html.contains("id=\"getting-started\""), "got: {html}");
        let html = render(OutputFlags::empty(), 0, "## Getting Started\n", None);
        assert!(!html.contains("id="));
    }

    #[test]
    fn mermaid_blocks_render_as_containers() {
        let src = "```mermaid\ngraph TD; A-->B\n```\n";
        let html = render(OutputFlags::MERMAID, 0, src, None);
        assert!(html.contains("<div class=\"mermaid\">"));
        let html = render(OutputFlags::empty(), 0, src, None);
        assert!(html.contains("language-mermaid"));
    }
}
