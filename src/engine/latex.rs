//! LaTeX renderer: walks the comrak tree and writes LaTeX.
//!
//! Caption names come from the injected [`Localization`]. With the `style`
//! flag the body is wrapped in a standalone `article` document; the
//! localization only reaches the output through that preamble.

use super::markdown::{parse, parse_options};
use super::{emit_error, Localization, RenderRequest, Renderer};
use crate::config::RendererKind;
use crate::error::ScidownError;
use crate::flags::OutputFlags;
use crate::pipeline::buffer::Buffer;
use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::Arena;
use std::collections::HashMap;
use std::io::{self, Write};

const PACKAGES: &[&str] = &[
    "\\usepackage[utf8]{inputenc}",
    "\\usepackage{amsmath}",
    "\\usepackage{amssymb}",
    "\\usepackage{graphicx}",
    "\\usepackage{hyperref}",
    "\\usepackage{listings}",
    "\\usepackage[normalem]{ulem}",
];

#[derive(Debug, Clone)]
pub struct LatexRenderer {
    flags: OutputFlags,
    toc_level: u32,
    local: Localization,
}

impl LatexRenderer {
    pub fn new(flags: OutputFlags, toc_level: u32, local: Localization) -> Self {
        Self {
            flags,
            toc_level,
            local,
        }
    }

    fn preamble(&self) -> String {
        let mut tex = String::from("\\documentclass{article}\n");
        for package in PACKAGES {
            tex.push_str(package);
            tex.push('\n');
        }
        tex.push_str(&format!(
            "\\renewcommand{{\\figurename}}{{{}}}\n",
            escape(&self.local.figure)
        ));
        tex.push_str(&format!(
            "\\renewcommand{{\\tablename}}{{{}}}\n",
            escape(&self.local.table)
        ));
        tex.push_str(&format!(
            "\\renewcommand{{\\lstlistingname}}{{{}}}\n",
            escape(&self.local.listing)
        ));
        tex.push_str("\\begin{document}\n");
        tex
    }

    fn write_document<'a>(&self, root: &'a AstNode<'a>, out: &mut dyn Write) -> io::Result<()> {
        let standalone = self.flags.contains(OutputFlags::STYLE);
        if standalone {
            out.write_all(self.preamble().as_bytes())?;
        }
        if self.toc_level > 0 {
            writeln!(out, "\\setcounter{{tocdepth}}{{{}}}", self.toc_level)?;
            out.write_all(b"\\tableofcontents\n\n")?;
        }
        let mut writer = LatexWriter {
            out,
            hard_wrap: self.flags.contains(OutputFlags::HARD_WRAP),
            footnotes: footnote_definitions(root),
        };
        writer.node(root)?;
        if standalone {
            writer.out.write_all(b"\\end{document}\n")?;
        }
        Ok(())
    }
}

impl Renderer for LatexRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Latex
    }

    fn render(&self, request: &RenderRequest<'_>, output: &mut Buffer) -> Result<(), ScidownError> {
        let options = parse_options(request.extensions);
        let arena = Arena::new();
        let root = parse(&arena, request.source, &options, request.max_nesting);
        self.write_document(root, output)
            .map_err(|e| emit_error(e, output))
    }
}

fn footnote_definitions<'a>(root: &'a AstNode<'a>) -> HashMap<String, &'a AstNode<'a>> {
    root.children()
        .filter_map(|node| match &node.data.borrow().value {
            NodeValue::FootnoteDefinition(def) => Some((def.name.clone(), node)),
            _ => None,
        })
        .collect()
}

struct LatexWriter<'w, 'a> {
    out: &'w mut dyn Write,
    hard_wrap: bool,
    footnotes: HashMap<String, &'a AstNode<'a>>,
}

impl<'a> LatexWriter<'_, 'a> {
    fn children(&mut self, node: &'a AstNode<'a>) -> io::Result<()> {
        for child in node.children() {
            self.node(child)?;
        }
        Ok(())
    }

    fn wrap(&mut self, open: &str, node: &'a AstNode<'a>, close: &str) -> io::Result<()> {
        self.out.write_all(open.as_bytes())?;
        self.children(node)?;
        self.out.write_all(close.as_bytes())
    }

    fn node(&mut self, node: &'a AstNode<'a>) -> io::Result<()> {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Paragraph => self.wrap("", node, "\n\n"),
            NodeValue::Heading(heading) => {
                let command = match heading.level {
                    1 => "section",
                    2 => "subsection",
                    3 => "subsubsection",
                    4 => "paragraph",
                    _ => "subparagraph",
                };
                self.wrap(&format!("\\{command}{{"), node, "}\n\n")
            }
            NodeValue::BlockQuote => self.wrap("\\begin{quote}\n", node, "\\end{quote}\n\n"),
            NodeValue::List(list) => {
                let env = match list.list_type {
                    ListType::Ordered => "enumerate",
                    ListType::Bullet => "itemize",
                };
                self.wrap(
                    &format!("\\begin{{{env}}}\n"),
                    node,
                    &format!("\\end{{{env}}}\n\n"),
                )
            }
            NodeValue::Item(_) => self.wrap("\\item ", node, ""),
            NodeValue::CodeBlock(block) => {
                self.out.write_all(b"\\begin{lstlisting}\n")?;
                self.out.write_all(block.literal.as_bytes())?;
                if !block.literal.is_empty() && !block.literal.ends_with('\n') {
                    self.out.write_all(b"\n")?;
                }
                self.out.write_all(b"\\end{lstlisting}\n\n")
            }
            NodeValue::ThematicBreak => self
                .out
                .write_all(b"\\noindent\\rule{\\textwidth}{0.4pt}\n\n"),
            NodeValue::Table(table) => {
                let columns: String = table
                    .alignments
                    .iter()
                    .map(|a| match a {
                        TableAlignment::Center => 'c',
                        TableAlignment::Right => 'r',
                        _ => 'l',
                    })
                    .collect();
                self.wrap(
                    &format!("\\begin{{table}}[h]\n\\centering\n\\begin{{tabular}}{{{columns}}}\n"),
                    node,
                    "\\end{tabular}\n\\end{table}\n\n",
                )
            }
            NodeValue::TableRow(header) => {
                for (i, cell) in node.children().enumerate() {
                    if i > 0 {
                        self.out.write_all(b" & ")?;
                    }
                    self.children(cell)?;
                }
                self.out.write_all(b" \\\\\n")?;
                if header {
                    self.out.write_all(b"\\hline\n")?;
                }
                Ok(())
            }
            NodeValue::Text(text) => self.out.write_all(escape(&text).as_bytes()),
            NodeValue::SoftBreak if self.hard_wrap => self.out.write_all(b"\\\\\n"),
            NodeValue::SoftBreak => self.out.write_all(b"\n"),
            NodeValue::LineBreak => self.out.write_all(b"\\\\\n"),
            NodeValue::Code(code) => {
                write!(self.out, "\\texttt{{{}}}", escape(&code.literal))
            }
            NodeValue::Emph => self.wrap("\\emph{", node, "}"),
            NodeValue::Strong => self.wrap("\\textbf{", node, "}"),
            NodeValue::Strikethrough => self.wrap("\\sout{", node, "}"),
            NodeValue::Underline => self.wrap("\\uline{", node, "}"),
            NodeValue::Superscript => self.wrap("\\textsuperscript{", node, "}"),
            NodeValue::Link(link) => {
                self.wrap(&format!("\\href{{{}}}{{", escape_url(&link.url)), node, "}")
            }
            NodeValue::Image(link) => self.wrap(
                &format!(
                    "\\begin{{figure}}[h]\n\\centering\n\\includegraphics{{{}}}\n\\caption{{",
                    escape_url(&link.url)
                ),
                node,
                "}\n\\end{figure}\n",
            ),
            NodeValue::Math(math) if math.display_math => {
                write!(self.out, "\\[{}\\]", math.literal)
            }
            NodeValue::Math(math) => write!(self.out, "${}$", math.literal),
            NodeValue::FootnoteReference(reference) => {
                match self.footnotes.get(&reference.name).copied() {
                    Some(definition) => self.wrap("\\footnote{", definition, "}"),
                    None => Ok(()),
                }
            }
            NodeValue::FootnoteDefinition(_)
            | NodeValue::HtmlBlock(_)
            | NodeValue::HtmlInline(_) => Ok(()),
            _ => self.children(node),
        }
    }
}

/// Escape LaTeX special characters in running text.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '$' | '&' | '#' | '%' | '_' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_url(url: &str) -> String {
    url.replace('%', "\\%").replace('#', "\\#")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Extensions;

    fn render(flags: OutputFlags, toc_level: u32, source: &str) -> String {
        let local = Localization {
            figure: "Abbildung".into(),
            listing: "Auflistung".into(),
            table: "Tabelle".into(),
        };
        let renderer = LatexRenderer::new(flags, toc_level, local);
        let request = RenderRequest {
            source: source.as_bytes(),
            extensions: Extensions::BLOCK | Extensions::SPAN,
            augmentation: None,
            max_nesting: 16,
        };
        let mut out = Buffer::new(32, "output buffer").unwrap();
        renderer.render(&request, &mut out).unwrap();
        String::from_utf8(out.to_vec().unwrap()).unwrap()
    }

    #[test]
    fn headings_map_to_sections() {
        let tex = render(OutputFlags::empty(), 0, "# Intro\n\n## Detail\n");
        assert!(tex.contains("\\section{Intro}"));
        assert!(tex.contains("\\subsection{Detail}"));
        assert!(!tex.contains("\\documentclass"));
    }

    #[test]
    fn style_flag_emits_standalone_document_with_labels() {
        let tex = render(OutputFlags::STYLE, 0, "text\n");
        assert!(tex.starts_with("\\documentclass{article}"));
        assert!(tex.contains("\\renewcommand{\\figurename}{Abbildung}"));
        assert!(tex.contains("\\renewcommand{\\tablename}{Tabelle}"));
        assert!(tex.contains("\\renewcommand{\\lstlistingname}{Auflistung}"));
        assert!(tex.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn toc_level_emits_table_of_contents() {
        let tex = render(OutputFlags::empty(), 2, "# A\n");
        assert!(tex.contains("\\setcounter{tocdepth}{2}"));
        assert!(tex.contains("\\tableofcontents"));
        assert!(!render(OutputFlags::empty(), 0, "# A\n").contains("\\tableofcontents"));
    }

    #[test]
    fn inline_markup() {
        let tex = render(OutputFlags::empty(), 0, "*a* **b** ~~c~~ `d_e`\n");
        assert!(tex.contains("\\emph{a}"));
        assert!(tex.contains("\\textbf{b}"));
        assert!(tex.contains("\\sout{c}"));
        assert!(tex.contains("\\texttt{d\\_e}"));
    }

    #[test]
    fn lists_and_code() {
        let tex = render(OutputFlags::empty(), 0, "1. one\n2. two\n\n```\nlet x = 1;\n```\n");
        assert!(tex.contains("\\begin{enumerate}"));
        assert_eq!(tex.matches("\\item ").count(), 2);
        assert!(tex.contains("\\begin{lstlisting}\nlet x = 1;\n\\end{lstlisting}"));
    }

    #[test]
    fn tables_use_alignment() {
        let tex = render(OutputFlags::empty(), 0, "| a | b |\n|:-:|--:|\n| 1 | 2 |\n");
        assert!(tex.contains("\\begin{tabular}{cr}"), "got: {tex}");
        assert!(tex.contains("a & b \\\\\n\\hline"));
        assert!(tex.contains("1 & 2 \\\\"));
    }

    #[test]
    fn math_passes_through_unescaped() {
        let tex = render(OutputFlags::empty(), 0, "Euler: $e^{i\\pi}$\n\n$$x_1$$\n");
        assert!(tex.contains("$e^{i\\pi}$"), "got: {tex}");
        assert!(tex.contains("\\[x_1\\]"), "got: {tex}");
    }

    #[test]
    fn footnotes_are_inlined() {
        let tex = render(OutputFlags::empty(), 0, "Claim[^1].\n\n[^1]: Source.\n");
        assert!(tex.contains("Claim\\footnote{Source."), "got: {tex}");
    }

    #[test]
    fn hard_wrap_breaks_lines() {
        let tex = render(OutputFlags::HARD_WRAP, 0, "a\nb\n");
        assert!(tex.contains("a\\\\\nb"));
    }

    #[test]
    fn escape_handles_specials() {
        assert_eq!(escape("50% & $5 #1 a_b"), "50\\% \\& \\$5 \\#1 a\\_b");
        assert_eq!(escape("\\~^"), "\\textbackslash{}\\textasciitilde{}\\textasciicircum{}");
    }
}
