//! [`ComrakEngine`]: the shipped [`Engine`], built on the `comrak` parser.
//!
//! Parsing is shared by all three renderers: extensions map onto comrak's
//! options, the tree is parsed into an arena, blocks nested past the limit
//! are cut, and each renderer then walks or formats the tree its own way.

use super::html::HtmlRenderer;
use super::latex::LatexRenderer;
use super::toc::HtmlTocRenderer;
use super::{Engine, Localization, Renderer};
use crate::error::ScidownError;
use crate::flags::{Extensions, OutputFlags};
use comrak::html::escape;
use comrak::nodes::{AstNode, NodeCodeBlock, NodeHtmlBlock, NodeValue};
use comrak::{parse_document, Arena, Options};
use tracing::debug;

/// Extensions that map onto a comrak option.
pub const MAPPED_EXTENSIONS: Extensions = Extensions::TABLES
    .union(Extensions::FOOTNOTES)
    .union(Extensions::AUTOLINK)
    .union(Extensions::STRIKETHROUGH)
    .union(Extensions::UNDERLINE)
    .union(Extensions::SUPERSCRIPT)
    .union(Extensions::MATH);

/// Extensions comrak always behaves as if enabled.
pub const BUILT_IN_EXTENSIONS: Extensions = Extensions::FENCED_CODE.union(Extensions::SPACE_HEADERS);

/// Engine backed by comrak.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComrakEngine;

impl Engine for ComrakEngine {
    fn html_renderer(
        &self,
        flags: OutputFlags,
        toc_level: u32,
        _local: &Localization,
    ) -> Result<Box<dyn Renderer>, ScidownError> {
        Ok(Box::new(HtmlRenderer::new(flags, toc_level)))
    }

    fn html_toc_renderer(
        &self,
        toc_level: u32,
        _local: &Localization,
    ) -> Result<Box<dyn Renderer>, ScidownError> {
        Ok(Box::new(HtmlTocRenderer::new(toc_level)))
    }

    fn latex_renderer(
        &self,
        flags: OutputFlags,
        toc_level: u32,
        local: &Localization,
    ) -> Result<Box<dyn Renderer>, ScidownError> {
        Ok(Box::new(LatexRenderer::new(flags, toc_level, local.clone())))
    }
}

/// comrak options for an extension set.
pub(crate) fn parse_options(extensions: Extensions) -> Options<'static> {
    let unsupported = extensions - MAPPED_EXTENSIONS - BUILT_IN_EXTENSIONS;
    if !unsupported.is_empty() {
        debug!("Extensions without comrak support are ignored: {:?}", unsupported);
    }
    let forced = BUILT_IN_EXTENSIONS - extensions;
    if !forced.is_empty() {
        debug!("comrak cannot disable: {:?}", forced);
    }

    let mut options = Options::default();
    options.extension.table = extensions.contains(Extensions::TABLES);
    options.extension.footnotes = extensions.contains(Extensions::FOOTNOTES);
    options.extension.autolink = extensions.contains(Extensions::AUTOLINK);
    options.extension.strikethrough = extensions.contains(Extensions::STRIKETHROUGH);
    options.extension.underline = extensions.contains(Extensions::UNDERLINE);
    options.extension.superscript = extensions.contains(Extensions::SUPERSCRIPT);
    options.extension.math_dollars = extensions.contains(Extensions::MATH);
    options
}

/// Parse `source` and apply the nesting limit.
pub(crate) fn parse<'a>(
    arena: &'a Arena<AstNode<'a>>,
    source: &[u8],
    options: &Options,
    max_nesting: usize,
) -> &'a AstNode<'a> {
    let text = String::from_utf8_lossy(source);
    let root = parse_document(arena, &text, options);
    let dropped = limit_nesting(root, max_nesting);
    if dropped > 0 {
        debug!("Dropped {} blocks nested deeper than {}", dropped, max_nesting);
    }
    root
}

fn is_container(node: &AstNode<'_>) -> bool {
    matches!(
        node.data.borrow().value,
        NodeValue::BlockQuote
            | NodeValue::List(_)
            | NodeValue::Item(_)
            | NodeValue::FootnoteDefinition(_)
    )
}

/// Detach container blocks nested more than `max_nesting` levels deep.
///
/// Returns the number of detached subtrees.
pub(crate) fn limit_nesting<'a>(root: &'a AstNode<'a>, max_nesting: usize) -> usize {
    fn walk<'a>(node: &'a AstNode<'a>, depth: usize, max: usize) -> usize {
        let mut dropped = 0;
        let children: Vec<_> = node.children().collect();
        for child in children {
            if is_container(child) {
                if depth + 1 > max {
                    child.detach();
                    dropped += 1;
                    continue;
                }
                dropped += walk(child, depth + 1, max);
            } else {
                dropped += walk(child, depth, max);
            }
        }
        dropped
    }
    walk(root, 0, max_nesting)
}

/// Plain text of a node, the way comrak computes heading anchors.
pub(crate) fn collect_text<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(literal) => output.push_str(literal),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::Math(math) => output.push_str(&math.literal),
        NodeValue::LineBreak | NodeValue::SoftBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_text(child, output);
            }
        }
    }
}

/// The container class for a fenced block whose info string names an
/// enabled diagram kind.
fn diagram_class(block: &NodeCodeBlock, flags: OutputFlags) -> Option<&'static str> {
    let lang = block.info.split_whitespace().next()?;
    [
        ("mermaid", OutputFlags::MERMAID),
        ("gnuplot", OutputFlags::GNUPLOT),
        ("charter", OutputFlags::CHARTER),
    ]
    .into_iter()
    .find(|(name, flag)| *name == lang && flags.contains(*flag))
    .map(|(name, _)| name)
}

/// A raw `<div class="...">` holding the escaped diagram source.
fn diagram_container(class: &str, code: &str) -> Result<String, ScidownError> {
    let mut html = format!("<div class=\"{class}\">\n").into_bytes();
    escape(&mut html, code.as_bytes()).map_err(|e| ScidownError::Render(e.to_string()))?;
    html.extend_from_slice(b"</div>\n");
    String::from_utf8(html).map_err(|e| ScidownError::Render(e.to_string()))
}

/// Turn diagram code blocks into raw `<div class="...">` blocks.
///
/// Returns the number of blocks converted.
pub(crate) fn convert_diagrams<'a>(
    root: &'a AstNode<'a>,
    flags: OutputFlags,
) -> Result<usize, ScidownError> {
    let mut converted = 0;
    for node in root.descendants() {
        let mut data = node.data.borrow_mut();
        let replacement = match &data.value {
            NodeValue::CodeBlock(block) => match diagram_class(block, flags) {
                Some(class) => Some(diagram_container(class, &block.literal)?),
                None => None,
            },
            _ => None,
        };
        if let Some(literal) = replacement {
            data.value = NodeValue::HtmlBlock(NodeHtmlBlock {
                block_type: 0,
                literal,
            });
            converted += 1;
        }
    }
    Ok(converted)
}
