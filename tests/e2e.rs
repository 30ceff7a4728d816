//! End-to-end tests for scidown: option tokens in, rendered bytes out.
//!
//! Everything runs through the public library API with the shipped comrak
//! engine; no network access and no fixtures beyond temp files.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use scidown::{
    convert, convert_path, convert_to_file, resolve, resolve_default, ConversionConfig, Converter,
    Extensions, HtmlTemplate, Localization, OutputFlags, RendererKind, ScidownError,
};
use std::io::Write;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn render(tokens: &[&str], source: &str) -> String {
    let config = resolve_default(tokens).expect("options resolve");
    let output = convert(source.as_bytes(), &config).expect("render succeeds");
    String::from_utf8(output.bytes).expect("utf-8 output")
}

/// Assert every opened tag in `names` is closed as often as it is opened.
fn assert_balanced(html: &str, names: &[&str], context: &str) {
    for name in names {
        let open = html.matches(&format!("<{name}>")).count()
            + html.matches(&format!("<{name} ")).count();
        let close = html.matches(&format!("</{name}>")).count();
        assert_eq!(open, close, "[{context}] unbalanced <{name}>: {html}");
    }
}

const PAPER: &str = "\
# Results

We measured $E = mc^2$ on ~~three~~ two samples[^1].

| sample | value |
|:-------|------:|
| a      | 1.0   |
| b      | 2.5   |

## Discussion

> The quoted remark.

```mermaid
graph TD; A-->B
```

[^1]: See the appendix.
";

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn scenario_a_contradictory_toggles_last_wins() {
    let config = resolve_default(["--tables", "--no-tables"]).unwrap();
    assert!(!config.extensions.contains(Extensions::TABLES));

    let html = render(&["--no-style", "--tables", "--no-tables"], PAPER);
    assert!(!html.contains("<table>"), "tables must be off: {html}");

    let html = render(&["--no-style", "--no-tables", "--tables"], PAPER);
    assert!(html.contains("<table>"));
}

#[test]
fn scenario_b_category_minus_member() {
    let config = resolve(
        ConversionConfig::builder()
            .extensions(Extensions::empty())
            .build()
            .unwrap(),
        ["--all-span", "--no-autolink"],
    )
    .unwrap();
    assert_eq!(config.extensions, Extensions::SPAN - Extensions::AUTOLINK);

    let html = render(&["--no-style", "--all-span", "--no-autolink"], "see https://example.org\n");
    assert!(!html.contains("<a href"), "autolink must be off: {html}");
    let html = render(&["--no-style", "--all-span"], "see https://example.org\n");
    assert!(html.contains("<a href=\"https://example.org\">"));
}

#[test]
fn scenario_c_heading_renders() {
    let html = render(&[], "# Hello");
    assert!(!html.is_empty());
    assert!(html.contains("<h1>Hello</h1>"));
}

#[test]
fn scenario_d_empty_input() {
    for renderer in ["--html", "--html-toc", "--latex"] {
        let config = resolve_default([renderer]).unwrap();
        let output = convert(b"", &config).unwrap();
        assert!(std::str::from_utf8(&output.bytes).is_ok(), "{renderer}");
    }
}

// ── Renderers ────────────────────────────────────────────────────────────────

#[test]
fn standalone_html_page_is_well_formed() {
    let html = render(&[], PAPER);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("katex.min.js"), "default prologue expected");
    assert!(html.contains("<div class=\"mermaid\">"));
    assert!(html.contains("<del>three</del>"));
    assert!(html.contains("<blockquote>"));
    assert_balanced(&html, &["html", "head", "body", "table", "blockquote"], "standalone");
}

#[test]
fn toc_links_match_heading_ids() {
    let toc = render(&["--html-toc", "--toc-level=2"], PAPER);
    let body = render(&["--no-style", "toc-level=2"], PAPER);
    for anchor in ["results", "discussion"] {
        assert!(toc.contains(&format!("href=\"#{anchor}\"")), "toc: {toc}");
        assert!(body.contains(&format!("id=\"{anchor}\"")), "body: {body}");
    }
    assert_balanced(&toc, &["ul", "li"], "toc");
}

#[test]
fn latex_document_uses_localized_captions() {
    let config = resolve_default(["--latex", "toc-level=1"]).unwrap();
    let converter = Converter::new().localization(Localization {
        figure: "Figure".into(),
        listing: "Code".into(),
        table: "Tableau".into(),
    });
    let tex = String::from_utf8(converter.convert(PAPER.as_bytes(), &config).unwrap().bytes).unwrap();
    assert!(tex.starts_with("\\documentclass{article}"));
    assert!(tex.contains("\\renewcommand{\\tablename}{Tableau}"));
    assert!(tex.contains("\\renewcommand{\\lstlistingname}{Code}"));
    assert!(tex.contains("\\section{Results}"));
    assert!(tex.contains("\\begin{tabular}{lr}"));
    assert!(tex.contains("\\footnote{See the appendix."));
    assert!(tex.contains("\\tableofcontents"));
    assert!(tex.trim_end().ends_with("\\end{document}"));
}

#[test]
fn xhtml_and_hard_wrap() {
    let html = render(&["--xhtml", "--hard-wrap"], "one\ntwo\n");
    assert!(html.starts_with("<?xml"));
    assert!(html.contains("<br />"));
}

#[test]
fn custom_template_replaces_default() {
    let config = resolve_default(["--no-style"]).unwrap();
    let converter = Converter::new().template(HtmlTemplate::new("<!--head-->\n", "<!--tail-->\n"));
    let html = String::from_utf8(converter.convert(b"x", &config).unwrap().bytes).unwrap();
    assert_eq!(html, "<!--head-->\n<p>x</p>\n<!--tail-->\n");
}

// ── Buffers and timing ───────────────────────────────────────────────────────

#[test]
fn output_is_identical_across_buffer_units() {
    let reference = render(&["input-unit=1024", "output-unit=64"], PAPER);
    for units in [["input-unit=1", "output-unit=1"], ["input-unit=7", "output-unit=3"], ["input-unit=65536", "output-unit=65536"]] {
        assert_eq!(render(&units, PAPER), reference, "{units:?}");
    }
}

#[test]
fn time_option_reports_rendering_time() {
    let config = resolve_default(["--time"]).unwrap();
    let output = convert(b"# Timed\n", &config).unwrap();
    let timing = output.timing.expect("timing requested");
    assert!(timing.to_string().starts_with("Time spent on rendering:"));
}

#[test]
fn nesting_limit_drops_deep_quotes() {
    let source = "> a\n> > b\n> > > c\n";
    let shallow = render(&["--no-style", "max-nesting=1"], source);
    assert_eq!(shallow.matches("<blockquote>").count(), 1, "{shallow}");
    let deep = render(&["--no-style"], source);
    assert_eq!(deep.matches("<blockquote>").count(), 3, "{deep}");
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[test]
fn option_errors_map_to_exit_status_1() {
    for tokens in [
        vec!["--tabels"],
        vec!["max-nesting=abc"],
        vec!["toc-level"],
        vec!["output-unit=0"],
    ] {
        let err = resolve_default(&tokens).unwrap_err();
        assert_eq!(err.exit_code(), 1, "{tokens:?}: {err}");
        assert!(err.is_option_error());
    }
}

#[test]
fn unknown_renderer_name_is_rejected() {
    let err = "pdf".parse::<RendererKind>().unwrap_err();
    assert!(matches!(err, ScidownError::InvalidConfig(_)));
}

#[test]
fn missing_input_file_maps_to_exit_status_5() {
    let err = convert_path(
        Some(std::path::Path::new("/definitely/not/here.md")),
        &ConversionConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn oversized_buffer_unit_maps_to_exit_status_4() {
    for token in ["output-unit=18446744073709551615", "input-unit=18446744073709551615"] {
        let config = resolve_default([token]).unwrap();
        let err = convert(b"# Hello\n", &config).unwrap_err();
        assert!(matches!(err, ScidownError::Allocation { .. }), "{token}: {err}");
        assert_eq!(err.exit_code(), 4, "{token}");
    }
}

// ── Files ────────────────────────────────────────────────────────────────────

#[test]
fn latex_file_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("paper.md");
    std::fs::File::create(&input)
        .unwrap()
        .write_all(PAPER.as_bytes())
        .unwrap();
    let target = dir.path().join("paper.tex");

    let config = ConversionConfig::builder()
        .renderer(RendererKind::Latex)
        .output_flags(OutputFlags::empty())
        .build()
        .unwrap();
    let output = convert_to_file(Some(&input), &target, &config).unwrap();

    let written = std::fs::read(&target).unwrap();
    assert_eq!(written, output.bytes);
    assert!(!String::from_utf8(written).unwrap().contains("\\documentclass"));
}

#[test]
fn resolved_config_serializes_to_json() {
    let config = resolve_default(["--latex", "--no-all-flags"]).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"renderer\":\"latex\""), "{json}");
    let back: ConversionConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
