//! CLI binary for scidown.
//!
//! A thin shim over the library crate. Fixed options come from the derived
//! [`Cli`]; the order-sensitive toggles (renderer selectors, numeric
//! options, extensions, categories and output flags) are generated from the
//! flag registry and handed to the resolver in command-line order, so the
//! last occurrence of contradictory options wins.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, CommandFactory, FromArgMatches, Parser};
use scidown::config::RendererKind;
use scidown::error::{ScidownError, EXIT_OPTION};
use scidown::flags::{CATEGORIES, CATEGORY_PREFIX, NEGATIVE_PREFIX, OUTPUT_FLAGS};
use scidown::options::{NumericOption, TIME_OPTION};
use scidown::{resolve_default, Converter, HtmlTemplate, Localization};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const MAIN_HEADING: &str = "Main options";
const OUTPUT_HEADING: &str = "Output flags";

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render to HTML on stdout
  scidown paper.md

  # LaTeX with a three-level table of contents
  scidown --latex -t 3 paper.md --output-file paper.tex

  # Span extensions except autolinking, timed
  scidown --all-span --no-autolink -T paper.md

  # Inspect the resolved configuration
  scidown --no-all-flags --xhtml --dump-config

NEGATION:
  Every extension, category and output flag has a --no- form, e.g.
  --no-tables, --no-all-span, --no-style. Options are applied in order, so
  for contradictory options the last one wins.

EXIT STATUS:
  0  success
  1  invalid option
  4  memory allocation failure
  5  I/O failure
"#;

/// Render Markdown to HTML or LaTeX.
#[derive(Parser, Debug)]
#[command(
    name = "scidown",
    version,
    about = "Render Markdown to HTML or LaTeX",
    disable_version_flag = true,
    args_override_self = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file to render; `-` or nothing reads standard input.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write the rendered document to this file instead of stdout.
    #[arg(long, env = "SCIDOWN_OUTPUT_FILE", value_name = "PATH")]
    output_file: Option<PathBuf>,

    /// Replace the HTML prologue with the contents of this file.
    #[arg(long, env = "SCIDOWN_HTML_HEAD", value_name = "PATH")]
    html_head: Option<PathBuf>,

    /// Replace the HTML epilogue with the contents of this file.
    #[arg(long, env = "SCIDOWN_HTML_TAIL", value_name = "PATH")]
    html_tail: Option<PathBuf>,

    /// Caption name for figures.
    #[arg(long, env = "SCIDOWN_FIGURE_LABEL", value_name = "TEXT")]
    figure_label: Option<String>,

    /// Caption name for code listings.
    #[arg(long, env = "SCIDOWN_LISTING_LABEL", value_name = "TEXT")]
    listing_label: Option<String>,

    /// Caption name for tables.
    #[arg(long, env = "SCIDOWN_TABLE_LABEL", value_name = "TEXT")]
    table_label: Option<String>,

    /// Print the resolved configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(long, env = "SCIDOWN_VERBOSE")]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(long, env = "SCIDOWN_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn localization(&self) -> Localization {
        let defaults = Localization::default();
        Localization {
            figure: self.figure_label.clone().unwrap_or(defaults.figure),
            listing: self.listing_label.clone().unwrap_or(defaults.listing),
            table: self.table_label.clone().unwrap_or(defaults.table),
        }
    }
}

// ── Command construction ─────────────────────────────────────────────────

fn toggle(id: impl Into<String>, help: impl Into<String>, heading: &'static str) -> Arg {
    let id = id.into();
    Arg::new(id.clone())
        .long(id)
        .action(ArgAction::SetTrue)
        .help(help.into())
        .help_heading(heading)
}

fn negated(name: &str, heading: &'static str) -> Arg {
    toggle(format!("{NEGATIVE_PREFIX}{name}"), format!("Disable --{name}."), heading).hide(true)
}

fn numeric(option: NumericOption, short: char, help: &'static str) -> Arg {
    Arg::new(option.option_name())
        .short(short)
        .long(option.option_name())
        .value_name("N")
        .action(ArgAction::Append)
        .help(help)
        .help_heading(MAIN_HEADING)
}

/// The full command: derived options plus registry-generated toggles.
fn build_command() -> Command {
    let mut cmd = Cli::command()
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Print version information and exit."),
        )
        .arg(numeric(
            NumericOption::MaxNesting,
            'n',
            "Maximum level of block nesting parsed. Default is 16.",
        ))
        .arg(numeric(
            NumericOption::TocLevel,
            't',
            "Maximum level for headers included in the TOC. Zero disables TOC (the default).",
        ))
        .arg(numeric(
            NumericOption::InputUnit,
            'i',
            "Reading block size. Default is 1024.",
        ))
        .arg(numeric(
            NumericOption::OutputUnit,
            'o',
            "Writing block size. Default is 64.",
        ));

    for kind in RendererKind::ALL {
        cmd = cmd.arg(toggle(kind.option_name(), kind.description(), MAIN_HEADING));
    }
    cmd = cmd.arg(
        toggle(TIME_OPTION, "Show time spent in rendering.", MAIN_HEADING).short('T'),
    );

    for category in CATEGORIES {
        let all = format!("{CATEGORY_PREFIX}{}", category.option_name);
        cmd = cmd
            .arg(toggle(
                all.clone(),
                format!("Enable all {}.", category.label.to_lowercase()),
                category.label,
            ))
            .arg(negated(&all, category.label));
        for ext in category.extensions() {
            cmd = cmd
                .arg(toggle(ext.option_name, ext.description, category.label))
                .arg(negated(ext.option_name, category.label));
        }
    }

    for flag in OUTPUT_FLAGS {
        cmd = cmd
            .arg(toggle(flag.option_name, flag.description, OUTPUT_HEADING))
            .arg(negated(flag.option_name, OUTPUT_HEADING));
    }
    cmd
}

/// Ids of every order-sensitive switch, positive and negated.
fn toggle_ids() -> Vec<String> {
    let mut ids: Vec<String> = RendererKind::ALL
        .iter()
        .map(|k| k.option_name().to_string())
        .collect();
    ids.push(TIME_OPTION.to_string());
    for name in scidown::flags::option_names() {
        ids.push(format!("{NEGATIVE_PREFIX}{name}"));
        ids.push(name);
    }
    ids
}

/// Position of the last command-line occurrence of `id`.
fn last_index(matches: &ArgMatches, id: &str) -> Option<usize> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    matches.indices_of(id)?.max()
}

/// Resolver tokens in the order they appeared on the command line.
fn ordered_tokens(matches: &ArgMatches) -> Vec<String> {
    let mut tokens: Vec<(usize, String)> = Vec::new();
    // Every occurrence of a numeric option is kept: each value is parsed,
    // so an earlier malformed one must still be reported.
    for option in NumericOption::ALL {
        let name = option.option_name();
        if matches.value_source(name) != Some(ValueSource::CommandLine) {
            continue;
        }
        if let (Some(indices), Some(values)) =
            (matches.indices_of(name), matches.get_many::<String>(name))
        {
            for (index, value) in indices.zip(values) {
                tokens.push((index, format!("{name}={value}")));
            }
        }
    }
    for id in toggle_ids() {
        if let Some(index) = last_index(matches, &id) {
            tokens.push((index, id));
        }
    }
    tokens.sort_by_key(|(index, _)| *index);
    tokens.into_iter().map(|(_, token)| token).collect()
}

// ── Entry point ──────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let matches = match build_command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_OPTION,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err
                .downcast_ref::<ScidownError>()
                .map(ScidownError::exit_code)
                .unwrap_or(EXIT_OPTION);
            ExitCode::from(code)
        }
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let cli = Cli::from_arg_matches(matches).context("Failed to read command line")?;

    // ── Logging setup ────────────────────────────────────────────────────
    // stdout carries the document, so library logs stay on stderr and
    // default to warnings only.
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Resolve options ──────────────────────────────────────────────────
    let tokens = ordered_tokens(matches);
    let config = resolve_default(&tokens).context("Invalid options")?;

    if cli.dump_config {
        println!(
            "{}",
            serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?
        );
        return Ok(());
    }

    let template = HtmlTemplate::from_files(cli.html_head.as_deref(), cli.html_tail.as_deref())
        .context("Failed to load HTML template")?;
    let converter = Converter::new()
        .localization(cli.localization())
        .template(template);

    // ── Run conversion ───────────────────────────────────────────────────
    let output = if let Some(ref output_path) = cli.output_file {
        converter
            .convert_to_file(cli.input.as_deref(), output_path, &config)
            .context("Conversion failed")?
    } else {
        let output = converter
            .convert_path(cli.input.as_deref(), &config)
            .context("Conversion failed")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(&output.bytes)
            .and_then(|()| handle.flush())
            .map_err(|source| ScidownError::OutputWrite {
                path: PathBuf::from("<stdout>"),
                source,
            })
            .context("Failed to write to stdout")?;
        output
    };

    if let Some(timing) = output.timing {
        eprintln!("{timing}");
    }
    Ok(())
}
