//! The flag registry: every extension, category and output flag the
//! converter understands, with its bit and canonical option name.
//!
//! The tables are compiled in and never mutated. Extension bits and output
//! flag bits live in two independent spaces ([`Extensions`] and
//! [`OutputFlags`]); categories are named unions of extension bits that can be
//! toggled in bulk with `all-<category>`.
//!
//! Name resolution goes through [`lookup`], which also understands the
//! negated form of every name (`no-tables`, `no-all-span`, `no-escape`).
//! Negation is polarity on the match, not a separate registry entry.

use bitflags::bitflags;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Prefix that turns a category name into its bulk-toggle option.
pub const CATEGORY_PREFIX: &str = "all-";
/// Prefix that negates any resolvable name.
pub const NEGATIVE_PREFIX: &str = "no-";

bitflags! {
    /// Markdown parsing extensions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct Extensions: u32 {
        // block
        const TABLES = 1 << 0;
        const FENCED_CODE = 1 << 1;
        const FOOTNOTES = 1 << 2;

        // span
        const AUTOLINK = 1 << 3;
        const STRIKETHROUGH = 1 << 4;
        const UNDERLINE = 1 << 5;
        const HIGHLIGHT = 1 << 6;
        const QUOTE = 1 << 7;
        const SUPERSCRIPT = 1 << 8;
        const MATH = 1 << 9;

        // other flags
        const NO_INTRA_EMPHASIS = 1 << 11;
        const SPACE_HEADERS = 1 << 12;
        const MATH_EXPLICIT = 1 << 13;
        const SCI = 1 << 15;

        // negative flags
        const DISABLE_INDENTED_CODE = 1 << 14;

        const BLOCK = Self::TABLES.bits()
            | Self::FENCED_CODE.bits()
            | Self::FOOTNOTES.bits();
        const SPAN = Self::AUTOLINK.bits()
            | Self::STRIKETHROUGH.bits()
            | Self::UNDERLINE.bits()
            | Self::HIGHLIGHT.bits()
            | Self::QUOTE.bits()
            | Self::SUPERSCRIPT.bits()
            | Self::MATH.bits();
        const FLAGS = Self::NO_INTRA_EMPHASIS.bits()
            | Self::SPACE_HEADERS.bits()
            | Self::MATH_EXPLICIT.bits()
            | Self::SCI.bits();
        const NEGATIVE = Self::DISABLE_INDENTED_CODE.bits();
    }
}

bitflags! {
    /// Output-format specific rendering behaviour.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct OutputFlags: u32 {
        const SKIP_HTML = 1 << 0;
        const ESCAPE = 1 << 1;
        const HARD_WRAP = 1 << 2;
        const USE_XHTML = 1 << 3;
        const MERMAID = 1 << 4;
        const GNUPLOT = 1 << 5;
        const CHARTER = 1 << 6;
        const STYLE = 1 << 7;
    }
}

/// A named group of extensions toggled together with `all-<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub flags: Extensions,
    pub option_name: &'static str,
    pub label: &'static str,
}

impl CategoryInfo {
    /// Member extensions, in table order.
    pub fn extensions(&self) -> impl Iterator<Item = &'static ExtensionInfo> + '_ {
        EXTENSIONS
            .iter()
            .filter(move |ext| self.flags.contains(ext.flag))
    }
}

/// A single parsing extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionInfo {
    pub flag: Extensions,
    pub option_name: &'static str,
    pub description: &'static str,
}

/// A single output flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFlagInfo {
    pub flag: OutputFlags,
    pub option_name: &'static str,
    pub description: &'static str,
}

pub static CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo {
        flags: Extensions::BLOCK,
        option_name: "block",
        label: "Block extensions",
    },
    CategoryInfo {
        flags: Extensions::SPAN,
        option_name: "span",
        label: "Span extensions",
    },
    CategoryInfo {
        flags: Extensions::FLAGS,
        option_name: "flags",
        label: "Other flags",
    },
    CategoryInfo {
        flags: Extensions::NEGATIVE,
        option_name: "negative",
        label: "Negative flags",
    },
];

pub static EXTENSIONS: &[ExtensionInfo] = &[
    ExtensionInfo {
        flag: Extensions::TABLES,
        option_name: "tables",
        description: "Parse PHP-Markdown style tables.",
    },
    ExtensionInfo {
        flag: Extensions::FENCED_CODE,
        option_name: "fenced-code",
        description: "Parse fenced code blocks.",
    },
    ExtensionInfo {
        flag: Extensions::FOOTNOTES,
        option_name: "footnotes",
        description: "Parse footnotes.",
    },
    ExtensionInfo {
        flag: Extensions::AUTOLINK,
        option_name: "autolink",
        description: "Automatically turn safe URLs into links.",
    },
    ExtensionInfo {
        flag: Extensions::STRIKETHROUGH,
        option_name: "strikethrough",
        description: "Parse ~~strikethrough~~ spans.",
    },
    ExtensionInfo {
        flag: Extensions::UNDERLINE,
        option_name: "underline",
        description: "Parse _underline_ instead of emphasis.",
    },
    ExtensionInfo {
        flag: Extensions::HIGHLIGHT,
        option_name: "highlight",
        description: "Parse ==highlight== spans.",
    },
    ExtensionInfo {
        flag: Extensions::QUOTE,
        option_name: "quote",
        description: "Render \"quotes\" as <q>quotes</q>.",
    },
    ExtensionInfo {
        flag: Extensions::SUPERSCRIPT,
        option_name: "superscript",
        description: "Parse super^script.",
    },
    ExtensionInfo {
        flag: Extensions::MATH,
        option_name: "math",
        description: "Parse TeX $$math$$ syntax, Kramdown style.",
    },
    ExtensionInfo {
        flag: Extensions::NO_INTRA_EMPHASIS,
        option_name: "disable-intra-emphasis",
        description: "Disable emphasis_between_words.",
    },
    ExtensionInfo {
        flag: Extensions::SPACE_HEADERS,
        option_name: "space-headers",
        description: "Require a space after '#' in headers.",
    },
    ExtensionInfo {
        flag: Extensions::MATH_EXPLICIT,
        option_name: "math-explicit",
        description: "Instead of guessing by context, parse $inline math$ and $$always block math$$ (requires --math).",
    },
    ExtensionInfo {
        flag: Extensions::SCI,
        option_name: "scidown",
        description: "SciDown extension.",
    },
    ExtensionInfo {
        flag: Extensions::DISABLE_INDENTED_CODE,
        option_name: "disable-indented-code",
        description: "Don't parse indented code blocks.",
    },
];

pub static OUTPUT_FLAGS: &[OutputFlagInfo] = &[
    OutputFlagInfo {
        flag: OutputFlags::SKIP_HTML,
        option_name: "skip-html",
        description: "Strip all HTML tags.",
    },
    OutputFlagInfo {
        flag: OutputFlags::ESCAPE,
        option_name: "escape",
        description: "Escape all HTML.",
    },
    OutputFlagInfo {
        flag: OutputFlags::HARD_WRAP,
        option_name: "hard-wrap",
        description: "Render each linebreak as <br>.",
    },
    OutputFlagInfo {
        flag: OutputFlags::USE_XHTML,
        option_name: "xhtml",
        description: "Render XHTML.",
    },
    OutputFlagInfo {
        flag: OutputFlags::MERMAID,
        option_name: "mermaid",
        description: "Render mermaid diagrams.",
    },
    OutputFlagInfo {
        flag: OutputFlags::GNUPLOT,
        option_name: "gnuplot",
        description: "Render gnuplot plots.",
    },
    OutputFlagInfo {
        flag: OutputFlags::CHARTER,
        option_name: "charter",
        description: "Render charter charts.",
    },
    OutputFlagInfo {
        flag: OutputFlags::STYLE,
        option_name: "style",
        description: "Emit a standalone document with the configured style sheet.",
    },
];

/// What a resolved option name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagTarget {
    Extension(Extensions),
    OutputFlag(OutputFlags),
    Category(Extensions),
}

/// A registry hit: the target and whether the name enables or disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagMatch {
    pub target: FlagTarget,
    pub enable: bool,
}

static NAME_INDEX: Lazy<HashMap<String, FlagTarget>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for category in CATEGORIES {
        index.insert(
            format!("{CATEGORY_PREFIX}{}", category.option_name),
            FlagTarget::Category(category.flags),
        );
    }
    for ext in EXTENSIONS {
        index.insert(ext.option_name.to_string(), FlagTarget::Extension(ext.flag));
    }
    for flag in OUTPUT_FLAGS {
        index.insert(flag.option_name.to_string(), FlagTarget::OutputFlag(flag.flag));
    }
    index
});

/// Resolve an option name (without leading dashes) against the registry.
///
/// Returns `None` when the name, with or without the `no-` prefix, matches
/// nothing.
pub fn lookup(name: &str) -> Option<FlagMatch> {
    if let Some(&target) = NAME_INDEX.get(name) {
        return Some(FlagMatch {
            target,
            enable: true,
        });
    }
    let positive = name.strip_prefix(NEGATIVE_PREFIX)?;
    NAME_INDEX.get(positive).map(|&target| FlagMatch {
        target,
        enable: false,
    })
}

/// Every positive option name the registry resolves, categories first.
pub fn option_names() -> impl Iterator<Item = String> {
    CATEGORIES
        .iter()
        .map(|c| format!("{CATEGORY_PREFIX}{}", c.option_name))
        .chain(EXTENSIONS.iter().map(|e| e.option_name.to_string()))
        .chain(OUTPUT_FLAGS.iter().map(|f| f.option_name.to_string()))
}
