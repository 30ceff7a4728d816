//! Option resolution: fold an ordered token sequence over a baseline
//! [`ConversionConfig`].
//!
//! Tokens are processed strictly in order and each one overwrites whatever
//! earlier tokens said about the same bit or field, so for contradictory
//! options the last one stands (`--tables --no-tables` leaves tables off).
//!
//! Accepted token shapes, each with or without a leading `--`:
//!
//! | Token | Effect |
//! |-------|--------|
//! | `max-nesting=N`, `toc-level=N`, `input-unit=N`, `output-unit=N` | numeric field |
//! | `html`, `latex`, `html-toc` | renderer variant |
//! | `time` | timing report |
//! | `all-<category>` / `no-all-<category>` | whole category on/off |
//! | `<extension>` / `no-<extension>` | one extension bit |
//! | `<output-flag>` / `no-<output-flag>` | one output flag bit |
//!
//! Anything else aborts resolution with [`ScidownError::UnknownOption`].

use crate::config::{ConversionConfig, RendererKind};
use crate::error::ScidownError;
use crate::flags::{self, FlagTarget};
use std::str::FromStr;
use tracing::debug;

/// Numeric options accepted as `name=value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOption {
    MaxNesting,
    TocLevel,
    InputUnit,
    OutputUnit,
}

impl NumericOption {
    pub const ALL: [NumericOption; 4] = [
        NumericOption::MaxNesting,
        NumericOption::TocLevel,
        NumericOption::InputUnit,
        NumericOption::OutputUnit,
    ];

    pub fn option_name(self) -> &'static str {
        match self {
            NumericOption::MaxNesting => "max-nesting",
            NumericOption::TocLevel => "toc-level",
            NumericOption::InputUnit => "input-unit",
            NumericOption::OutputUnit => "output-unit",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.option_name() == name)
    }

    fn apply(self, config: &mut ConversionConfig, raw: &str) -> Result<(), ScidownError> {
        match self {
            NumericOption::MaxNesting => config.max_nesting = self.parse(raw)?,
            NumericOption::TocLevel => config.toc_level = self.parse(raw)?,
            NumericOption::InputUnit => config.input_unit = self.parse(raw)?,
            NumericOption::OutputUnit => config.output_unit = self.parse(raw)?,
        }
        Ok(())
    }

    fn parse<T: FromStr>(self, raw: &str) -> Result<T, ScidownError> {
        raw.trim().parse().map_err(|_| ScidownError::InvalidNumber {
            option: self.option_name().to_string(),
            value: raw.to_string(),
        })
    }
}

/// Name of the timing toggle token.
pub const TIME_OPTION: &str = "time";

/// Apply a single token to `config`.
pub fn apply_token(config: &mut ConversionConfig, token: &str) -> Result<(), ScidownError> {
    let name = token.strip_prefix("--").unwrap_or(token);

    if let Some((key, value)) = name.split_once('=') {
        return match NumericOption::from_name(key) {
            Some(opt) => opt.apply(config, value),
            None => Err(ScidownError::UnknownOption {
                token: token.to_string(),
            }),
        };
    }

    if let Some(opt) = NumericOption::from_name(name) {
        return Err(ScidownError::MissingValue {
            option: opt.option_name().to_string(),
        });
    }

    if let Ok(kind) = name.parse::<RendererKind>() {
        config.renderer = kind;
        return Ok(());
    }

    if name == TIME_OPTION {
        config.show_time = true;
        return Ok(());
    }

    let hit = flags::lookup(name).ok_or_else(|| ScidownError::UnknownOption {
        token: token.to_string(),
    })?;
    match (hit.target, hit.enable) {
        (FlagTarget::Category(mask) | FlagTarget::Extension(mask), true) => {
            config.extensions.insert(mask)
        }
        (FlagTarget::Category(mask) | FlagTarget::Extension(mask), false) => {
            config.extensions.remove(mask)
        }
        (FlagTarget::OutputFlag(flag), true) => config.output_flags.insert(flag),
        (FlagTarget::OutputFlag(flag), false) => config.output_flags.remove(flag),
    }
    Ok(())
}

/// Fold `tokens` over `baseline` and validate the result.
///
/// The first bad token aborts resolution; nothing is rendered before this
/// returns.
pub fn resolve<I, S>(baseline: ConversionConfig, tokens: I) -> Result<ConversionConfig, ScidownError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut config = baseline;
    for token in tokens {
        apply_token(&mut config, token.as_ref())?;
    }
    config.validate()?;
    debug!(
        renderer = %config.renderer,
        extensions = config.extensions.bits(),
        output_flags = config.output_flags.bits(),
        "options resolved"
    );
    Ok(config)
}

/// [`resolve`] starting from [`ConversionConfig::default`].
pub fn resolve_default<I, S>(tokens: I) -> Result<ConversionConfig, ScidownError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    resolve(ConversionConfig::default(), tokens)
}
