//! Output rendering
//!
//! Requirements lines in resolution order, `.env` / `.env.sample` files in
//! first-seen order. Writing never clobbers an existing file unless forced.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::{ConfigError, ConfigResult};
use crate::features::env_extraction::EnvVarRecord;
use crate::shared::models::{Package, ReqscanError, Result};

/// Version operator used in requirement lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinStyle {
    /// `name==1.2.3`
    #[default]
    Exact,
    /// `name~=1.2.3`
    Compat,
    /// `name>=1.2.3`
    Gt,
    /// `name`
    NoPin,
}

impl PinStyle {
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "compat" => Ok(Self::Compat),
            "gt" => Ok(Self::Gt),
            "no-pin" | "nopin" | "none" => Ok(Self::NoPin),
            _ => Err(ConfigError::UnknownPinStyle(s.to_string())),
        }
    }

    fn operator(&self) -> Option<&'static str> {
        match self {
            Self::Exact => Some("=="),
            Self::Compat => Some("~="),
            Self::Gt => Some(">="),
            Self::NoPin => None,
        }
    }
}

impl fmt::Display for PinStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exact => "exact",
            Self::Compat => "compat",
            Self::Gt => "gt",
            Self::NoPin => "no-pin",
        };
        write!(f, "{}", name)
    }
}

/// Which env file to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFileKind {
    /// `.env`: defaults filled in
    Populated,
    /// `.env.sample`: every value blank
    Sample,
}

/// One requirement line per package
pub fn render_requirements(packages: &[Package], style: PinStyle) -> String {
    let mut out = String::new();
    for package in packages {
        out.push_str(&package.distribution_name);
        if let Some(op) = style.operator() {
            if package.has_known_version() {
                out.push_str(op);
                out.push_str(&package.version);
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_env(records: &[EnvVarRecord], kind: EnvFileKind) -> String {
    let mut out = String::new();
    for record in records {
        if record.required {
            out.push_str("# required\n");
        }
        let value = match kind {
            EnvFileKind::Populated => record.default.as_deref().unwrap_or(""),
            EnvFileKind::Sample => "",
        };
        out.push_str(&record.name);
        out.push('=');
        out.push_str(&env_value(value));
        out.push('\n');
    }
    out
}

/// Double-quote values dotenv readers would otherwise split or truncate
fn env_value(value: &str) -> Cow<'_, str> {
    let plain = value
        .chars()
        .all(|c| !c.is_whitespace() && !matches!(c, '#' | '=' | '"' | '\'' | '\\' | '$' | '`'));
    if plain {
        return Cow::Borrowed(value);
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '$' => quoted.push_str("\\$"),
            '`' => quoted.push_str("\\`"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Write `contents` to `path`; an existing file is only replaced with `force`
pub fn write_output(path: &Path, contents: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ReqscanError::io("output file already exists (use --force to overwrite)")
            .with_file(path.display().to_string()));
    }
    fs::write(path, contents).map_err(|e| {
        ReqscanError::io(format!("cannot write output: {}", e))
            .with_file(path.display().to_string())
            .with_source(e)
    })?;
    info!(path = %path.display(), bytes = contents.len(), "output written");
    Ok(())
}
