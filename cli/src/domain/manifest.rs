//! Dependency manifest parsing.
//!
//! Pure functions only: no I/O. The manifest is the newline-separated
//! requirements format understood by `pip install -r`: one specifier per
//! line, `#` comments, blank lines, and `\` line continuations. Lines that
//! start with `-` (options such as `-r other.txt` or `--index-url`), local
//! paths, archive files, and URLs are kept verbatim as installer directives.
//! Only a name followed by something no installer accepts is rejected.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::error::ManifestError;

#[allow(clippy::expect_used)] // compile-time constant pattern
static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?P<extras>\[[^\]]*\])?\s*(?P<rest>.*)$",
    )
    .expect("valid regex")
});

/// Tokens a version constraint, URL reference, environment marker, or
/// per-requirement option (`--hash=...`) may start with.
const CONSTRAINT_PREFIXES: &[&str] = &[
    "===", "==", ">=", "<=", "~=", "!=", "<", ">", "@", ";", "--",
];

/// Distribution archives the installer takes by file name.
const ARCHIVE_SUFFIXES: &[&str] = &[".whl", ".tar.gz", ".tgz", ".tar.bz2", ".zip"];

/// A named dependency with an optional version constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(extras) = &self.extras {
            f.write_str(extras)?;
        }
        if let Some(constraint) = &self.constraint {
            write!(f, "{constraint}")?;
        }
        Ok(())
    }
}

/// One meaningful manifest line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Requirement(Requirement),
    Directive { raw: String },
}

/// Parsed dependency manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub entries: Vec<Entry>,
}

impl Manifest {
    /// Parse manifest text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidLine`] for the first line that is
    /// neither a directive nor a well-formed specifier. `line` is 1-based and
    /// points at the first physical line of a continued logical line.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut entries = Vec::new();
        for (line, logical) in logical_lines(text) {
            let content = strip_comment(&logical).trim();
            if content.is_empty() {
                continue;
            }
            entries.push(parse_entry(content).ok_or_else(|| ManifestError::InvalidLine {
                line,
                content: content.to_string(),
            })?);
        }
        Ok(Self { entries })
    }

    /// `true` when the manifest declares nothing to install.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Requirement(r) => Some(r),
            Entry::Directive { .. } => None,
        })
    }
}

/// Join `\`-continued physical lines, keeping the starting line number.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;
    for (idx, raw) in text.lines().enumerate() {
        let (start, mut buf) = pending.take().unwrap_or((idx + 1, String::new()));
        if let Some(head) = raw.strip_suffix('\\') {
            buf.push_str(head);
            pending = Some((start, buf));
        } else {
            buf.push_str(raw);
            out.push((start, buf));
        }
    }
    if let Some(last) = pending {
        out.push(last);
    }
    out
}

/// A `#` starts a comment at line start or after whitespace.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

fn is_directive(content: &str) -> bool {
    content.starts_with(['-', '.', '~'])
        || content.contains('/')
        || ARCHIVE_SUFFIXES.iter().any(|s| content.ends_with(s))
}

fn parse_entry(content: &str) -> Option<Entry> {
    if is_directive(content) {
        return Some(Entry::Directive {
            raw: content.to_string(),
        });
    }
    let caps = REQUIREMENT_RE.captures(content)?;
    let rest = caps.name("rest").map_or("", |m| m.as_str().trim());
    let constraint = if rest.is_empty() {
        None
    } else if CONSTRAINT_PREFIXES.iter().any(|p| rest.starts_with(p)) {
        Some(rest.to_string())
    } else {
        return None;
    };
    Some(Entry::Requirement(Requirement {
        name: caps["name"].to_string(),
        extras: caps.name("extras").map(|m| m.as_str().to_string()),
        constraint,
    }))
}

/// Returns `true` if `name` is a valid distribution/package name.
#[must_use]
pub fn is_valid_package_name(name: &str) -> bool {
    REQUIREMENT_RE
        .captures(name)
        .is_some_and(|c| c.name("extras").is_none() && c["rest"].is_empty())
}
