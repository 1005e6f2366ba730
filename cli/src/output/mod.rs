//! Operator-facing terminal output.
//!
//! Progress and result lines go to stdout and are dropped under `--quiet`;
//! the failure line goes to stderr so it survives `--quiet` and sits after
//! the tool's own diagnostics.

pub mod json;
pub mod logging;
pub mod reporter;
pub mod styles;

use std::fmt::Display;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Styling and verbosity shared by every command.
pub struct OutputContext {
    pub styles: Styles,
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a terminal and never with `no_color`, which
    /// clap also sets from `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let mut styles = Styles::default();
        if !no_color && Term::stdout().is_term() {
            styles.colorize();
        }
        Self { styles, quiet }
    }

    fn line(&self, symbol: &str, style: Style, msg: impl Display) {
        if !self.quiet {
            println!("  {} {msg}", symbol.style(style));
        }
    }

    /// `→ Refreshing package index (apt-get update)`
    pub fn step(&self, msg: &str) {
        self.line("→", self.styles.step, msg);
    }

    pub fn success(&self, msg: &str) {
        self.line("✓", self.styles.success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line("⚠", self.styles.warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.line("ℹ", self.styles.info, msg);
    }

    /// Failure summary on stderr. Printed even when `quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// One plan or doctor row: dimmed label, then the value.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}
