//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`;
//! structured formats wrap the data in the standard response envelope;
//! plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use opensrs_core::{Ack, Envelope};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ───────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// "yes"/"no" cell, green or red when color is on.
pub fn yes_no(value: bool, color: bool) -> String {
    match (value, color) {
        (true, true) => "yes".green().to_string(),
        (false, true) => "no".red().to_string(),
        (true, false) => "yes".into(),
        (false, false) => "no".into(),
    }
}

// ── Render dispatchers ──────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact` / `yaml`: the list inside a success envelope
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
        structured => render_envelope(structured, &Envelope::ok(data)),
    }
}

/// Render a single item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Plain => id_fn(data),
        structured => render_envelope(structured, &Envelope::ok(data)),
    }
}

/// Render a bare acknowledgement. Table and plain modes print `message`
/// to stderr instead of anything on stdout.
pub fn render_ack(format: &OutputFormat, ack: &Ack, message: &str, quiet: bool) {
    if format.is_structured() {
        let env = Envelope::ok_with_response(ack, ack.response_code, &ack.response_text);
        print_output(&render_envelope(format, &env), quiet);
    } else if !quiet {
        eprintln!("✓ {message}");
    }
}

/// Serialize an envelope in one of the structured formats.
pub fn render_envelope<T: Serialize>(format: &OutputFormat, env: &T) -> String {
    match format {
        OutputFormat::JsonCompact => render_json_compact(env),
        OutputFormat::Yaml => render_yaml(env),
        _ => render_json_pretty(env),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Progress ────────────────────────────────────────────────────────

/// Spinner on stderr for slow calls; hidden when quiet or not a terminal.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ── Format-specific renderers ───────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json_pretty<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

fn render_json_compact<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Item {
        domain: String,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Domain")]
        domain: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                domain: "a.com".into(),
            },
            Item {
                domain: "b.net".into(),
            },
        ]
    }

    fn row(i: &Item) -> Row {
        Row {
            domain: i.domain.clone(),
        }
    }

    #[test]
    fn json_wraps_list_in_envelope() {
        let out = render_list(&OutputFormat::Json, &items(), row, |i| i.domain.clone());
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"][1]["domain"], "b.net");
    }

    #[test]
    fn plain_is_one_id_per_line() {
        let out = render_list(&OutputFormat::Plain, &items(), row, |i| i.domain.clone());
        assert_eq!(out, "a.com\nb.net");
    }

    #[test]
    fn table_has_header() {
        let out = render_list(&OutputFormat::Table, &items(), row, |i| i.domain.clone());
        assert!(out.contains("Domain"));
        assert!(out.contains("a.com"));
    }

    #[test]
    fn yes_no_without_color() {
        assert_eq!(yes_no(true, false), "yes");
        assert_eq!(yes_no(false, false), "no");
    }
}
