use std::fmt::Write as _;

use anstyle::{AnsiColor, Color, Style};
use card_sync::Label;
use card_sync::sync::SyncReport;

struct Palette {
    bold: Style,
    synced: Style,
    unmatched: Style,
    notice: Style,
}

impl Palette {
    fn new(color: bool) -> Self {
        if !color {
            return Palette {
                bold: Style::new(),
                synced: Style::new(),
                unmatched: Style::new(),
                notice: Style::new(),
            };
        }
        Palette {
            bold: Style::new().bold(),
            synced: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))),
            unmatched: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            notice: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        }
    }
}

pub fn render_sync(report: &SyncReport, color: bool) -> String {
    let Palette {
        bold,
        synced,
        unmatched,
        notice,
    } = Palette::new(color);
    let summary = &report.summary;

    let mut out = String::new();
    if report.candidates == 0 {
        let _ = writeln!(out, "{synced}✓ Nothing to sync{synced:#}");
    }
    let _ = writeln!(out, "{bold}━━━ Summary ━━━{bold:#}");
    let _ = writeln!(
        out,
        "  Existing SHARED matches synced: {synced}{}{synced:#}",
        summary.existing_shared
    );
    let _ = writeln!(
        out,
        "  New SHARED set & synced:        {synced}{}{synced:#}",
        summary.new_shared
    );
    let _ = writeln!(
        out,
        "  No match in primary card:       {unmatched}{}{unmatched:#}",
        summary.no_match
    );
    if report.mode.is_dry_run() {
        let _ = writeln!(
            out,
            "\n{notice}DRY RUN was enabled; no real changes were made.{notice:#}"
        );
    }
    out
}

pub fn render_labels(labels: &[Label], sync_label: &str, color: bool) -> String {
    let Palette { bold, synced, .. } = Palette::new(color);

    let mut out = String::new();
    let _ = writeln!(out, "{bold}━━━ Labels ━━━{bold:#}");
    for label in labels {
        if label.is_named(sync_label) {
            let _ = writeln!(
                out,
                "  {synced}{:<12} {} (sync label){synced:#}",
                label.id.0, label.name
            );
        } else {
            let _ = writeln!(out, "  {:<12} {}", label.id.0, label.name);
        }
    }
    if !labels.iter().any(|label| label.is_named(sync_label)) {
        let _ = writeln!(out, "\nNo label named '{sync_label}' exists yet.");
    }
    out
}
