//! Rendering of the installed-state snapshot.

use std::io::Write;

use serde::Serialize;

/// Output style of `lsm list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ListStyle {
    #[default]
    Table,
    Json,
}

/// One row of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStatus {
    pub name: String,
    pub version: String,
    pub installed: bool,
}

impl ServerStatus {
    const COLUMNS: [&'static str; 3] = ["Name", "Version", "Installed"];

    fn cells(&self) -> [String; 3] {
        [
            self.name.clone(),
            self.version.clone(),
            self.installed.to_string(),
        ]
    }
}

pub fn render(
    statuses: &[ServerStatus],
    style: ListStyle,
    out: &mut impl Write,
) -> std::io::Result<()> {
    match style {
        ListStyle::Json => {
            serde_json::to_writer(&mut *out, statuses)?;
            writeln!(out)
        }
        ListStyle::Table => render_table(statuses, out),
    }
}

fn render_table(statuses: &[ServerStatus], out: &mut impl Write) -> std::io::Result<()> {
    let rows: Vec<[String; 3]> = statuses.iter().map(ServerStatus::cells).collect();

    let mut widths = ServerStatus::COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let separator = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!(" {cell:<width$} "))
            .collect::<Vec<_>>()
            .join("|")
    };

    writeln!(out, "+{separator}+")?;
    writeln!(out, "|{}|", line(&ServerStatus::COLUMNS))?;
    writeln!(out, "+{separator}+")?;
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        writeln!(out, "|{}|", line(&cells))?;
    }
    writeln!(out, "+{separator}+")
}
