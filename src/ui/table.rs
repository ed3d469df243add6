// Tue Jan 13 2026 - Alex

use crate::validation::{ProfileTable, ValidationSummary};
use colored::*;
use std::cmp::max;

pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
    alignment: Vec<Alignment>,
    use_color: bool,
    border_style: BorderStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Ascii,
    Unicode,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            column_widths: Vec::new(),
            alignment: Vec::new(),
            use_color: true,
            border_style: BorderStyle::Unicode,
        }
    }

    pub fn with_headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|s| s.to_string()).collect();
        self.column_widths = self.headers.iter().map(|h| h.chars().count()).collect();
        self.alignment = vec![Alignment::Left; self.headers.len()];
        self
    }

    pub fn add_row<T: std::fmt::Display>(mut self, row: &[T]) -> Self {
        let string_row: Vec<String> = row.iter().map(|c| c.to_string()).collect();

        for (i, cell) in string_row.iter().enumerate() {
            let width = cell.chars().count();
            if i < self.column_widths.len() {
                self.column_widths[i] = max(self.column_widths[i], width);
            } else {
                self.column_widths.push(width);
                self.alignment.push(Alignment::Left);
            }
        }

        self.rows.push(string_row);
        self
    }

    pub fn with_alignment(mut self, column: usize, alignment: Alignment) -> Self {
        if column < self.alignment.len() {
            self.alignment[column] = alignment;
        }
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn with_border_style(mut self, style: BorderStyle) -> Self {
        self.border_style = style;
        self
    }

    pub fn build(&self) -> String {
        if self.headers.is_empty() && self.rows.is_empty() {
            return String::new();
        }

        let chars = match self.border_style {
            BorderStyle::Ascii => BorderChars::ascii(),
            BorderStyle::Unicode => BorderChars::unicode(),
        };

        let mut output = Vec::new();
        output.push(self.build_line(&chars, LinePosition::Top));

        if !self.headers.is_empty() {
            output.push(self.build_row(&self.headers, &chars, true));
            output.push(self.build_line(&chars, LinePosition::Middle));
        }

        for row in &self.rows {
            output.push(self.build_row(row, &chars, false));
        }

        output.push(self.build_line(&chars, LinePosition::Bottom));
        output.join("\n")
    }

    fn build_row(&self, cells: &[String], chars: &BorderChars, is_header: bool) -> String {
        let mut line = chars.vertical.to_string();

        for (i, &width) in self.column_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let aligned = match self.alignment.get(i).copied().unwrap_or(Alignment::Left) {
                Alignment::Left => format!("{:<width$}", cell, width = width),
                Alignment::Right => format!("{:>width$}", cell, width = width),
            };

            let formatted = if is_header && self.use_color {
                aligned.bold().to_string()
            } else {
                aligned
            };

            line.push(' ');
            line.push_str(&formatted);
            line.push(' ');
            line.push(chars.vertical);
        }

        line
    }

    fn build_line(&self, chars: &BorderChars, position: LinePosition) -> String {
        let (left, middle, right) = match position {
            LinePosition::Top => (chars.top_left, chars.top_middle, chars.top_right),
            LinePosition::Middle => (chars.middle_left, chars.middle_middle, chars.middle_right),
            LinePosition::Bottom => (chars.bottom_left, chars.bottom_middle, chars.bottom_right),
        };

        let segments: Vec<String> = self
            .column_widths
            .iter()
            .map(|&width| chars.horizontal.to_string().repeat(width + 2))
            .collect();

        format!("{}{}{}", left, segments.join(middle.to_string().as_str()), right)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum LinePosition {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy)]
struct BorderChars {
    horizontal: char,
    vertical: char,
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    top_middle: char,
    bottom_middle: char,
    middle_left: char,
    middle_right: char,
    middle_middle: char,
}

impl BorderChars {
    fn ascii() -> Self {
        Self {
            horizontal: '-',
            vertical: '|',
            top_left: '+',
            top_right: '+',
            bottom_left: '+',
            bottom_right: '+',
            top_middle: '+',
            bottom_middle: '+',
            middle_left: '+',
            middle_right: '+',
            middle_middle: '+',
        }
    }

    fn unicode() -> Self {
        Self {
            horizontal: '─',
            vertical: '│',
            top_left: '┌',
            top_right: '┐',
            bottom_left: '└',
            bottom_right: '┘',
            top_middle: '┬',
            bottom_middle: '┴',
            middle_left: '├',
            middle_right: '┤',
            middle_middle: '┼',
        }
    }
}

/// Per-protocol breakdown of a validation run.
pub fn protocol_table(summary: &ValidationSummary, use_color: bool) -> String {
    let mut table = TableBuilder::new()
        .with_headers(&["Protocol", "Records", "Invalid", "Mean invalid header diff"])
        .with_alignment(1, Alignment::Right)
        .with_alignment(2, Alignment::Right)
        .with_alignment(3, Alignment::Right)
        .with_color(use_color);

    for (name, breakdown) in &summary.protocols {
        let label = if name.is_empty() { "<none>" } else { name.as_str() };
        let mean = breakdown
            .mean_invalid_header_diff
            .map(|m| format!("{:.2}", m))
            .unwrap_or_else(|| "-".to_string());
        table = table.add_row(&[
            label.to_string(),
            breakdown.records.to_string(),
            breakdown.invalid_count.to_string(),
            mean,
        ]);
    }

    table.build()
}

/// The effective profile table, fallback last.
pub fn profile_table(profiles: &ProfileTable, use_color: bool) -> String {
    let mut table = TableBuilder::new()
        .with_headers(&["Protocol", "Header min", "Header max", "Payload min", "Payload max"])
        .with_color(use_color);
    for column in 1..5 {
        table = table.with_alignment(column, Alignment::Right);
    }

    let mut entries: Vec<(&str, _)> = profiles.iter().collect();
    if let Some(fallback) = profiles.fallback.as_ref() {
        entries.push(("<fallback>", fallback));
    }

    for (name, profile) in entries {
        table = table.add_row(&[
            name.to_string(),
            profile.header_min.to_string(),
            profile.header_max.to_string(),
            profile.payload_min.to_string(),
            profile.payload_max.to_string(),
        ]);
    }

    table.build()
}
