//! Plain-text rendering of compiled sections, for terminals and previews.
//! Paginated output is produced by an external renderer from the same list.

use std::fmt::Write as _;

use crate::section::{DocumentSection, SectionBody};

const RULE_WIDTH: usize = 72;

pub fn plain_text(sections: &[DocumentSection]) -> String {
    let mut out = String::new();
    for section in sections {
        if !out.is_empty() {
            out.push('\n');
        }
        render_body(&mut out, &section.body);
    }
    out
}

fn render_body(out: &mut String, body: &SectionBody) {
    match body {
        SectionBody::Title {
            document_type,
            testator,
        } => {
            let _ = writeln!(out, "{:^RULE_WIDTH$}", document_type);
            let _ = writeln!(out, "{:^RULE_WIDTH$}", format!("OF {testator}"));
            let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
        }
        SectionBody::KeyValueTable { heading, rows } => {
            heading_line(out, heading);
            rows_block(out, rows, 2);
        }
        SectionBody::RepeatedEntityBlock { heading, entries } => {
            heading_line(out, heading);
            for entry in entries {
                let _ = writeln!(out, "  {}", entry.title);
                rows_block(out, &entry.rows, 4);
            }
        }
        SectionBody::FreeTextClause { heading, text } => {
            heading_line(out, heading);
            for line in wrap(text, RULE_WIDTH - 2) {
                let _ = writeln!(out, "  {line}");
            }
        }
        SectionBody::SignatureBlock {
            warnings,
            attestation,
            lines,
            notarization,
            ..
        } => {
            if !warnings.is_empty() {
                heading_line(out, "Important Warnings");
                for warning in warnings {
                    for (i, line) in wrap(warning, RULE_WIDTH - 4).into_iter().enumerate() {
                        let bullet = if i == 0 { "-" } else { " " };
                        let _ = writeln!(out, "  {bullet} {line}");
                    }
                }
                out.push('\n');
            }
            heading_line(out, "Execution");
            for line in wrap(attestation, RULE_WIDTH - 2) {
                let _ = writeln!(out, "  {line}");
            }
            for line in lines {
                out.push('\n');
                let date = if line.dated { "   Date: ____________" } else { "" };
                let _ = writeln!(out, "  {}: ______________________________{date}", line.label);
                let printed = if line.printed_name.is_empty() {
                    "______________________________"
                } else {
                    line.printed_name.as_str()
                };
                let _ = writeln!(out, "  Printed name: {printed}");
            }
            if !notarization.is_empty() {
                out.push('\n');
                heading_line(out, "Notarization");
                let _ = writeln!(out, "  State of: ________________  County of: ________________");
                for line in wrap(notarization, RULE_WIDTH - 2) {
                    let _ = writeln!(out, "  {line}");
                }
                out.push('\n');
                let _ = writeln!(out, "  Notary Public: ______________________________");
                let _ = writeln!(out, "  My commission expires: ____________");
            }
        }
    }
}

fn heading_line(out: &mut String, heading: &str) {
    let _ = writeln!(out, "{}", heading.to_uppercase());
    let _ = writeln!(out, "{}", "-".repeat(heading.chars().count()));
}

fn rows_block(out: &mut String, rows: &[(String, String)], indent: usize) {
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, value) in rows {
        let _ = writeln!(
            out,
            "{:indent$}{:<width$}  {value}",
            "",
            format!("{label}:"),
            width = width + 1
        );
    }
}

/// Greedy word wrap; words longer than `width` get their own line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}
