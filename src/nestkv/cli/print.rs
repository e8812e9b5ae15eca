use super::setup::OutputFormat;
use chrono::{DateTime, Utc};
use colored::Colorize;
use nestkv::commands::{CmdMessage, MessageLevel, Record};
use nestkv::error::Result;
use nestkv::name::Rendered;
use nestkv::store::{BucketStats, BucketStructure, DbStats};
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use timeago::Formatter;
use unicode_width::UnicodeWidthStr;

const LABEL_GAP: usize = 2;
const TREE_INDENT: &str = "  ";

/// Writes one listed name. Binary names are written byte for byte.
pub(super) fn write_name<W: Write>(
    out: &mut W,
    name: &Rendered,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            out.write_all(name.as_bytes())?;
            out.write_all(b"\n")?;
        }
        OutputFormat::Json => write_json_line(out, name)?,
    }
    Ok(())
}

pub(super) fn write_record<W: Write>(
    out: &mut W,
    record: &Record,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            out.write_all(record.key.as_bytes())?;
            out.write_all(b"\t")?;
            out.write_all(record.value.as_bytes())?;
            out.write_all(b"\n")?;
        }
        OutputFormat::Json => write_json_line(out, record)?,
    }
    Ok(())
}

/// Writes a single value. Raw values are written exactly, with no trailing
/// newline, so `get` can be redirected into a file.
pub(super) fn write_value<W: Write>(
    out: &mut W,
    value: &Rendered,
    format: OutputFormat,
) -> Result<()> {
    match (format, value) {
        (OutputFormat::Text, Rendered::Binary(bytes)) => out.write_all(bytes)?,
        (OutputFormat::Text, Rendered::Text(text)) => writeln!(out, "{}", text)?,
        (OutputFormat::Json, value) => write_json_line(out, value)?,
    }
    Ok(())
}

fn write_json_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}

pub(super) fn print_messages(messages: &[CmdMessage], format: OutputFormat) {
    for message in messages {
        if format == OutputFormat::Json {
            let level = match message.level {
                MessageLevel::Info => "info",
                MessageLevel::Success => "success",
                MessageLevel::Warning => "warning",
            };
            println!("{}", json!({ "level": level, "message": message.content }));
            continue;
        }
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn write_db_stats<W: Write>(
    out: &mut W,
    stats: &DbStats,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json_line(out, stats);
    }
    let modified = stats
        .modified
        .map(|m| format!("{} ({})", m.format("%Y-%m-%d %H:%M:%S"), format_time_ago(m)))
        .unwrap_or_else(|| "never".to_string());
    let mut rows = vec![
        ("Path", stats.path.clone()),
        ("File size", format!("{} bytes", stats.file_size)),
        ("Modified", modified),
    ];
    rows.extend(bucket_rows(&stats.root));
    write_table(out, &rows)
}

pub(super) fn write_bucket_stats<W: Write>(
    out: &mut W,
    stats: &BucketStats,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json_line(out, stats);
    }
    write_table(out, &bucket_rows(stats))
}

fn bucket_rows(stats: &BucketStats) -> Vec<(&'static str, String)> {
    vec![
        ("Keys", stats.key_n.to_string()),
        ("Buckets", stats.bucket_n.to_string()),
        ("Depth", stats.depth.to_string()),
        ("Key bytes", stats.key_bytes.to_string()),
        ("Value bytes", stats.value_bytes.to_string()),
    ]
}

fn write_table<W: Write>(out: &mut W, rows: &[(&str, String)]) -> Result<()> {
    let width = rows.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
    for (label, value) in rows {
        let padding = width - label.width() + LABEL_GAP;
        writeln!(out, "{}:{}{}", label.bold(), " ".repeat(padding), value)?;
    }
    Ok(())
}

pub(super) fn write_structure<W: Write>(
    out: &mut W,
    structure: &BucketStructure,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json_line(out, structure);
    }
    write_tree(out, structure, 0)
}

fn write_tree<W: Write>(out: &mut W, node: &BucketStructure, depth: usize) -> Result<()> {
    let keys = match node.key_n {
        1 => "1 key".to_string(),
        n => format!("{} keys", n),
    };
    writeln!(
        out,
        "{}{} {}",
        TREE_INDENT.repeat(depth),
        node.name.cyan(),
        format!("({})", keys).dimmed()
    )?;
    for child in &node.children {
        write_tree(out, child, depth + 1)?;
    }
    Ok(())
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
