//! CSV adapter between backlog files and stories.
//!
//! - **Delimiters**: `.tsv` inputs default to tab, everything else to comma;
//!   an explicit delimiter always wins.
//! - **Encoding**: input is decoded via `encoding_rs` (UTF-8 by default);
//!   output is always UTF-8.
//! - **stdin/stdout**: the `-` path reads stdin; no output path writes stdout.
//! - **Round trip**: output keeps the input header row verbatim and renders
//!   each cell through [`Story::format_value`].

use std::{
    collections::HashSet,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use log::debug;

use crate::{
    definition::{Definition, normalize_column_name},
    milestone::SprintSchedule,
    story::Story,
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// Headers as they appeared in the input plus the stories read from it.
#[derive(Debug, Clone)]
pub struct Backlog {
    pub headers: Vec<String>,
    pub stories: Vec<Story>,
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

pub fn resolve_delimiter(path: Option<&Path>, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if is_dash(path) {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("Opening backlog file {path:?}"))?;
    Ok(Box::new(BufReader::new(file)))
}

fn decode_field(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        bail!("Failed to decode text with encoding {}", encoding.name());
    }
    Ok(text.into_owned())
}

fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_field(field, encoding))
        .collect()
}

fn check_headers(headers: &[String], definition: &Definition) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(headers.len());
    for (position, header) in headers.iter().enumerate() {
        let name = normalize_column_name(header);
        if name.is_empty() {
            bail!("Header at position {} is empty", position + 1);
        }
        if !seen.insert(name.clone()) {
            bail!("Header '{header}' appears more than once");
        }
        normalized.push(name);
    }

    let missing = definition
        .columns()
        .into_iter()
        .filter(|column| !seen.contains(&column.normalized_name()))
        .map(|column| column.name)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        bail!("Backlog is missing defined column(s): {}", missing.iter().join(", "));
    }
    Ok(normalized)
}

pub fn read_stories<R: Read>(
    reader: R,
    definition: &Definition,
    schedule: Option<&SprintSchedule>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Backlog> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(reader);

    let headers = decode_record(csv_reader.byte_headers()?, encoding)?;
    let names = check_headers(&headers, definition)?;
    let factory = definition.story_factory();
    let mut stories = Vec::new();

    for (idx, record) in csv_reader.byte_records().enumerate() {
        let row_number = idx + 2;
        let record = record.with_context(|| format!("Reading row {row_number}"))?;
        let fields = decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {row_number}"))?;
        if fields.iter().all(|field| field.trim().is_empty()) {
            debug!("Skipping blank row {row_number}");
            continue;
        }

        let mut story = factory.create_story();
        story.set_row_number(row_number);
        for (name, value) in names.iter().zip(fields.iter()) {
            story
                .set_raw(name, value)
                .with_context(|| format!("Row {row_number}"))?;
        }
        if let Some(schedule) = schedule {
            story.resolve_milestones(schedule);
        }
        stories.push(story);
    }

    debug!("Read {} story(ies) across {} column(s)", stories.len(), headers.len());
    Ok(Backlog { headers, stories })
}

pub fn read_backlog(
    path: &Path,
    definition: &Definition,
    schedule: Option<&SprintSchedule>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Backlog> {
    let reader = open_input(path)?;
    read_stories(reader, definition, schedule, delimiter, encoding)
        .with_context(|| format!("Reading backlog from {path:?}"))
}

pub fn write_stories<W: Write>(
    writer: W,
    headers: &[String],
    stories: &[Story],
    delimiter: u8,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .double_quote(true)
        .from_writer(writer);
    csv_writer.write_record(headers)?;
    for story in stories {
        csv_writer.write_record(headers.iter().map(|header| story.format_value(header)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_backlog(
    path: Option<&Path>,
    headers: &[String],
    stories: &[Story],
    delimiter: u8,
) -> Result<()> {
    match path {
        Some(p) if !is_dash(p) => {
            let file = File::create(p).with_context(|| format!("Creating output file {p:?}"))?;
            write_stories(BufWriter::new(file), headers, stories, delimiter)
                .with_context(|| format!("Writing backlog to {p:?}"))
        }
        _ => write_stories(std::io::stdout().lock(), headers, stories, delimiter)
            .context("Writing backlog to stdout"),
    }
}
