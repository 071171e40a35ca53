use std::fs;
use std::io::{self, Write};

use camino::Utf8Path;
use serde::Serialize;

use crate::app::FetchResult;
use crate::error::G2koError;
use crate::report::OrganismError;

pub const RECONSTRUCT_MAPPER_URL: &str = "https://www.genome.jp/kegg/mapper/reconstruct.html";

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchSummary {
    pub generated_at: String,
    pub output: Option<String>,
    pub requested: usize,
    pub sections: usize,
    pub records: usize,
    pub include_functions: bool,
    pub errors: Vec<OrganismError>,
}

impl FetchSummary {
    pub fn new(result: &FetchResult, output: Option<&Utf8Path>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            output: output.map(|path| path.to_string()),
            requested: result.requested,
            sections: result.sections,
            records: result.records,
            include_functions: result.include_functions,
            errors: result.errors.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupEntry {
    pub ko_id: String,
    pub function: String,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_fetch(summary: &FetchSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    pub fn print_lookup(entries: &[LookupEntry]) -> io::Result<()> {
        Self::print_json(&entries)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl crate::report::ProgressSink for JsonOutput {
    fn event(&self, _event: crate::report::ProgressEvent) {}
}

/// Writes the report next to its destination first, then renames it into
/// place so a failed write never leaves a truncated report behind.
pub fn write_report(path: &Utf8Path, report: &str) -> Result<(), G2koError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| G2koError::Filesystem(err.to_string()))?;
    let mut temp = tempfile::Builder::new()
        .prefix("g2ko-report")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| G2koError::Filesystem(err.to_string()))?;
    temp.write_all(report.as_bytes())
        .map_err(|err| G2koError::Filesystem(err.to_string()))?;
    temp.persist(path.as_std_path())
        .map_err(|err| G2koError::Filesystem(err.to_string()))?;
    Ok(())
}
