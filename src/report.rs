use std::fmt::Write as _;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::KoFunctionCatalog;
use crate::domain::OrganismRequest;
use crate::kegg::KeggClient;
use crate::parser::{GeneKoRecord, parse_link_lines};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub record: GeneKoRecord,
    pub function: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub organism: OrganismRequest,
    pub rows: Vec<ReportRow>,
}

impl ReportSection {
    fn render_into(&self, out: &mut String) {
        let _ = writeln!(out, "# {}", self.organism.display_name());
        for row in &self.rows {
            out.push_str(&row.record.gene_id);
            out.push('\t');
            out.push_str(&row.record.ko_id);
            if let Some(function) = &row.function {
                out.push('\t');
                out.push_str(function);
            }
            out.push('\n');
        }
        out.push('\n');
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            section.render_into(&mut out);
        }
        out
    }

    pub fn record_count(&self) -> usize {
        self.sections.iter().map(|section| section.rows.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganismError {
    pub code: String,
    pub display_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReportOutcome {
    pub report: Report,
    pub errors: Vec<OrganismError>,
}

impl ReportOutcome {
    pub fn text(&self) -> String {
        self.report.render()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Fetched { records: usize },
    Failed,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub completed: usize,
    pub total: usize,
    pub code: String,
    pub display_name: String,
    pub status: FetchStatus,
    pub elapsed: Option<Duration>,
}

impl ProgressEvent {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100) / self.total).min(100) as u8
    }
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn event(&self, _event: ProgressEvent) {}
}

/// Fetches every organism in order and joins the links against `catalog`.
/// A failed organism is recorded in the outcome's errors and left out of
/// the report; the remaining organisms are still processed.
pub fn build_report<K: KeggClient + ?Sized>(
    client: &K,
    requests: &[OrganismRequest],
    catalog: &KoFunctionCatalog,
    include_functions: bool,
    sink: &dyn ProgressSink,
) -> ReportOutcome {
    let total = requests.len();
    let mut outcome = ReportOutcome::default();

    for (index, request) in requests.iter().enumerate() {
        let started = Instant::now();
        let status = match client.link_ko(request.code()) {
            Ok(body) => {
                let rows = parse_link_lines(&body)
                    .into_iter()
                    .map(|record| {
                        let function = include_functions
                            .then(|| catalog.lookup(&record.ko_id).to_string());
                        ReportRow { record, function }
                    })
                    .collect::<Vec<_>>();
                let records = rows.len();
                info!(
                    organism = %request.code(),
                    records,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "fetched KO links"
                );
                outcome.report.sections.push(ReportSection {
                    organism: request.clone(),
                    rows,
                });
                FetchStatus::Fetched { records }
            }
            Err(err) => {
                warn!(organism = %request.code(), error = %err, "KO link fetch failed");
                outcome.errors.push(OrganismError {
                    code: request.code().to_string(),
                    display_name: request.display_name().to_string(),
                    message: err.to_string(),
                });
                FetchStatus::Failed
            }
        };

        sink.event(ProgressEvent {
            completed: index + 1,
            total,
            code: request.code().to_string(),
            display_name: request.display_name().to_string(),
            status,
            elapsed: Some(started.elapsed()),
        });
    }

    outcome
}
