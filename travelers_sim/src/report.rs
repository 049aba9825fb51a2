//! Record output for a run.
//!
//! Text mode prints one `time:.. id:.. x:.. y:.. symbol:..` line per step.
//! JSON mode prints one object per line, tagged by `type`.

use crate::config::WalkPlan;
use crate::runner::{RunReport, TravelerOutcome};
use serde::Serialize;
use std::io::{self, Write};
use travelers_core::PathEntry;

/// How records are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One JSON output line.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    Run {
        travelers: u32,
        width: u32,
        height: u32,
    },
    Step(&'a PathEntry),
    Error {
        id: u32,
        error: String,
    },
    Summary {
        run_id: String,
        succeeded: usize,
        failed: usize,
        steps: usize,
        elapsed_secs: f64,
    },
}

/// Writes run output to any sink (stdout in the CLI).
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Writes the run header.
    pub fn write_banner(&mut self, plan: &WalkPlan) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(
                self.out,
                "Number of travelers:{} W:{} H:{}",
                plan.traveler_count,
                plan.grid.width(),
                plan.grid.height()
            ),
            OutputFormat::Json => self.write_record(&Record::Run {
                travelers: plan.traveler_count,
                width: plan.grid.width(),
                height: plan.grid.height(),
            }),
        }
    }

    /// Writes every record of one traveler, or its error.
    pub fn write_outcome(&mut self, outcome: &TravelerOutcome) -> io::Result<()> {
        match (&outcome.result, self.format) {
            (Ok(path), OutputFormat::Text) => {
                for entry in path {
                    writeln!(self.out, "{}", entry)?;
                }
                Ok(())
            }
            (Ok(path), OutputFormat::Json) => {
                for entry in path {
                    self.write_record(&Record::Step(entry))?;
                }
                Ok(())
            }
            (Err(e), OutputFormat::Text) => writeln!(self.out, "{}", e),
            (Err(e), OutputFormat::Json) => self.write_record(&Record::Error {
                id: outcome.traveler.0,
                error: e.to_string(),
            }),
        }
    }

    /// Writes the closing summary. Text mode leaves this to the log.
    pub fn write_summary(&mut self, report: &RunReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => Ok(()),
            OutputFormat::Json => self.write_record(&Record::Summary {
                run_id: report.run_id.as_uuid().to_string(),
                succeeded: report.succeeded(),
                failed: report.failed(),
                steps: report.total_steps(),
                elapsed_secs: report.elapsed.as_secs_f64(),
            }),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_record(&mut self, record: &Record<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        writeln!(self.out)
    }
}
