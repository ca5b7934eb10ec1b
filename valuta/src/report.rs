use std::io::Write;

use valuta_core::{AggregateSummary, RateRecord, Reporter, ValutaError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Output format for a rendered summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Three human-readable lines: maximum, minimum, average.
    #[default]
    Text,
    /// Pretty-printed JSON object.
    Json,
}

/// Render `summary` as three lines with rates to four decimal places.
///
/// ```text
/// Maximum: US Dollar, 75.3000 on 2025-10-20
/// Minimum: US Dollar, 75.2800 on 2025-10-22
/// Average: 75.2900
/// ```
#[must_use]
pub fn render_text(summary: &AggregateSummary) -> String {
    format!(
        "Maximum: {}\nMinimum: {}\nAverage: {:.4}\n",
        describe(&summary.max),
        describe(&summary.min),
        summary.average
    )
}

fn describe(r: &RateRecord) -> String {
    format!(
        "{}, {:.4} on {}",
        r.name(),
        r.rate(),
        r.date().format(DATE_FORMAT)
    )
}

/// Render `summary` as pretty-printed JSON, dates as `YYYY-MM-DD`.
///
/// # Errors
/// Returns `ValutaError::Report` if serialization fails.
pub fn render_json(summary: &AggregateSummary) -> Result<String, ValutaError> {
    let mut out =
        serde_json::to_string_pretty(summary).map_err(|e| ValutaError::Report(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

/// Reporter writing the rendered summary to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    format: ReportFormat,
}

impl ConsoleReporter {
    /// Create a console reporter for `format`.
    #[must_use]
    pub const fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Render `summary` in this reporter's format.
    ///
    /// # Errors
    /// Returns `ValutaError::Report` if the summary cannot be rendered.
    pub fn render(&self, summary: &AggregateSummary) -> Result<String, ValutaError> {
        match self.format {
            ReportFormat::Text => Ok(render_text(summary)),
            ReportFormat::Json => render_json(summary),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, summary: &AggregateSummary) -> Result<(), ValutaError> {
        let rendered = self.render(summary)?;
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| ValutaError::Report(e.to_string()))
    }
}
