//! Report rendering to files.
//!
//! Writes a [`ReportMatrix`] in one of three formats:
//!
//! - **Excel**: the layout rows in a single worksheet, with the author row,
//!   totals labels, day-of-week row and column headers in bold
//! - **CSV**: one record per layout row, for spreadsheets that cannot open xlsx
//! - **JSON**: the matrix itself, with raw minutes instead of formatted cells
//!
//! Excel and CSV both follow [`ReportMatrix::layout`], so the row sequence is
//! identical across renderers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timesheet::libs::export::{Exporter, ExportFormat};
//! # use timesheet::libs::report::ReportMatrix;
//! # fn run(report: &ReportMatrix) -> timesheet::libs::error::Result<()> {
//! let exporter = Exporter::new(ExportFormat::Excel, None, report);
//! let path = exporter.export(report)?;
//! # Ok(())
//! # }
//! ```

use crate::libs::error::{Result, TimesheetError};
use crate::libs::report::{LayoutRow, LayoutRowKind, ReportMatrix};
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Output formats for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Office Open XML workbook (`.xlsx`).
    #[default]
    Excel,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn all() -> [ExportFormat; 3] {
        [ExportFormat::Excel, ExportFormat::Csv, ExportFormat::Json]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Writes reports to a fixed output path.
#[derive(Debug, Clone)]
pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Creates an exporter writing to `output_path`, or to
    /// `timesheet_<from>_<to>.<ext>` in the working directory.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>, report: &ReportMatrix) -> Self {
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(default_file_name(format, report)));
        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Renders `report` and returns the written path.
    pub fn export(&self, report: &ReportMatrix) -> Result<PathBuf> {
        match self.format {
            ExportFormat::Excel => self.export_excel(&report.layout())?,
            ExportFormat::Csv => self.export_csv(&report.layout())?,
            ExportFormat::Json => self.export_json(report)?,
        }
        Ok(self.output_path.clone())
    }

    fn export_excel(&self, layout: &[LayoutRow]) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let bold = Format::new().set_bold();

        for (row, layout_row) in layout.iter().enumerate() {
            for (col, cell) in layout_row.cells.iter().enumerate() {
                let (row, col) = cell_position(row, col)?;
                if cell.is_empty() && layout_row.kind != LayoutRowKind::Issue {
                    continue;
                }
                if is_bold(layout_row.kind, col) {
                    worksheet.write_string_with_format(row, col, cell, &bold)?;
                } else {
                    worksheet.write_string(row, col, cell)?;
                }
            }
        }

        workbook.save(&self.output_path)?;
        Ok(())
    }

    fn export_csv(&self, layout: &[LayoutRow]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(&self.output_path)?;
        for layout_row in layout {
            writer.write_record(&layout_row.cells)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn export_json(&self, report: &ReportMatrix) -> Result<()> {
        let file = File::create(&self.output_path)?;
        serde_json::to_writer_pretty(file, report)?;
        Ok(())
    }
}

/// Worksheet coordinates of a layout cell.
///
/// Indexes outside the `u32` row or `u16` column range are an error rather
/// than a wrapped position.
fn cell_position(row: usize, col: usize) -> Result<(u32, u16)> {
    let row = u32::try_from(row).map_err(|_| TimesheetError::Xlsx(format!("row {} is out of range", row)))?;
    let col = u16::try_from(col).map_err(|_| TimesheetError::Xlsx(format!("column {} is out of range", col)))?;
    Ok((row, col))
}

/// Bold cells: the whole author, day-of-week and header rows, and the
/// "Total" label of totals rows.
fn is_bold(kind: LayoutRowKind, col: u16) -> bool {
    match kind {
        LayoutRowKind::Author | LayoutRowKind::DayOfWeek | LayoutRowKind::Header => true,
        LayoutRowKind::Totals => col == 0,
        LayoutRowKind::Issue => false,
    }
}

pub fn default_file_name(format: ExportFormat, report: &ReportMatrix) -> String {
    let from = report.date_range.first().map(|date| date.format("%Y%m%d").to_string()).unwrap_or_default();
    let to = report.date_range.last().map(|date| date.format("%Y%m%d").to_string()).unwrap_or_default();
    format!("timesheet_{}_{}.{}", from, to, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_position_rejects_wide_columns() {
        assert_eq!(cell_position(3, 65_535).unwrap(), (3, 65_535));
        assert!(matches!(cell_position(0, 65_536), Err(TimesheetError::Xlsx(_))));
    }
}
