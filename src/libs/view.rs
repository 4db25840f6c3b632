use super::report::ReportMatrix;
use prettytable::{Cell, Row, Table};

pub struct View {}

impl View {
    /// Prints the report layout as a terminal table.
    pub fn report(report: &ReportMatrix) {
        Self::table(report).printstd();
    }

    pub fn table(report: &ReportMatrix) -> Table {
        let mut table = Table::new();
        for layout_row in report.layout() {
            table.add_row(Row::new(layout_row.cells.iter().map(|cell| Cell::new(cell)).collect()));
        }
        table
    }
}
