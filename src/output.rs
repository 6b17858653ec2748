//! Final report rendering.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::count::ResourceCount;

/// One resource family's line in the report.
#[derive(Tabled, Serialize)]
pub struct ReportRow {
    #[tabled(rename = "RESOURCE")]
    #[serde(rename = "resource")]
    pub resource: String,
    #[tabled(rename = "COUNT")]
    #[serde(rename = "count")]
    pub count: u64,
    #[tabled(rename = "ERRORS")]
    #[serde(rename = "errors")]
    pub errors: usize,
}

impl ReportRow {
    pub fn new(resource: &str, count: &ResourceCount) -> Self {
        Self {
            resource: resource.to_string(),
            count: count.total,
            errors: count.errors.len(),
        }
    }
}

/// The full inventory report.
#[derive(Serialize)]
pub struct Report {
    pub account: String,
    pub scope: String,
    pub rows: Vec<ReportRow>,
    pub total: u64,
}

impl Report {
    pub fn new(account: String, scope: String, rows: Vec<ReportRow>) -> Self {
        let total = rows.iter().map(|r| r.count).sum();
        Self {
            account,
            scope,
            rows,
            total,
        }
    }

    pub fn render_table(&self) -> String {
        let mut table = Table::new(&self.rows);
        table.with(Style::blank());

        format!(
            "Account: {}\nScope: {}\n\n{}\n\nTotal: {} resources\n",
            self.account, self.scope, table, self.total
        )
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
