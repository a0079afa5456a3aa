//! Validation report rendering: terminal table and versioned JSON payload.

use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use formkit_model::FieldPath;

const REPORT_SCHEMA: &str = "formkit.validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ValidationReportPayload {
    pub schema: &'static str,
    pub schema_version: u32,
    pub form: String,
    pub valid: bool,
    pub issues: Vec<IssueJson>,
}

#[derive(Debug, Serialize)]
pub struct IssueJson {
    pub path: String,
    pub message: String,
}

pub fn build_payload(form: &str, errors: &BTreeMap<FieldPath, String>) -> ValidationReportPayload {
    ValidationReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        form: form.to_string(),
        valid: errors.is_empty(),
        issues: errors
            .iter()
            .map(|(path, message)| IssueJson {
                path: path.to_string(),
                message: message.clone(),
            })
            .collect(),
    }
}

pub fn print_issue_table(errors: &BTreeMap<FieldPath, String>) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Message")]);
    apply_table_style(&mut table);
    for (path, message) in errors {
        table.add_row(vec![
            Cell::new(path).fg(Color::Red).add_attribute(Attribute::Bold),
            Cell::new(message),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}
