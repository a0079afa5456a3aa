use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{debug, info, warn};

use formkit_cli::logging::redact_value;
use formkit_cli::profile::profile_schema;
use formkit_cli::report::{apply_table_style, build_payload, print_issue_table};
use formkit_model::Values;
use formkit_schema::{FieldKind, Schema};
use formkit_session::SessionGate;
use formkit_store::{FormStore, SubmitOutcome};

use crate::cli::{CallbackArgs, ValidateArgs};

/// Validate a values document by driving it through the full form flow:
/// mount, submit, report. Returns whether the submission went through.
pub fn run_validate(args: &ValidateArgs) -> Result<bool> {
    info!(path = %args.values_json.display(), "validating profile values");
    let values = load_values(&args.values_json)?;
    debug!(fields = values.len(), "loaded form values");

    let mut store = FormStore::new(profile_schema(), values);
    let accepted = store
        .submit(|snapshot| {
            debug!(fields = snapshot.len(), "profile accepted");
            SubmitOutcome::Accepted
        })
        .is_some();
    let errors = store.errors();

    if args.json {
        let payload = build_payload("profile", errors);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if accepted {
        println!("OK: profile values are valid");
    } else {
        print_issue_table(errors);
        println!("{} issue(s) found", errors.len());
    }
    Ok(accepted)
}

/// List the profile schema's fields, shapes, and rule messages.
pub fn run_fields() -> Result<()> {
    let schema = profile_schema();
    let mut table = Table::new();
    table.set_header(vec!["Field", "Kind", "Rules"]);
    apply_table_style(&mut table);
    add_field_rows(&mut table, "", &schema);
    println!("{table}");
    Ok(())
}

fn add_field_rows(table: &mut Table, prefix: &str, schema: &Schema) {
    for field in schema.fields() {
        let name = format!("{prefix}{}", field.name());
        let kind = match field.kind() {
            FieldKind::Text => "text",
            FieldKind::Flag => "flag",
            FieldKind::Array(_) => "array",
        };
        let rules = field
            .rules()
            .iter()
            .map(|rule| rule.message().to_string())
            .collect::<Vec<_>>()
            .join("; ");
        table.add_row(vec![name.clone(), kind.to_string(), rules]);
        if let FieldKind::Array(element) = field.kind() {
            add_field_rows(table, &format!("{name}[]."), element);
        }
    }
}

/// Feed a redirect URL through a fresh session gate and report what the
/// router would see. Returns whether a session was established.
pub fn run_callback(args: &CallbackArgs) -> Result<bool> {
    let mut gate = SessionGate::new();
    gate.begin_login(None);
    match gate.handle_callback(&args.url) {
        Ok(_) => {
            info!("callback accepted");
            println!("Session established");
            println!("Token: {}", redact_value(gate.token().unwrap_or("")));
            if let Some(expires_at) = gate.expires_at() {
                println!("Expires: {expires_at}");
            }
            println!("Authenticated: {}", gate.is_authenticated());
            Ok(true)
        }
        Err(error) => {
            warn!(%error, "callback rejected");
            println!("Login failed: {error}");
            Ok(false)
        }
    }
}

fn load_values(path: &Path) -> Result<Values> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read values file {}", path.display()))?;
    let values: Values = serde_json::from_str(&raw)
        .with_context(|| format!("parse form values in {}", path.display()))?;
    Ok(values)
}
