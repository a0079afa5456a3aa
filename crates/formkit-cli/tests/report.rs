//! Snapshot coverage for the versioned validation report payload.

use std::collections::BTreeMap;

use formkit_cli::profile::profile_schema;
use formkit_cli::report::build_payload;
use formkit_model::FieldPath;

#[test]
fn clean_report_payload() {
    let errors = BTreeMap::new();
    let payload = build_payload("profile", &errors);
    insta::assert_json_snapshot!(payload, @r###"
    {
      "schema": "formkit.validation-report",
      "schema_version": 1,
      "form": "profile",
      "valid": true,
      "issues": []
    }
    "###);
}

#[test]
fn report_payload_lists_issues_in_path_order() {
    let mut errors = BTreeMap::new();
    errors.insert(FieldPath::field("email"), "Required".to_string());
    errors.insert(
        FieldPath::field("metadata"),
        "Minimum of 3 metadata".to_string(),
    );
    let payload = build_payload("profile", &errors);
    insta::assert_json_snapshot!(payload, @r###"
    {
      "schema": "formkit.validation-report",
      "schema_version": 1,
      "form": "profile",
      "valid": false,
      "issues": [
        {
          "path": "email",
          "message": "Required"
        },
        {
          "path": "metadata",
          "message": "Minimum of 3 metadata"
        }
      ]
    }
    "###);
}

#[test]
fn blank_profile_payload_counts_every_required_field() {
    let schema = profile_schema();
    let errors = schema.validate(&schema.default_values());
    let payload = build_payload("profile", &errors);
    assert!(!payload.valid);
    assert_eq!(payload.issues.len(), 6);
    assert!(payload.issues.iter().any(|issue| issue.path == "metadata"));
}
