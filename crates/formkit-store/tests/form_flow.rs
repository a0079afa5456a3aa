//! End-to-end behavior of the form store: editing, display policy,
//! reset, and the submission lifecycle.

use std::cell::Cell;

use formkit_model::{FieldPath, FieldValue, Values};
use formkit_schema::{Rule, Schema};
use formkit_store::{FormStore, SubmitAttempt, SubmitOutcome};

fn account_schema() -> Schema {
    Schema::new()
        .with_text(
            "email",
            vec![Rule::required("Required"), Rule::email("Invalid email")],
        )
        .with_text(
            "password",
            vec![Rule::required("Required"), Rule::min_length(6, "Too short")],
        )
        .with_text(
            "confirmPassword",
            vec![Rule::equals_field("password", "Passwords must match")],
        )
        .with_text("city", Vec::new())
        .with_flag("newsletter", Vec::new())
}

fn path(raw: &str) -> FieldPath {
    raw.parse().expect("parse path")
}

fn filled_values() -> Values {
    let mut values = Values::new();
    values.insert("email".to_string(), FieldValue::text("jo@shop.example"));
    values.insert("password".to_string(), FieldValue::text("abcdef"));
    values.insert("confirmPassword".to_string(), FieldValue::text("abcdef"));
    values.insert("city".to_string(), FieldValue::text(""));
    values.insert("newsletter".to_string(), FieldValue::Flag(false));
    values
}

#[test]
fn cross_field_error_follows_both_fields() {
    let mut store = FormStore::with_defaults(account_schema());
    store.set_value(&path("password"), FieldValue::text("abcdef"));
    store.set_value(&path("confirmPassword"), FieldValue::text("abcdex"));

    assert_eq!(
        store.error(&path("confirmPassword")),
        Some("Passwords must match")
    );
    assert_eq!(store.error(&path("password")), None);

    // Fixing the confirmation clears its error without touching password's.
    store.set_value(&path("confirmPassword"), FieldValue::text("abcdef"));
    assert_eq!(store.error(&path("confirmPassword")), None);
    assert_eq!(store.error(&path("password")), None);

    // Editing the referenced field re-raises the error on the confirmation.
    store.set_value(&path("password"), FieldValue::text("abcdeg"));
    assert_eq!(
        store.error(&path("confirmPassword")),
        Some("Passwords must match")
    );
}

#[test]
fn errors_are_shown_only_once_touched() {
    let mut store = FormStore::with_defaults(account_schema());
    let email = path("email");

    assert_eq!(store.error(&email), Some("Required"));
    assert_eq!(store.visible_error(&email), None);

    store.set_touched(&email);
    assert_eq!(store.visible_error(&email), Some("Required"));

    // set_touched is idempotent.
    store.set_touched(&email);
    assert!(store.touched(&email));
}

#[test]
fn set_value_does_not_touch() {
    let mut store = FormStore::with_defaults(account_schema());
    let email = path("email");
    store.set_value(&email, FieldValue::text("not-an-email"));
    assert!(!store.touched(&email));
    assert_eq!(store.error(&email), Some("Invalid email"));
    assert_eq!(store.visible_error(&email), None);
}

#[test]
fn unknown_paths_are_ignored() {
    let mut store = FormStore::with_defaults(account_schema());
    let before = store.values().clone();
    store.set_value(&path("nickname"), FieldValue::text("jo"));
    store.set_touched(&path("nickname"));
    assert_eq!(store.values(), &before);
    assert!(!store.touched(&path("nickname")));
}

#[test]
fn dirty_tracks_the_initial_snapshot() {
    let mut store = FormStore::new(account_schema(), filled_values());
    assert!(!store.dirty());
    store.set_value(&path("city"), FieldValue::text("Porto"));
    assert!(store.dirty());
    store.set_value(&path("city"), FieldValue::text(""));
    assert!(!store.dirty());
}

#[test]
fn reset_is_idempotent() {
    let mut store = FormStore::with_defaults(account_schema());
    store.set_value(&path("email"), FieldValue::text("jo@shop.example"));
    store.set_touched(&path("email"));

    store.reset(filled_values());
    let values_once = store.values().clone();
    let errors_once = store.errors().clone();
    let dirty_once = store.dirty();

    store.reset(filled_values());
    assert_eq!(store.values(), &values_once);
    assert_eq!(store.errors(), &errors_once);
    assert_eq!(store.dirty(), dirty_once);
    assert!(!store.touched(&path("email")));
}

#[test]
fn submit_with_invalid_form_touches_and_skips_the_handler() {
    let mut store = FormStore::with_defaults(account_schema());
    let calls = Cell::new(0u32);

    let outcome = store.submit(|_| {
        calls.set(calls.get() + 1);
        SubmitOutcome::Accepted
    });

    assert!(outcome.is_none());
    assert_eq!(calls.get(), 0);
    assert!(store.touched(&path("email")));
    assert_eq!(store.visible_error(&path("email")), Some("Required"));
    assert!(!store.submitting());
}

#[test]
fn submit_with_valid_form_hands_over_a_snapshot() {
    let mut store = FormStore::new(account_schema(), filled_values());
    let calls = Cell::new(0u32);

    let outcome = store.submit(|values| {
        calls.set(calls.get() + 1);
        assert_eq!(
            values.get("email"),
            Some(&FieldValue::text("jo@shop.example"))
        );
        SubmitOutcome::Accepted
    });

    assert_eq!(outcome, Some(SubmitOutcome::Accepted));
    assert_eq!(calls.get(), 1);
    assert!(!store.submitting());
    assert_eq!(store.form_error(), None);
}

#[test]
fn only_one_submission_in_flight() {
    let mut store = FormStore::new(account_schema(), filled_values());

    let first = store.begin_submit();
    let SubmitAttempt::Ready { ticket, .. } = first else {
        panic!("expected a ready attempt");
    };
    assert!(store.submitting());

    // A second submit while the first is pending never reaches the handler.
    let calls = Cell::new(0u32);
    let outcome = store.submit(|_| {
        calls.set(calls.get() + 1);
        SubmitOutcome::Accepted
    });
    assert!(outcome.is_none());
    assert_eq!(calls.get(), 0);

    store.finish_submit(ticket, SubmitOutcome::Accepted);
    assert!(!store.submitting());
}

#[test]
fn rejected_submission_reports_without_clearing_values() {
    let mut store = FormStore::new(account_schema(), filled_values());

    let outcome = store.submit(|_| SubmitOutcome::Rejected("server said no".to_string()));

    assert_eq!(
        outcome,
        Some(SubmitOutcome::Rejected("server said no".to_string()))
    );
    assert_eq!(store.form_error(), Some("server said no"));
    assert!(!store.submitting());
    assert_eq!(
        store.value(&path("email")),
        Some(&FieldValue::text("jo@shop.example"))
    );

    // The next successful attempt clears the form-level error.
    let outcome = store.submit(|_| SubmitOutcome::Accepted);
    assert_eq!(outcome, Some(SubmitOutcome::Accepted));
    assert_eq!(store.form_error(), None);
}

#[test]
fn cancelled_submission_ignores_the_late_completion() {
    let mut store = FormStore::new(account_schema(), filled_values());

    let SubmitAttempt::Ready { ticket, .. } = store.begin_submit() else {
        panic!("expected a ready attempt");
    };
    store.cancel_submit();
    assert!(!store.submitting());

    // The late completion for the cancelled attempt must not resurface.
    store.finish_submit(ticket, SubmitOutcome::Rejected("late".to_string()));
    assert!(!store.submitting());
    assert_eq!(store.form_error(), None);
}

#[test]
fn edits_during_an_in_flight_submission_apply_to_the_next_attempt() {
    let mut store = FormStore::new(account_schema(), filled_values());

    let SubmitAttempt::Ready { ticket, values } = store.begin_submit() else {
        panic!("expected a ready attempt");
    };
    store.set_value(&path("city"), FieldValue::text("Porto"));
    // The in-flight snapshot is unaffected by the edit.
    assert_eq!(values.get("city"), Some(&FieldValue::text("")));
    store.finish_submit(ticket, SubmitOutcome::Accepted);

    let SubmitAttempt::Ready { values, .. } = store.begin_submit() else {
        panic!("expected a ready attempt");
    };
    assert_eq!(values.get("city"), Some(&FieldValue::text("Porto")));
}
