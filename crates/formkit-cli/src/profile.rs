//! The built-in storefront profile form schema.

use formkit_schema::{Rule, Schema};

/// Minimum number of metadata entries a profile must carry.
pub const MIN_METADATA_ENTRIES: usize = 3;

/// The profile form: account identity, credentials, address basics, and a
/// dynamic list of metadata key/value entries.
pub fn profile_schema() -> Schema {
    let metadata_element = Schema::new()
        .with_text("key", vec![Rule::required("Required")])
        .with_text("value", vec![Rule::required("Required")]);

    Schema::new()
        .with_text("firstName", vec![Rule::required("Required")])
        .with_text("lastName", vec![Rule::required("Required")])
        .with_text(
            "email",
            vec![Rule::required("Required"), Rule::email("Invalid email")],
        )
        .with_text(
            "password",
            vec![
                Rule::required("Required"),
                Rule::min_length(6, "Password must be at least 6 characters"),
            ],
        )
        .with_text(
            "confirmPassword",
            vec![
                Rule::required("Required"),
                Rule::equals_field("password", "Passwords must match"),
            ],
        )
        .with_text("city", Vec::new())
        .with_flag("newsletter", Vec::new())
        .with_array(
            "metadata",
            metadata_element,
            vec![Rule::min_items(
                MIN_METADATA_ENTRIES,
                "Minimum of 3 metadata",
            )],
        )
}
