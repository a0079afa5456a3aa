mod array;
mod store;
mod submit;

pub use array::FieldArray;
pub use store::{FieldView, FormStore};
pub use submit::{SubmitAttempt, SubmitOutcome, SubmitTicket};
