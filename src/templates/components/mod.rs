pub mod field;
pub mod form;

pub use field::{error_slot, field};
pub use form::{blur_feedback, form, FormView};
