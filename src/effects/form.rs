//! Contact-form submit handling.
//!
//! The handler is cosmetic: default navigation is suppressed, the field
//! values are read but go nowhere (a placeholder until a real submission
//! backend exists), a fixed acknowledgement is emitted, and the fields are
//! cleared.

use crate::dom::FormModel;
use crate::Notice;

/// Acknowledgement shown after every submit.
pub const ACK_MESSAGE: &str = "Thank you for your message! I'll get back to you soon.";

/// Handle one submit: read the values, clear every field, and return the
/// acknowledgement notice.
pub fn submit(form: &mut FormModel) -> Notice {
    for field in &form.fields {
        log::debug!("form field {}={:?} (unused)", field.id, field.value);
    }
    for field in &mut form.fields {
        field.value.clear();
    }
    Notice {
        message: ACK_MESSAGE.to_string(),
    }
}
