pub mod business;
pub mod feedback;
pub mod form;
pub mod location;
pub mod qr_code;
pub mod session;

pub use business::{Business, NewBusiness};
pub use feedback::{Feedback, NewFeedback};
pub use form::{FieldType, Form, FormField, FormUpdate, NewForm};
pub use location::{Location, NewLocation};
pub use qr_code::{NewQrCode, QrCode};
pub use session::Session;
