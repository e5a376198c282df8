mod error;
mod feedback;
mod session;
mod tables;
mod validation;

pub use error::SessionError;
pub use feedback::{CREATED_MESSAGE, DELETED_MESSAGE, EDITED_MESSAGE, Feedback, FeedbackKind};
pub use session::{EditCursor, FormSession, SessionPhase, SubmitOutcome};
pub use tables::{RecordTable, record_tables};
pub use validation::{
    AGE_FIELD, AGE_RANGE_MESSAGE, CARD_NUMBER_FIELD, CARD_NUMBER_MESSAGE, FormValues,
    ValidationErrors, accepts_input, validate,
};
