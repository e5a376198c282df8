pub const CREATED_MESSAGE: &str = "Form Submitted successfully!";
pub const EDITED_MESSAGE: &str = "Changes Saved Successfully";
pub const DELETED_MESSAGE: &str = "Entry deleted successfully!";

/// What the last committed change did; drives the banner styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Created,
    Edited,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn new(kind: FeedbackKind) -> Self {
        Self { kind }
    }

    pub fn message(&self) -> &'static str {
        match self.kind {
            FeedbackKind::Created => CREATED_MESSAGE,
            FeedbackKind::Edited => EDITED_MESSAGE,
            FeedbackKind::Deleted => DELETED_MESSAGE,
        }
    }
}
