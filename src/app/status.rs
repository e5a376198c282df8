#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Select a form type to begin.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn category_selected(&mut self, category: Option<&str>) {
        self.message = match category {
            Some(category) => format!("{category} selected. Press Ctrl+S to submit."),
            None => READY_STATUS.to_string(),
        };
    }

    pub fn rejected_input(&mut self, label: &str) {
        self.message = format!("{label} only accepts digits and spaces");
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.message = format!("{count} issue(s) remaining");
    }

    pub fn editing_record(&mut self, category: &str, index: usize) {
        self.message = format!("Editing {category} entry #{}", index + 1);
    }

    pub fn pending_exit(&mut self) {
        self.message = "Unsaved input. Press Ctrl+Q again to quit without submitting.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
