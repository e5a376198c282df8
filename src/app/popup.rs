use crate::presentation::PopupRender;

pub(crate) const UNSELECTED_LABEL: &str = "Select Form Type";

/// What a confirmed choice is written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PopupTarget {
    Category,
    Field(String),
}

pub(crate) struct PopupState {
    target: PopupTarget,
    title: String,
    labels: Vec<String>,
    values: Vec<String>,
    selected: usize,
}

impl PopupState {
    /// Chooser for the form type; the first entry is the unselected sentinel.
    pub(crate) fn for_category<'a>(
        names: impl Iterator<Item = &'a str>,
        current: Option<&str>,
    ) -> Self {
        let mut labels = vec![UNSELECTED_LABEL.to_string()];
        let mut values = vec![String::new()];
        for name in names {
            labels.push(name.to_string());
            values.push(name.to_string());
        }
        let current = current.unwrap_or("");
        let selected = values.iter().position(|value| value == current).unwrap_or(0);
        Self {
            target: PopupTarget::Category,
            title: "Form Type".to_string(),
            labels,
            values,
            selected,
        }
    }

    pub(crate) fn for_field(name: &str, label: &str, options: &[String], current: &str) -> Option<Self> {
        if options.is_empty() {
            return None;
        }
        let selected = options
            .iter()
            .position(|option| option == current)
            .unwrap_or(0);
        Some(Self {
            target: PopupTarget::Field(name.to_string()),
            title: label.to_string(),
            labels: options.to_vec(),
            values: options.to_vec(),
            selected,
        })
    }

    pub(crate) fn select_previous(&mut self) {
        if self.values.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.values.len().saturating_sub(1);
        } else {
            self.selected -= 1;
        }
    }

    pub(crate) fn select_next(&mut self) {
        if self.values.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.values.len();
    }

    pub(crate) fn target(&self) -> &PopupTarget {
        &self.target
    }

    pub(crate) fn selected_value(&self) -> Option<&str> {
        self.values.get(self.selected).map(String::as_str)
    }

    pub(crate) fn as_render(&self) -> PopupRender<'_> {
        PopupRender {
            title: &self.title,
            options: &self.labels,
            selected: self.selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_popup_starts_on_current_selection() {
        let names = ["User Information", "Payment Information"];
        let popup = PopupState::for_category(names.into_iter(), Some("Payment Information"));
        assert_eq!(popup.selected_value(), Some("Payment Information"));
        let popup = PopupState::for_category(names.into_iter(), None);
        assert_eq!(popup.selected_value(), Some(""));
        assert_eq!(popup.as_render().options[0], UNSELECTED_LABEL);
    }

    #[test]
    fn selection_wraps_both_ways() {
        let options = vec!["Goa".to_string(), "Assam".to_string()];
        let mut popup = PopupState::for_field("state", "State", &options, "").expect("popup");
        popup.select_previous();
        assert_eq!(popup.selected_value(), Some("Assam"));
        popup.select_next();
        assert_eq!(popup.selected_value(), Some("Goa"));
        assert_eq!(popup.target(), &PopupTarget::Field("state".to_string()));
    }

    #[test]
    fn no_popup_without_options() {
        assert!(PopupState::for_field("x", "X", &[], "").is_none());
    }
}
