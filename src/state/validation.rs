use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorVisibility {
    Hidden,
    Inline,
}

#[derive(Debug, Clone)]
pub struct ValidationEntry {
    pub error: String,
    pub visibility: ErrorVisibility,
}

/// Field and step level messages for the step currently on screen.
#[derive(Debug, Default, Clone)]
pub struct ValidationState {
    entries: IndexMap<String, ValidationEntry>,
    step_errors: Vec<String>,
}

impl ValidationState {
    pub fn set_error(
        &mut self,
        field: impl Into<String>,
        error: impl Into<String>,
        visibility: ErrorVisibility,
    ) {
        self.entries.insert(
            field.into(),
            ValidationEntry {
                error: error.into(),
                visibility,
            },
        );
    }

    pub fn clear_error(&mut self, field: &str) {
        self.entries.shift_remove(field);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.step_errors.clear();
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    pub fn clear_step_errors(&mut self) {
        self.step_errors.clear();
    }

    pub fn set_step_errors(&mut self, errors: Vec<String>) {
        self.step_errors = errors;
    }

    pub fn step_errors(&self) -> &[String] {
        self.step_errors.as_slice()
    }

    pub fn visible_error(&self, field: &str) -> Option<&str> {
        self.entries.get(field).and_then(|entry| {
            matches!(entry.visibility, ErrorVisibility::Inline).then_some(entry.error.as_str())
        })
    }

    pub fn set_visibility(&mut self, field: &str, visibility: ErrorVisibility) {
        if let Some(entry) = self.entries.get_mut(field) {
            entry.visibility = visibility;
        }
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(field, entry)| {
            matches!(entry.visibility, ErrorVisibility::Inline)
                .then_some((field.as_str(), entry.error.as_str()))
        })
    }

    pub fn clear_for_fields(&mut self, allowed: &[String]) {
        self.entries
            .retain(|field, _| allowed.iter().any(|a| a == field));
    }
}
