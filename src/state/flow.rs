use crate::core::config::WizardConfig;
use crate::core::engine::{self, Progress};
use crate::core::form_data::FormData;
use crate::core::step::StepId;
use crate::core::value::Value;
use crate::state::validation::{ErrorVisibility, ValidationState};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Done,
}

/// Position of a session: on a configured step, or past the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Step(StepId),
    Finished,
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(step) => write!(f, "step {step}"),
            Self::Finished => f.write_str("finished"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Advanced(StepId),
    Finished,
    Blocked { step: StepId, missing: Vec<String> },
    Back(StepId),
    Stayed,
}

/// Final hand-off of a completed record, typically to a remote API.
pub trait Submitter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn submit(&mut self, wizard: &str, data: &FormData) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot submit while at {0}")]
    NotFinished(Cursor),
    #[error("submission failed: {0}")]
    Submit(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Linear Next/Back walk over a wizard's configured steps.
///
/// `next` only moves forward when the current step validates; `back` is always allowed.
pub struct WizardSession<'a> {
    config: &'a WizardConfig,
    data: FormData,
    cursor: Cursor,
    statuses: BTreeMap<StepId, StepStatus>,
    validation: ValidationState,
}

impl<'a> WizardSession<'a> {
    pub fn start(config: &'a WizardConfig, data: FormData) -> Self {
        let cursor = config.first_step().map_or(Cursor::Finished, Cursor::Step);
        Self::at(config, data, cursor)
    }

    /// Opens a previously saved draft at its first incomplete step.
    pub fn resume(config: &'a WizardConfig, data: FormData) -> Self {
        let cursor = match engine::resume_point(config, &data) {
            Progress::Incomplete(step) => Cursor::Step(step),
            Progress::Complete => Cursor::Finished,
        };
        tracing::info!(wizard = %config.name, %cursor, "resuming wizard session");
        Self::at(config, data, cursor)
    }

    fn at(config: &'a WizardConfig, data: FormData, cursor: Cursor) -> Self {
        let statuses = config
            .step_ids()
            .map(|step| {
                let status = match cursor {
                    Cursor::Finished => StepStatus::Done,
                    Cursor::Step(current) if step < current => StepStatus::Done,
                    Cursor::Step(current) if step == current => StepStatus::Active,
                    Cursor::Step(_) => StepStatus::Pending,
                };
                (step, status)
            })
            .collect();
        let mut session = Self {
            config,
            data,
            cursor,
            statuses,
            validation: ValidationState::default(),
        };
        session.enter_current_step();
        session
    }

    pub fn config(&self) -> &WizardConfig {
        self.config
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn current_step(&self) -> Option<StepId> {
        match self.cursor {
            Cursor::Step(step) => Some(step),
            Cursor::Finished => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor == Cursor::Finished
    }

    pub fn status_of(&self, step: StepId) -> StepStatus {
        self.statuses
            .get(&step)
            .copied()
            .unwrap_or(StepStatus::Pending)
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn into_data(self) -> FormData {
        self.data
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn visible_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.validation.visible_entries()
    }

    /// Writes a field through the wizard's lookup mode, so nested drafts stay nested.
    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let was_visible = self.validation.visible_error(&field).is_some();
        self.validation.clear_error(&field);
        self.data.assign(&field, value, self.config.lookup);

        let Cursor::Step(current) = self.cursor else {
            return;
        };
        self.track_missing(current);
        if was_visible {
            self.validation.set_visibility(&field, ErrorVisibility::Inline);
        }
        if self.can_advance() {
            self.validation.clear_step_errors();
        }
    }

    pub fn can_advance(&self) -> bool {
        match self.cursor {
            Cursor::Step(step) => engine::validate_step(self.config, step, &self.data),
            Cursor::Finished => false,
        }
    }

    pub fn next(&mut self) -> Navigation {
        let Cursor::Step(current) = self.cursor else {
            return Navigation::Finished;
        };

        let missing = self.track_missing(current);
        if !missing.is_empty() {
            for field in &missing {
                self.validation.set_visibility(field, ErrorVisibility::Inline);
            }
            self.validation
                .set_step_errors(vec![format!("Step {current} has unanswered fields")]);
            tracing::debug!(
                wizard = %self.config.name,
                step = %current,
                ?missing,
                "next blocked"
            );
            return Navigation::Blocked {
                step: current,
                missing,
            };
        }

        self.set_status(current, StepStatus::Done);
        let navigation = match self.config.next_step_after(current) {
            Some(next) => {
                self.set_status(next, StepStatus::Active);
                self.cursor = Cursor::Step(next);
                tracing::debug!(
                    wizard = %self.config.name,
                    from = %current,
                    to = %next,
                    "advanced"
                );
                Navigation::Advanced(next)
            }
            None => {
                self.cursor = Cursor::Finished;
                tracing::info!(wizard = %self.config.name, "all steps complete");
                Navigation::Finished
            }
        };
        self.enter_current_step();
        navigation
    }

    pub fn back(&mut self) -> Navigation {
        let target = match self.cursor {
            Cursor::Finished => self.config.last_step(),
            Cursor::Step(current) => self.config.previous_step_before(current),
        };
        let Some(target) = target else {
            return Navigation::Stayed;
        };

        if let Cursor::Step(current) = self.cursor {
            self.set_status(current, StepStatus::Pending);
        }
        self.set_status(target, StepStatus::Active);
        self.cursor = Cursor::Step(target);
        self.enter_current_step();
        tracing::debug!(wizard = %self.config.name, to = %target, "moved back");
        Navigation::Back(target)
    }

    pub fn submit<S: Submitter>(&self, submitter: &mut S) -> Result<(), SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished(self.cursor));
        }
        submitter
            .submit(&self.config.name, &self.data)
            .map_err(|err| SessionError::Submit(Box::new(err)))?;
        tracing::info!(wizard = %self.config.name, fields = self.data.len(), "submitted");
        Ok(())
    }

    /// Keeps only the current step's field errors and records its unanswered
    /// fields as hidden until the user tries to move on.
    fn enter_current_step(&mut self) {
        self.validation.clear_step_errors();
        let Cursor::Step(current) = self.cursor else {
            self.validation.clear();
            return;
        };
        let required = self
            .config
            .requirements(current)
            .map(|reqs| reqs.fields().to_vec())
            .unwrap_or_default();
        self.validation.clear_for_fields(&required);
        self.track_missing(current);
    }

    fn track_missing(&mut self, step: StepId) -> Vec<String> {
        let missing = engine::missing_fields(self.config, step, &self.data);
        for field in &missing {
            if !self.validation.has_error(field) {
                self.validation.set_error(
                    field.as_str(),
                    format!("{field} is required"),
                    ErrorVisibility::Hidden,
                );
            }
        }
        missing
    }

    fn set_status(&mut self, step: StepId, status: StepStatus) {
        if let Some(slot) = self.statuses.get_mut(&step) {
            *slot = status;
        }
    }
}
