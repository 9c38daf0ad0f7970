//! Step completeness checks over a [`WizardConfig`] and a [`FormData`].
//!
//! Every function here is total: unknown steps, empty tables and empty form data
//! all produce an answer rather than an error.

use crate::core::config::WizardConfig;
use crate::core::form_data::FormData;
use crate::core::step::StepId;
use serde::Serialize;

/// Where an in-progress submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "step", rename_all = "snake_case")]
pub enum Progress {
    Incomplete(StepId),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: StepId,
    pub title: Option<String>,
    pub missing: Vec<String>,
}

impl StepReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// True when every required field of `step` holds a value that is not null and not `""`.
/// Steps absent from the table have no requirements.
pub fn validate_step(config: &WizardConfig, step: StepId, data: &FormData) -> bool {
    let Some(requirements) = config.requirements(step) else {
        tracing::debug!(wizard = %config.name, %step, "step not configured, treating as complete");
        return true;
    };
    let complete = requirements
        .fields()
        .iter()
        .all(|field| data.has_value(field, config.lookup));
    tracing::debug!(wizard = %config.name, %step, complete, "validated step");
    complete
}

/// Required fields of `step` that are not yet answered, in declaration order.
pub fn missing_fields(config: &WizardConfig, step: StepId, data: &FormData) -> Vec<String> {
    let Some(requirements) = config.requirements(step) else {
        return Vec::new();
    };
    let mut missing: Vec<String> = Vec::new();
    for field in requirements.fields() {
        if !data.has_value(field, config.lookup) && !missing.contains(field) {
            missing.push(field.clone());
        }
    }
    missing
}

/// First configured step that fails [`validate_step`].
///
/// When every step passes this still answers [`StepId::FIRST`]; use
/// [`resume_point`] to tell "start over" apart from "done".
pub fn find_first_incomplete_step(config: &WizardConfig, data: &FormData) -> StepId {
    match resume_point(config, data) {
        Progress::Incomplete(step) => step,
        Progress::Complete => StepId::FIRST,
    }
}

pub fn resume_point(config: &WizardConfig, data: &FormData) -> Progress {
    config
        .step_ids()
        .find(|step| !validate_step(config, *step, data))
        .map_or(Progress::Complete, Progress::Incomplete)
}

pub fn step_report(config: &WizardConfig, data: &FormData) -> Vec<StepReport> {
    config
        .steps()
        .map(|(step, requirements)| StepReport {
            step,
            title: requirements.title.clone(),
            missing: missing_fields(config, step, data),
        })
        .collect()
}
