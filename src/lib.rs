//! Step completeness checks and Next/Back navigation for multi-step application wizards.

pub mod catalog;
pub mod core;
pub mod state;

pub use catalog::WizardKind;
pub use crate::core::config;
pub use crate::core::engine;
pub use crate::core::form_data;
pub use crate::core::step;
pub use crate::core::value;
pub use crate::core::{
    ConfigError, FieldLookup, FormData, Progress, StepId, StepRequirements, Value, WizardConfig,
    find_first_incomplete_step, resume_point, validate_step,
};
pub use state::{Navigation, WizardSession};
