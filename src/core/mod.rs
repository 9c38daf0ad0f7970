pub mod config;
pub mod engine;
pub mod form_data;
pub mod step;
pub mod value;
pub mod value_path;

pub use config::{ConfigError, WizardConfig};
pub use engine::{
    Progress, StepReport, find_first_incomplete_step, missing_fields, resume_point, step_report,
    validate_step,
};
pub use form_data::{FieldLookup, FormData, FormDataError};
pub use step::{StepId, StepRequirements};
pub use value::Value;
pub use value_path::{PathSegment, ValuePath, ValuePathParseError};
