pub mod flow;
pub mod validation;

pub use flow::{Cursor, Navigation, SessionError, StepStatus, Submitter, WizardSession};
pub use validation::{ErrorVisibility, ValidationEntry, ValidationState};
