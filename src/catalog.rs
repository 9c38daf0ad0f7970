use crate::core::config::{ConfigError, WizardConfig};
use std::fmt;
use std::str::FromStr;

const STUDENT_TABLE: &str = include_str!("../wizards/student.yaml");
const CAREER_TABLE: &str = include_str!("../wizards/career.yaml");

/// Wizard tables bundled with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WizardKind {
    /// Student and applicant admission form
    #[value(name = "student")]
    StudentApplication,
    /// Career and employment application form
    #[value(name = "career")]
    CareerApplication,
}

impl WizardKind {
    pub const ALL: [WizardKind; 2] = [Self::StudentApplication, Self::CareerApplication];

    pub fn name(self) -> &'static str {
        match self {
            Self::StudentApplication => "student",
            Self::CareerApplication => "career",
        }
    }

    pub fn config(self) -> Result<WizardConfig, ConfigError> {
        match self {
            Self::StudentApplication => WizardConfig::from_yaml_str(STUDENT_TABLE),
            Self::CareerApplication => WizardConfig::from_yaml_str(CAREER_TABLE),
        }
    }
}

impl fmt::Display for WizardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WizardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown wizard '{s}', expected student or career"))
    }
}

#[cfg(test)]
mod tests {
    use super::WizardKind;
    use crate::core::engine::{Progress, find_first_incomplete_step, resume_point, validate_step};
    use crate::core::form_data::{FieldLookup, FormData};
    use crate::core::step::StepId;
    use serde_json::json;

    fn id(n: u32) -> StepId {
        StepId::new(n).expect("non-zero")
    }

    #[test]
    fn bundled_tables_parse() {
        let student = WizardKind::StudentApplication.config().expect("student");
        assert_eq!(student.name, "student");
        assert_eq!(student.len(), 6);

        let career = WizardKind::CareerApplication.config().expect("career");
        assert_eq!(career.name, "career");
        assert_eq!(career.len(), 5);
        assert_eq!(career.lookup, FieldLookup::Flat);
    }

    #[test]
    fn kinds_parse_from_names() {
        assert_eq!("student".parse::<WizardKind>(), Ok(WizardKind::StudentApplication));
        assert_eq!(" Career ".parse::<WizardKind>(), Ok(WizardKind::CareerApplication));
        assert!("teacher".parse::<WizardKind>().is_err());
    }

    #[test]
    fn career_references_need_literal_dotted_keys() {
        let career = WizardKind::CareerApplication.config().expect("career");
        let nested = FormData::from_json(json!({
            "referee1": {"name": "A", "email": "a@x.io", "phone": "1"},
            "referee2": {"name": "B", "email": "b@x.io", "phone": "2"},
        }))
        .expect("draft");
        assert!(!validate_step(&career, id(4), &nested));

        let flat = FormData::from_json(json!({
            "referee1.name": "A", "referee1.email": "a@x.io", "referee1.phone": "1",
            "referee2.name": "B", "referee2.email": "b@x.io", "referee2.phone": "2",
        }))
        .expect("draft");
        assert!(validate_step(&career, id(4), &flat));
    }

    #[test]
    fn student_draft_resumes_at_education_history() {
        let student = WizardKind::StudentApplication.config().expect("student");
        let draft = FormData::from_json(json!({
            "firstName": "Mere", "lastName": "Tane", "dateOfBirth": "2004-03-09",
            "gender": "female", "nationality": "NZ", "passportNumber": "LA123456",
            "email": "mere@example.com", "phone": "+64 21 000 000", "address": "1 Queen St",
            "city": "Auckland", "country": "New Zealand",
            "institution": 4, "course": 17, "term": "2027-T1", "studyMode": "full_time",
            "hasDisability": false, "hasCriminalConviction": false, "previousVisaRefusal": false,
        }))
        .expect("draft");

        assert_eq!(find_first_incomplete_step(&student, &draft), id(4));
        assert_eq!(resume_point(&student, &draft), Progress::Incomplete(id(4)));
    }
}
