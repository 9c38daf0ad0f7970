use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stepcheck::core::engine::{self, Progress};
use stepcheck::form_data::FormDataError;
use stepcheck::{ConfigError, FormData, StepId, WizardConfig, WizardKind};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stepcheck", version, about = "Check saved wizard drafts against a step table")]
struct Cli {
    /// Bundled wizard table to check against [default: student]
    #[arg(long, value_enum)]
    wizard: Option<WizardKind>,

    /// Custom wizard table (YAML, or JSON with a .json extension)
    #[arg(long, value_name = "FILE", conflicts_with = "wizard")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check whether one step's required fields are answered
    Check {
        #[arg(value_parser = parse_step)]
        step: StepId,
        data: PathBuf,
    },
    /// Print the step a saved draft should resume at
    Resume { data: PathBuf },
    /// Print the status of every step
    Report {
        data: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid draft JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid draft YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    FormData(#[from] FormDataError),
}

impl CliError {
    const EXIT_CODE: u8 = 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Incomplete,
}

impl Status {
    fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Incomplete => 1,
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(cli) {
        Ok(status) => ExitCode::from(status.code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(CliError::EXIT_CODE)
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("STEPCHECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<Status, CliError> {
    let config = match cli.config.as_deref() {
        Some(path) => WizardConfig::load(path)?,
        None => cli.wizard.unwrap_or(WizardKind::StudentApplication).config()?,
    };

    match cli.command {
        Command::Check { step, data } => {
            let data = load_draft(&data)?;
            let missing = engine::missing_fields(&config, step, &data);
            if missing.is_empty() {
                println!("step {step}: complete");
                return Ok(Status::Ok);
            }
            println!("step {step}: missing {}", missing.join(", "));
            Ok(Status::Incomplete)
        }
        Command::Resume { data } => {
            let data = load_draft(&data)?;
            match engine::resume_point(&config, &data) {
                Progress::Incomplete(step) => println!("{step}"),
                Progress::Complete => println!("complete"),
            }
            Ok(Status::Ok)
        }
        Command::Report { data, json } => {
            let data = load_draft(&data)?;
            if json {
                let body = report_json(&config, &data);
                println!("{}", serde_json::to_string_pretty(&body)?);
                return Ok(Status::Ok);
            }
            for entry in engine::step_report(&config, &data) {
                let title = entry.title.as_deref().unwrap_or("");
                if entry.is_complete() {
                    println!("{:>3}  done     {}", entry.step, title);
                } else {
                    println!(
                        "{:>3}  missing  {} ({})",
                        entry.step,
                        title,
                        entry.missing.join(", ")
                    );
                }
            }
            Ok(Status::Ok)
        }
    }
}

fn report_json(config: &WizardConfig, data: &FormData) -> serde_json::Value {
    serde_json::json!({
        "wizard": config.name,
        "progress": engine::resume_point(config, data),
        "steps": engine::step_report(config, data),
    })
}

fn load_draft(path: &Path) -> Result<FormData, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let value: serde_json::Value = if is_json {
        serde_json::from_str(&raw)?
    } else {
        serde_yaml::from_str(&raw)?
    };
    tracing::debug!(path = %path.display(), "loaded draft");
    Ok(FormData::from_json(value)?)
}

fn parse_step(raw: &str) -> Result<StepId, String> {
    let value: u32 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a step number"))?;
    StepId::new(value).ok_or_else(|| "step numbers start at 1".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn draft_file(suffix: &str, body: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("tempfile");
        file.write_all(body.as_bytes()).expect("write");
        file
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stepcheck").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    fn path_str(file: &NamedTempFile) -> &str {
        file.path().to_str().expect("utf-8 temp path")
    }

    #[test]
    fn step_zero_and_garbage_are_rejected() {
        assert!(parse_step("0").is_err());
        assert!(parse_step("two").is_err());
        assert_eq!(parse_step("3").ok(), StepId::new(3));
    }

    #[test]
    fn drafts_load_from_json_and_yaml() {
        let json_file = draft_file(".json", r#"{"name": "Alice", "hasDisability": false}"#);
        let yaml_file = draft_file(".yaml", "name: Alice\nhasDisability: false\n");

        let from_json = load_draft(json_file.path()).expect("json draft");
        let from_yaml = load_draft(yaml_file.path()).expect("yaml draft");
        assert_eq!(from_json, from_yaml);
        assert_eq!(from_json.len(), 2);
    }

    #[test]
    fn non_object_draft_is_a_form_data_error() {
        let file = draft_file(".json", "[1, 2, 3]");
        let err = load_draft(file.path()).expect_err("list draft");
        assert!(matches!(err, CliError::FormData(FormDataError::NotAnObject(_))));
    }

    #[test]
    fn missing_draft_is_a_read_error() {
        let err = load_draft(Path::new("/nonexistent/draft.json")).expect_err("missing");
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn check_reports_incomplete_step_with_status_one() {
        let file = draft_file(".json", r#"{"firstName": "Alice"}"#);
        let status = run(cli(&["check", "1", path_str(&file)])).expect("run");
        assert_eq!(status, Status::Incomplete);
        assert_eq!(status.code(), 1);
    }

    #[test]
    fn check_passes_complete_step() {
        let file = draft_file(
            ".yaml",
            "firstName: A\nlastName: B\nemail: a@b.c\nphone: \"1\"\n",
        );
        let status = run(cli(&["--wizard", "career", "check", "1", path_str(&file)]))
            .expect("run");
        assert_eq!(status, Status::Ok);
        assert_eq!(status.code(), 0);
    }

    #[test]
    fn custom_config_is_used_for_checks() {
        let config = draft_file(".yaml", "name: t\nsteps:\n  1:\n    required_fields: [name]\n");
        let data = draft_file(".json", r#"{"name": "Alice"}"#);
        let status = run(cli(&[
            "--config",
            path_str(&config),
            "check",
            "1",
            path_str(&data),
        ]))
        .expect("run");
        assert_eq!(status, Status::Ok);
    }

    #[test]
    fn wizard_and_config_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "stepcheck",
            "--wizard",
            "career",
            "--config",
            "c.yaml",
            "resume",
            "d.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn errors_map_to_status_two() {
        let err = run(cli(&["resume", "/nonexistent/draft.json"])).expect_err("missing draft");
        assert!(matches!(err, CliError::Read { .. }));
        assert_eq!(CliError::EXIT_CODE, 2);
    }

    #[test]
    fn json_report_shape() {
        let yaml = r#"
name: t
steps:
  1:
    title: Name
    required_fields: [name]
  2:
    required_fields: [email]
"#;
        let config = WizardConfig::from_yaml_str(yaml).expect("config");
        let data = FormData::new().with("name", "Alice");

        assert_eq!(
            report_json(&config, &data),
            json!({
                "wizard": "t",
                "progress": {"status": "incomplete", "step": 2},
                "steps": [
                    {"step": 1, "title": "Name", "missing": []},
                    {"step": 2, "title": null, "missing": ["email"]},
                ],
            })
        );
    }
}
