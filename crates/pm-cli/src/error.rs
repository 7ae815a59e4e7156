//! CLI error type and its exit-code mapping.

use crate::exit_codes::ExitCode;
use pm_report::ReportError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Failure of a whole command.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid arguments: {0}")]
    Args(String),

    #[error("configuration error [{code}]: {0}", code = .0.code())]
    Config(#[from] pm_config::ValidationError),

    #[error("records error [{code}]: {0}", code = .0.code())]
    Records(#[from] pm_common::Error),

    #[error("invalid overrides file: {0}")]
    Overrides(String),

    #[error("{0}")]
    Report(#[from] ReportError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Wrap an I/O error with the path or action it concerns.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CliError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Args(_) => ExitCode::ArgsError,
            CliError::Config(_) => ExitCode::ConfigError,
            CliError::Records(pm_common::Error::Io(_)) => ExitCode::IoError,
            CliError::Records(_) | CliError::Overrides(_) => ExitCode::InputError,
            CliError::Report(err) => match err {
                ReportError::IoError(_) => ExitCode::IoError,
                ReportError::InvalidConfig(_) => ExitCode::ArgsError,
                ReportError::RecordError(_) => ExitCode::InputError,
                ReportError::JsonError(_) | ReportError::RenderError(_) => ExitCode::InternalError,
            },
            CliError::Io { .. } => ExitCode::IoError,
            CliError::Internal(_) => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(CliError::Args("x".into()).exit_code(), ExitCode::ArgsError);
        assert_eq!(
            CliError::from(pm_config::ValidationError::ParseError("bad".into())).exit_code(),
            ExitCode::ConfigError
        );
        assert_eq!(
            CliError::from(pm_common::Error::UnexpectedShape("string".into())).exit_code(),
            ExitCode::InputError
        );
        assert_eq!(
            CliError::from(ReportError::InvalidConfig("rows".into())).exit_code(),
            ExitCode::ArgsError
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(CliError::io("records.json", io).exit_code(), ExitCode::IoError);
    }

    #[test]
    fn test_messages_are_single_line() {
        let err = CliError::from(pm_config::ValidationError::InvalidValue {
            field: "export.title".into(),
            message: "must not be blank".into(),
        });
        let text = err.to_string();
        assert_eq!(
            text,
            "configuration error [65]: Invalid value for export.title: must not be blank"
        );
        assert!(!text.contains('\n'));
    }
}
