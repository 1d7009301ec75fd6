use std::fmt;

use thiserror::Error;

use crate::installer::InstallError;

/// Lifecycle step an installer error happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Gate,
    PrepareDir,
    Install,
    Uninstall,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            Step::Gate => "pre-flight check",
            Step::PrepareDir => "preparing directory",
            Step::Install => "install",
            Step::Uninstall => "uninstall",
        };
        f.write_str(step)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{tool}: {step} failed")]
    Step {
        tool: String,
        step: Step,
        #[source]
        source: InstallError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn step(tool: &str, step: Step) -> impl FnOnce(InstallError) -> Self {
        let tool = tool.to_string();
        move |source| AppError::Step { tool, step, source }
    }

    /// The installer error behind a failed step, if any.
    pub fn install_error(&self) -> Option<&InstallError> {
        match self {
            AppError::Step { source, .. } => Some(source),
            _ => None,
        }
    }
}
