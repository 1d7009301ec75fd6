//! Execution context handed to every installer operation.

use std::process::Stdio;

use indicatif::ProgressDrawTarget;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::installer::error::InstallError;

/// Where subprocess output and download progress go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSink {
    /// Forward to the terminal of the calling process.
    #[default]
    Inherit,
    /// Discard everything.
    Null,
}

impl OutputSink {
    pub fn stdio(&self) -> Stdio {
        match self {
            OutputSink::Inherit => Stdio::inherit(),
            OutputSink::Null => Stdio::null(),
        }
    }

    pub fn progress_target(&self) -> ProgressDrawTarget {
        match self {
            OutputSink::Inherit => ProgressDrawTarget::stderr(),
            OutputSink::Null => ProgressDrawTarget::hidden(),
        }
    }
}

/// Cancellation and output configuration shared by the steps of one install.
#[derive(Debug, Clone, Default)]
pub struct InstallContext {
    cancel: CancellationToken,
    output: OutputSink,
}

impl InstallContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            output: OutputSink::default(),
        }
    }

    pub fn with_output(mut self, output: OutputSink) -> Self {
        self.output = output;
        self
    }

    pub fn output(&self) -> OutputSink {
        self.output
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once this context (or any ancestor) is cancelled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }

    /// Fails with [`InstallError::Cancelled`] if cancellation was requested.
    pub fn checkpoint(&self) -> Result<(), InstallError> {
        if self.is_cancelled() {
            Err(InstallError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// A context that is cancelled together with `self` but can also be
    /// cancelled on its own without affecting `self`.
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            output: self.output,
        }
    }
}
