//! Pre-flight checks run before any install attempt.
//!
//! Order: platform support, static prerequisites on `PATH`, then the
//! installer's dynamic hook. The first failure stops the sequence.

use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::{Platform, is_supported};
use crate::installer::strategy::Installer;

/// Resolves executable names against the search path.
#[cfg_attr(test, automock)]
pub trait ProgramLocator: Send + Sync {
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Looks programs up on the process `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocator;

impl ProgramLocator for SystemLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

pub fn check_platform(installer: &dyn Installer, platform: Platform) -> Result<(), InstallError> {
    if is_supported(installer.supports(), platform) {
        return Ok(());
    }
    warn!("{} does not support {}", installer.name(), platform);
    Err(InstallError::UnsupportedPlatform {
        tool: installer.name().to_string(),
        platform,
    })
}

pub fn check_requires(
    installer: &dyn Installer,
    locator: &dyn ProgramLocator,
) -> Result<(), InstallError> {
    for program in installer.requires() {
        match locator.locate(program) {
            Some(path) => debug!("{} requires {}: found {:?}", installer.name(), program, path),
            None => {
                warn!("{} requires {}, which is not in PATH", installer.name(), program);
                return Err(InstallError::PrerequisiteMissing {
                    tool: installer.name().to_string(),
                    program: program.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Runs every gate in order, stopping at the first failure.
pub async fn check(
    installer: &dyn Installer,
    platform: Platform,
    locator: &dyn ProgramLocator,
    ctx: &InstallContext,
) -> Result<(), InstallError> {
    check_platform(installer, platform)?;
    check_requires(installer, locator)?;
    installer.require_hook(ctx).await.inspect_err(|e| {
        warn!("Pre-flight hook for {} failed: {}", installer.name(), e);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::platform::{Arch, GENERAL_SUPPORTS, Os};
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct GatedInstaller {
        requires: &'static [&'static str],
        supports: &'static [Platform],
        hook_fails: bool,
        hook_called: AtomicBool,
    }

    impl GatedInstaller {
        fn new(
            requires: &'static [&'static str],
            supports: &'static [Platform],
            hook_fails: bool,
        ) -> Self {
            Self {
                requires,
                supports,
                hook_fails,
                hook_called: AtomicBool::new(false),
            }
        }
    }

    #[async_trait::async_trait]
    impl Installer for GatedInstaller {
        fn name(&self) -> &str {
            "gated"
        }

        fn bin_name(&self) -> &str {
            "gated"
        }

        fn dir(&self) -> &Path {
            Path::new("/nonexistent/gated")
        }

        fn requires(&self) -> &[&'static str] {
            self.requires
        }

        fn supports(&self) -> &[Platform] {
            self.supports
        }

        async fn require_hook(&self, _ctx: &InstallContext) -> Result<(), InstallError> {
            self.hook_called.store(true, Ordering::SeqCst);
            if self.hook_fails {
                Err(InstallError::Preflight("no C compiler".to_string()))
            } else {
                Ok(())
            }
        }

        fn version(&self) -> &str {
            "1.0.0"
        }

        async fn install(&self, _ctx: &InstallContext) -> Result<(), InstallError> {
            unreachable!("the gate never installs")
        }
    }

    const LINUX_AMD64: Platform = Platform::new(Os::Linux, Arch::Amd64);

    #[tokio::test]
    async fn check_passes_when_all_gates_pass() {
        let installer = GatedInstaller::new(&["node", "npm"], GENERAL_SUPPORTS, false);
        let mut locator = MockProgramLocator::new();
        locator
            .expect_locate()
            .times(2)
            .returning(|p| Some(PathBuf::from("/usr/bin").join(p)));

        let result = check(&installer, LINUX_AMD64, &locator, &InstallContext::default()).await;

        assert!(result.is_ok());
        assert!(installer.hook_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unsupported_platform_short_circuits_remaining_gates() {
        let installer = GatedInstaller::new(&["node"], GENERAL_SUPPORTS, false);
        let mut locator = MockProgramLocator::new();
        locator.expect_locate().never();

        let result = check(
            &installer,
            Platform::new(Os::Linux, Arch::Arm64),
            &locator,
            &InstallContext::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(InstallError::UnsupportedPlatform { .. })
        ));
        assert!(!installer.hook_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_matrix_is_treated_as_supported_everywhere() {
        let installer = GatedInstaller::new(&[], &[], false);
        let locator = MockProgramLocator::new();

        let result = check(
            &installer,
            Platform::new(Os::Solaris, Arch::Other),
            &locator,
            &InstallContext::default(),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn missing_prerequisite_stops_before_hook() {
        let installer = GatedInstaller::new(&["node", "npm"], &[], false);
        let mut locator = MockProgramLocator::new();
        locator
            .expect_locate()
            .withf(|p| p == "node")
            .times(1)
            .returning(|_| None);

        let result = check(&installer, LINUX_AMD64, &locator, &InstallContext::default()).await;

        match result {
            Err(InstallError::PrerequisiteMissing { tool, program }) => {
                assert_eq!(tool, "gated");
                assert_eq!(program, "node");
            }
            other => panic!("expected missing prerequisite, got {other:?}"),
        }
        assert!(!installer.hook_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failing_hook_is_reported_as_preflight_error() {
        let installer = GatedInstaller::new(&[], &[], true);
        let locator = MockProgramLocator::new();

        let result = check(&installer, LINUX_AMD64, &locator, &InstallContext::default()).await;

        assert!(matches!(result, Err(InstallError::Preflight(_))));
    }
}
