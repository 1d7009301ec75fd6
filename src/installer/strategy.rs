//! Installer trait implemented by every acquisition strategy

use std::path::Path;

use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::Platform;

/// `bin_name` of tools that ship no single standalone executable
/// (editor extension bundles, jar distributions).
pub const NO_EXECUTABLE: &str = "";

/// `version` of tools whose distribution point has no fixed version.
pub const VERSION_UNSPECIFIED: &str = "unspecified";

/// `version` of tools installed from a package manager's newest release.
pub const VERSION_LATEST: &str = "latest";

/// A unit capable of producing a runnable artifact for one named tool.
///
/// Implementations are constructed once per process from a base directory and
/// never change their directory afterwards.
#[async_trait::async_trait]
pub trait Installer: Send + Sync {
    /// Unique tool name; also the name of the tool's directory.
    fn name(&self) -> &str;

    /// File name of the executable inside [`Installer::dir`], or
    /// [`NO_EXECUTABLE`].
    fn bin_name(&self) -> &str;

    /// Directory owned exclusively by this tool.
    fn dir(&self) -> &Path;

    /// Executables that must be resolvable on `PATH` before installing.
    fn requires(&self) -> &[&'static str] {
        &[]
    }

    /// Platforms this installer is known to work on. Empty means unconstrained.
    fn supports(&self) -> &[Platform] {
        &[]
    }

    /// Dynamic pre-flight check, run after the static `requires`/`supports`
    /// checks. May record state that [`Installer::install`] relies on.
    async fn require_hook(&self, _ctx: &InstallContext) -> Result<(), InstallError> {
        Ok(())
    }

    /// Pinned version, [`VERSION_LATEST`] or [`VERSION_UNSPECIFIED`].
    fn version(&self) -> &str;

    /// Fetches/builds the artifact into [`Installer::dir`]. On success
    /// `dir/bin_name` is runnable unless `bin_name` is [`NO_EXECUTABLE`].
    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError>;
}
