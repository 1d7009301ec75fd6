//! Registry of installers and the install/uninstall/list lifecycle.
//!
//! A tool's state lives entirely on disk: its directory under the base
//! directory either holds a complete installation, is absent, or is left
//! partially populated by a failed install.

pub mod error;
pub mod list;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};

pub use error::{AppError, Step};
pub use list::{ListStyle, ServerStatus, render};

use crate::config::Config;
use crate::installer::gate::{self, ProgramLocator, SystemLocator};
use crate::installer::strategies::default_installers;
use crate::installer::{InstallContext, InstallError, Installer, Platform};

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub name: String,
    pub version: String,
    pub dir: PathBuf,
}

pub struct App {
    base_dir: PathBuf,
    platform: Platform,
    installers: IndexMap<String, Box<dyn Installer>>,
    locator: Arc<dyn ProgramLocator>,
}

impl App {
    /// Registry holding every supported tool.
    pub fn new(base_dir: PathBuf, platform: Platform) -> Self {
        let installers = default_installers(&base_dir, platform);
        Self::with_installers(base_dir, platform, installers)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_dir.clone(), config.platform)
    }

    pub fn with_installers(
        base_dir: PathBuf,
        platform: Platform,
        installers: Vec<Box<dyn Installer>>,
    ) -> Self {
        let mut app = Self {
            base_dir,
            platform,
            installers: IndexMap::new(),
            locator: Arc::new(SystemLocator),
        };
        for installer in installers {
            app.register(installer);
        }
        app
    }

    /// Adds an installer, replacing any previous one with the same name.
    pub fn register(&mut self, installer: Box<dyn Installer>) {
        self.installers
            .insert(installer.name().to_string(), installer);
    }

    pub fn with_locator(mut self, locator: Arc<dyn ProgramLocator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.installers.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Result<&dyn Installer, AppError> {
        self.installers
            .get(name)
            .map(|installer| installer.as_ref())
            .ok_or_else(|| AppError::NotFound(name.to_string()))
    }

    /// Gates, resets and installs `name`. A failure after the directory has
    /// been reset leaves whatever the failed step produced.
    pub async fn install(
        &self,
        ctx: &InstallContext,
        name: &str,
    ) -> Result<InstallReport, AppError> {
        let installer = self.get(name)?;

        gate::check(installer, self.platform, self.locator.as_ref(), ctx)
            .await
            .map_err(AppError::step(name, Step::Gate))?;

        let dir = installer.dir();
        reset_dir(dir)
            .await
            .map_err(AppError::step(name, Step::PrepareDir))?;

        installer
            .install(ctx)
            .await
            .map_err(AppError::step(name, Step::Install))?;

        info!("{} {} installed into {:?}", name, installer.version(), dir);
        Ok(InstallReport {
            name: name.to_string(),
            version: installer.version().to_string(),
            dir: dir.to_path_buf(),
        })
    }

    /// Removes the tool's directory. Removing an absent directory succeeds.
    pub async fn uninstall(&self, name: &str) -> Result<PathBuf, AppError> {
        let installer = self.get(name)?;
        let dir = installer.dir();

        match tokio::fs::remove_dir_all(dir).await {
            Ok(()) => info!("{} uninstalled from {:?}", name, dir),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} is not installed, nothing to remove", name);
            }
            Err(e) => {
                return Err(AppError::step(name, Step::Uninstall)(InstallError::fs(
                    "remove", dir,
                )(e)));
            }
        }
        Ok(dir.to_path_buf())
    }

    /// Installed-state snapshot of every registered tool, sorted by name.
    pub fn list(&self) -> Result<Vec<ServerStatus>, AppError> {
        std::fs::create_dir_all(&self.base_dir)?;

        let mut present = HashSet::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                present.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }

        let mut statuses: Vec<ServerStatus> = self
            .installers
            .values()
            .map(|installer| ServerStatus {
                name: installer.name().to_string(),
                version: installer.version().to_string(),
                installed: present.contains(installer.name()) && is_installed(installer.as_ref()),
            })
            .collect();
        statuses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(statuses)
    }
}

async fn reset_dir(dir: &Path) -> Result<(), InstallError> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => debug!("Removed previous installation at {:?}", dir),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(InstallError::fs("remove", dir)(e)),
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(InstallError::fs("create", dir))
}

/// Tools without a standalone executable count as installed once their
/// directory has content.
fn is_installed(installer: &dyn Installer) -> bool {
    if installer.bin_name().is_empty() {
        return std::fs::read_dir(installer.dir())
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
    }
    is_executable(&installer.dir().join(installer.bin_name()))
}

/// Follows symlinks, so a dangling link is not executable.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn is_executable_requires_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tool");
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(&path));

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&path));
    }

    #[cfg(unix)]
    #[test]
    fn is_executable_rejects_dangling_link() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("tool");
        std::os::unix::fs::symlink(temp.path().join("missing"), &link).unwrap();

        assert!(!is_executable(&link));
    }

    #[test]
    fn is_executable_rejects_directories_and_missing_files() {
        let temp = TempDir::new().unwrap();

        assert!(!is_executable(temp.path()));
        assert!(!is_executable(&temp.path().join("missing")));
    }

    #[tokio::test]
    async fn reset_dir_clears_previous_content() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("gopls");
        std::fs::create_dir_all(dir.join("src")).unwrap();
        std::fs::write(dir.join("gopls"), "old").unwrap();

        reset_dir(&dir).await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn default_registry_contains_every_tool() {
        let temp = TempDir::new().unwrap();
        let app = App::new(temp.path().to_path_buf(), Platform::current());

        assert!(app.get("efm-langserver").is_ok());
        assert!(app.get("microsoft-python-language-server").is_ok());
        assert!(matches!(
            app.get("no-such-server"),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(app.names().count(), 22);
    }
}
