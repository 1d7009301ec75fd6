//! Installers backed by `pip` inside a private virtual environment

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, OnceLock};

use regex::Regex;
use semver::Version;
use tracing::{debug, info};

use crate::installer::base::BaseInstaller;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::Platform;
use crate::installer::strategy::{Installer, VERSION_LATEST};

/// Interpreters at or below this version are rejected.
const MIN_EXCLUSIVE_PYTHON: Version = Version::new(3, 5, 0);

static PYTHON_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("python version pattern is valid")
});

/// Extracts the interpreter version from a `python --version` banner such as
/// `Python 3.8.2`, `Python 3.12.0rc1` or `Python 3.9.1+`.
pub fn parse_python_version(banner: &str) -> Option<Version> {
    let caps = PYTHON_VERSION_RE.captures(banner)?;
    let part = |i: usize| -> Option<u64> {
        caps.get(i)
            .map(|m| m.as_str().parse().ok())
            .unwrap_or(Some(0))
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

pub fn is_supported_python(version: &Version) -> bool {
    *version > MIN_EXCLUSIVE_PYTHON
}

pub struct PipInstaller {
    base: BaseInstaller,
    package: String,
    bin_name: String,
    platform: Platform,
    python: OnceLock<String>,
}

impl PipInstaller {
    pub fn new(base_dir: &Path, platform: Platform, package: &str, bin_name: &str) -> Self {
        Self {
            base: BaseInstaller::new(base_dir.join(package)),
            package: package.to_string(),
            bin_name: platform.executable(bin_name),
            platform,
            python: OnceLock::new(),
        }
    }

    /// Interpreter chosen by the pre-flight hook, if it has run.
    pub fn python(&self) -> Option<&str> {
        self.python.get().map(String::as_str)
    }

    fn venv_bin_dir(&self) -> PathBuf {
        let bin = if self.platform.os.is_windows() {
            "Scripts"
        } else {
            "bin"
        };
        Path::new("venv").join(bin)
    }

    /// Prefers `python3` outside Windows, otherwise a `python` that reports a
    /// supported version.
    async fn find_python(&self, ctx: &InstallContext) -> Result<String, InstallError> {
        if !self.platform.os.is_windows() && which::which("python3").is_ok() {
            return Ok("python3".to_string());
        }
        which::which("python")
            .map_err(|_| InstallError::Preflight("no python found".to_string()))?;

        let output = tokio::select! {
            biased;
            () = ctx.cancelled() => return Err(InstallError::Cancelled),
            output = tokio::process::Command::new("python").arg("--version").output() => {
                output.map_err(|source| InstallError::Spawn {
                    program: "python".to_string(),
                    source,
                })?
            }
        };
        // Python 2 prints its banner on stderr.
        let banner = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let version = parse_python_version(&banner).ok_or_else(|| {
            InstallError::Preflight(format!("invalid python version output {:?}", banner.trim()))
        })?;
        if !is_supported_python(&version) {
            return Err(InstallError::Preflight(format!(
                "unsupported python version: {version}"
            )));
        }
        debug!("Using python {}", version);
        Ok("python".to_string())
    }
}

#[async_trait::async_trait]
impl Installer for PipInstaller {
    fn name(&self) -> &str {
        &self.package
    }

    fn bin_name(&self) -> &str {
        &self.bin_name
    }

    fn dir(&self) -> &Path {
        self.base.dir()
    }

    async fn require_hook(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        if self.python.get().is_none() {
            let python = self.find_python(ctx).await?;
            info!("{} will use {}", self.package, python);
            let _ = self.python.set(python);
        }
        Ok(())
    }

    fn version(&self) -> &str {
        VERSION_LATEST
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let python = match self.python.get() {
            Some(python) => python.clone(),
            None => self.find_python(ctx).await?,
        };

        self.base.run(ctx, &python, ["-m", "venv", "venv"]).await?;

        let venv_bin = self.venv_bin_dir();
        let venv_python = self.dir().join(&venv_bin).join(self.platform.executable("python"));
        self.base
            .run(ctx, &venv_python, ["-m", "pip", "install", "--upgrade", "pip"])
            .await?;
        self.base
            .run(ctx, &venv_python, ["-m", "pip", "install", self.package.as_str()])
            .await?;

        self.base.link(&venv_bin.join(&self.bin_name), &self.bin_name)
    }
}
