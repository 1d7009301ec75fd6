//! Installer test doubles

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use lsm::installer::gate::ProgramLocator;
use lsm::installer::{InstallContext, InstallError, Installer, OutputSink, Platform};

/// Context that discards subprocess output and progress bars.
pub fn quiet() -> InstallContext {
    InstallContext::default().with_output(OutputSink::Null)
}

/// Locator that only knows a fixed set of programs.
#[derive(Default)]
pub struct FixedLocator {
    programs: HashSet<String>,
}

impl FixedLocator {
    pub fn new(programs: &[&str]) -> Self {
        Self {
            programs: programs.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ProgramLocator for FixedLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.programs
            .contains(program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }
}

/// Hand-written installer whose checks and install outcome are configured
/// per test.
pub struct FakeInstaller {
    name: String,
    bin_name: String,
    dir: PathBuf,
    version: String,
    requires: Vec<&'static str>,
    supports: Vec<Platform>,
    hook_error: Option<String>,
    install_error: Option<String>,
    wait_for_cancel: bool,
    installs: Arc<AtomicUsize>,
}

impl FakeInstaller {
    pub fn new(base_dir: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            bin_name: name.to_string(),
            dir: base_dir.join(name),
            version: "1.0.0".to_string(),
            requires: Vec::new(),
            supports: Vec::new(),
            hook_error: None,
            install_error: None,
            wait_for_cancel: false,
            installs: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_bin_name(mut self, bin_name: &str) -> Self {
        self.bin_name = bin_name.to_string();
        self
    }

    pub fn with_requires(mut self, requires: &[&'static str]) -> Self {
        self.requires = requires.to_vec();
        self
    }

    pub fn with_supports(mut self, supports: &[Platform]) -> Self {
        self.supports = supports.to_vec();
        self
    }

    pub fn with_hook_error(mut self, message: &str) -> Self {
        self.hook_error = Some(message.to_string());
        self
    }

    /// Install writes a partial file, then fails with `message`.
    pub fn with_install_error(mut self, message: &str) -> Self {
        self.install_error = Some(message.to_string());
        self
    }

    /// Install blocks until the context is cancelled.
    pub fn waiting_for_cancel(mut self) -> Self {
        self.wait_for_cancel = true;
        self
    }

    /// Counter of `install` calls, shared with the boxed installer.
    pub fn install_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.installs)
    }
}

#[async_trait]
impl Installer for FakeInstaller {
    fn name(&self) -> &str {
        &self.name
    }

    fn bin_name(&self) -> &str {
        &self.bin_name
    }

    fn dir(&self) -> &Path {
        &self.dir
    }

    fn requires(&self) -> &[&'static str] {
        &self.requires
    }

    fn supports(&self) -> &[Platform] {
        &self.supports
    }

    async fn require_hook(&self, _ctx: &InstallContext) -> Result<(), InstallError> {
        match &self.hook_error {
            Some(message) => Err(InstallError::Preflight(message.clone())),
            None => Ok(()),
        }
    }

    fn version(&self) -> &str {
        &self.version
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        self.installs.fetch_add(1, Ordering::SeqCst);

        if self.wait_for_cancel {
            ctx.cancelled().await;
            return Err(InstallError::Cancelled);
        }

        if let Some(message) = &self.install_error {
            std::fs::write(self.dir.join("partial"), "half")
                .map_err(InstallError::fs("write", self.dir.join("partial")))?;
            return Err(InstallError::Preflight(message.clone()));
        }

        if self.bin_name.is_empty() {
            let bundle = self.dir.join("extension");
            return std::fs::create_dir_all(&bundle).map_err(InstallError::fs("create", bundle));
        }

        let bin = self.dir.join(&self.bin_name);
        std::fs::write(&bin, "#!/bin/sh\n").map_err(InstallError::fs("write", &bin))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755))
                .map_err(InstallError::fs("chmod", &bin))?;
        }
        Ok(())
    }
}
