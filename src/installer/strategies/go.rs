//! Installers backed by `go install` with a private GOPATH

use std::ffi::OsStr;
use std::path::Path;

use tracing::debug;

use crate::installer::base::BaseInstaller;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::Platform;
use crate::installer::strategy::{Installer, VERSION_LATEST};

pub struct GoInstaller {
    base: BaseInstaller,
    module: String,
    name: String,
    bin_name: String,
    cgo: bool,
}

impl GoInstaller {
    /// `module` is the import path of the main package, e.g. `golang.org/x/tools/gopls`.
    /// Tools with `cgo` set need a working C compiler.
    pub fn new(base_dir: &Path, platform: Platform, module: &str, name: &str, cgo: bool) -> Self {
        Self {
            base: BaseInstaller::new(base_dir.join(name)),
            module: module.to_string(),
            name: name.to_string(),
            bin_name: platform.executable(name),
            cgo,
        }
    }

    async fn go(&self, ctx: &InstallContext, args: &[&str]) -> Result<(), InstallError> {
        let dir = self.dir().as_os_str();
        self.base
            .run_with_env(
                ctx,
                "go",
                args,
                &[
                    ("GOPATH", dir),
                    ("GOBIN", dir),
                    ("GO111MODULE", OsStr::new("on")),
                ],
            )
            .await
    }
}

/// Asks `go env CC` for the configured C compiler and checks it is on `PATH`.
async fn check_c_compiler(ctx: &InstallContext) -> Result<(), InstallError> {
    let output = tokio::select! {
        biased;
        () = ctx.cancelled() => return Err(InstallError::Cancelled),
        output = tokio::process::Command::new("go").args(["env", "CC"]).output() => {
            output.map_err(|source| InstallError::Spawn {
                program: "go".to_string(),
                source,
            })?
        }
    };
    if !output.status.success() {
        return Err(InstallError::Subprocess {
            program: "go env CC".to_string(),
            status: output.status,
        });
    }

    let cc = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if cc.is_empty() {
        return Err(InstallError::Preflight(
            "no C compiler configured for cgo (go env CC is empty)".to_string(),
        ));
    }
    let path = which::which(&cc).map_err(|e| {
        InstallError::Preflight(format!("C compiler {cc:?} is not available: {e}"))
    })?;
    debug!("cgo will use {:?}", path);
    Ok(())
}

#[async_trait::async_trait]
impl Installer for GoInstaller {
    fn name(&self) -> &str {
        &self.name
    }

    fn bin_name(&self) -> &str {
        &self.bin_name
    }

    fn dir(&self) -> &Path {
        self.base.dir()
    }

    fn requires(&self) -> &[&'static str] {
        &["go"]
    }

    async fn require_hook(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        if !self.cgo {
            return Ok(());
        }
        check_c_compiler(ctx).await
    }

    fn version(&self) -> &str {
        VERSION_LATEST
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let target = format!("{}@latest", self.module);
        self.go(ctx, &["install", &target]).await?;
        self.go(ctx, &["clean", "-modcache"]).await?;

        let src = self.dir().join("src");
        match tokio::fs::remove_dir_all(&src).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(InstallError::fs("remove", src)(e)),
        }
    }
}
