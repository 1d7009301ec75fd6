//! Installers backed by `npm install` into an isolated `node_modules`

use std::path::{Path, PathBuf};

use crate::installer::base::BaseInstaller;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::strategy::{Installer, VERSION_LATEST};

pub struct NpmInstaller {
    base: BaseInstaller,
    name: String,
    package: String,
    bin_name: String,
}

impl NpmInstaller {
    /// Tool named after its npm package.
    pub fn new(base_dir: &Path, package: &str, bin_name: &str) -> Self {
        Self::with_package(base_dir, package, package, bin_name)
    }

    /// Tool whose registered name differs from the npm package it installs.
    pub fn with_package(base_dir: &Path, name: &str, package: &str, bin_name: &str) -> Self {
        Self {
            base: BaseInstaller::new(base_dir.join(name)),
            name: name.to_string(),
            package: package.to_string(),
            bin_name: bin_name.to_string(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }
}

#[async_trait::async_trait]
impl Installer for NpmInstaller {
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
        &["node", "npm"]
    }

    fn version(&self) -> &str {
        VERSION_LATEST
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let manifest = self.dir().join("package.json");
        tokio::fs::write(&manifest, r#"{"name": ""}"#)
            .await
            .map_err(InstallError::fs("write", &manifest))?;

        self.base
            .run(ctx, "npm", ["install", self.package.as_str()])
            .await?;

        let target: PathBuf = ["node_modules", ".bin", self.bin_name.as_str()]
            .iter()
            .collect();
        self.base.link(&target, &self.bin_name)
    }
}
