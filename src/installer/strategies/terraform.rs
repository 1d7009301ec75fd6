//! Terraform language servers published as per-platform release archives.

use std::path::Path;

use crate::installer::base::BaseInstaller;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::{Arch, GENERAL_SUPPORTS, Os, Platform};
use crate::installer::strategy::Installer;

const LS_NAME: &str = "terraform-ls";
const LS_VERSION: &str = "0.2.0";
const LS_BASE_URL: &str = "https://github.com/hashicorp/terraform-ls/releases/download";

const LSP_NAME: &str = "terraform-lsp";
const LSP_VERSION: &str = "0.0.11-beta1";
const LSP_BASE_URL: &str = "https://github.com/juliosueiras/terraform-lsp/releases/download";

/// Platforms with a published terraform-ls build.
pub const TERRAFORM_LS_SUPPORTS: &[Platform] = &[
    Platform::new(Os::Darwin, Arch::Amd64),
    Platform::new(Os::FreeBsd, Arch::I386),
    Platform::new(Os::FreeBsd, Arch::Amd64),
    Platform::new(Os::FreeBsd, Arch::Arm),
    Platform::new(Os::Linux, Arch::I386),
    Platform::new(Os::Linux, Arch::Amd64),
    Platform::new(Os::Linux, Arch::Arm),
    Platform::new(Os::OpenBsd, Arch::I386),
    Platform::new(Os::OpenBsd, Arch::Amd64),
    Platform::new(Os::Solaris, Arch::Amd64),
    Platform::new(Os::Windows, Arch::I386),
    Platform::new(Os::Windows, Arch::Amd64),
];

/// HashiCorp's terraform-ls; the zip holds the binary at its root.
pub struct TerraformLsInstaller {
    base: BaseInstaller,
    bin_name: String,
    platform: Platform,
    base_url: String,
}

impl TerraformLsInstaller {
    pub fn new(base_dir: &Path, platform: Platform) -> Self {
        Self {
            base: BaseInstaller::new(base_dir.join(LS_NAME)),
            bin_name: platform.executable(LS_NAME),
            platform,
            base_url: LS_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn asset(&self) -> String {
        format!(
            "{LS_NAME}_{LS_VERSION}_{}_{}.zip",
            self.platform.os.as_str(),
            self.platform.arch.as_str()
        )
    }

    pub fn download_url(&self) -> String {
        format!("{}/v{LS_VERSION}/{}", self.base_url, self.asset())
    }
}

#[async_trait::async_trait]
impl Installer for TerraformLsInstaller {
    fn name(&self) -> &str {
        LS_NAME
    }

    fn bin_name(&self) -> &str {
        &self.bin_name
    }

    fn dir(&self) -> &Path {
        self.base.dir()
    }

    fn supports(&self) -> &[Platform] {
        TERRAFORM_LS_SUPPORTS
    }

    fn version(&self) -> &str {
        LS_VERSION
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let archive = self.dir().join(self.asset());
        self.base
            .fetch_with_extract(ctx, &self.download_url(), &archive)
            .await
    }
}

/// juliosueiras/terraform-lsp; amd64 tarballs with the binary at the root.
pub struct TerraformLspInstaller {
    base: BaseInstaller,
    bin_name: String,
    platform: Platform,
    base_url: String,
}

impl TerraformLspInstaller {
    pub fn new(base_dir: &Path, platform: Platform) -> Self {
        Self {
            base: BaseInstaller::new(base_dir.join(LSP_NAME)),
            bin_name: platform.executable(LSP_NAME),
            platform,
            base_url: LSP_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn asset(&self) -> String {
        format!(
            "{LSP_NAME}_{LSP_VERSION}_{}_amd64.tar.gz",
            self.platform.os.as_str()
        )
    }

    pub fn download_url(&self) -> String {
        format!("{}/v{LSP_VERSION}/{}", self.base_url, self.asset())
    }
}

#[async_trait::async_trait]
impl Installer for TerraformLspInstaller {
    fn name(&self) -> &str {
        LSP_NAME
    }

    fn bin_name(&self) -> &str {
        &self.bin_name
    }

    fn dir(&self) -> &Path {
        self.base.dir()
    }

    fn supports(&self) -> &[Platform] {
        GENERAL_SUPPORTS
    }

    fn version(&self) -> &str {
        LSP_VERSION
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let archive = self.dir().join(self.asset());
        self.base
            .fetch_with_extract(ctx, &self.download_url(), &archive)
            .await
    }
}
