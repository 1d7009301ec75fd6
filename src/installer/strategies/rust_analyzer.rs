use std::path::Path;

use crate::installer::base::BaseInstaller;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::{GENERAL_SUPPORTS, Os, Platform};
use crate::installer::strategy::Installer;

const NAME: &str = "rust-analyzer";
const VERSION: &str = "2020-05-11";
const DEFAULT_BASE_URL: &str = "https://github.com/rust-analyzer/rust-analyzer/releases/download";

/// Downloads the prebuilt binary directly; no archive involved.
pub struct RustAnalyzerInstaller {
    base: BaseInstaller,
    bin_name: String,
    platform: Platform,
    base_url: String,
}

impl RustAnalyzerInstaller {
    pub fn new(base_dir: &Path, platform: Platform) -> Self {
        Self {
            base: BaseInstaller::new(base_dir.join(NAME)),
            bin_name: platform.executable(NAME),
            platform,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn download_url(&self) -> Result<String, InstallError> {
        let asset = match self.platform.os {
            Os::Darwin => "mac",
            Os::Linux => "linux",
            Os::Windows => "windows.exe",
            _ => {
                return Err(InstallError::UnsupportedPlatform {
                    tool: NAME.to_string(),
                    platform: self.platform,
                });
            }
        };
        Ok(format!("{}/{VERSION}/{NAME}-{asset}", self.base_url))
    }
}

#[async_trait::async_trait]
impl Installer for RustAnalyzerInstaller {
    fn name(&self) -> &str {
        NAME
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
        VERSION
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let url = self.download_url()?;
        let bin = self.dir().join(&self.bin_name);
        self.base.download(ctx, &url, &bin).await?;
        self.base.set_executable(&bin)
    }
}
