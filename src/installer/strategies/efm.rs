use std::path::{Path, PathBuf};

use crate::installer::base::BaseInstaller;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::{GENERAL_SUPPORTS, Os, Platform};
use crate::installer::strategy::Installer;

const NAME: &str = "efm-langserver";
const VERSION: &str = "0.0.14";
const DEFAULT_BASE_URL: &str = "https://github.com/mattn/efm-langserver/releases/download";

pub struct EfmInstaller {
    base: BaseInstaller,
    bin_name: String,
    platform: Platform,
    base_url: String,
}

impl EfmInstaller {
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

    fn archive_ext(&self) -> Result<&'static str, InstallError> {
        match self.platform.os {
            Os::Linux => Ok("tar.gz"),
            Os::Darwin | Os::Windows => Ok("zip"),
            _ => Err(InstallError::UnsupportedPlatform {
                tool: NAME.to_string(),
                platform: self.platform,
            }),
        }
    }

    /// Release directory name, which is also the top-level directory inside
    /// the archive.
    fn target(&self) -> String {
        format!("{NAME}_v{VERSION}_{}_amd64", self.platform.os.as_str())
    }

    pub fn download_url(&self) -> Result<String, InstallError> {
        Ok(format!(
            "{}/v{VERSION}/{}.{}",
            self.base_url,
            self.target(),
            self.archive_ext()?
        ))
    }
}

#[async_trait::async_trait]
impl Installer for EfmInstaller {
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
        let archive = self
            .dir()
            .join(format!("{}.{}", self.target(), self.archive_ext()?));
        self.base.fetch_with_extract(ctx, &url, &archive).await?;

        let target: PathBuf = [self.target(), self.bin_name.clone()].iter().collect();
        self.base.link(&target, &self.bin_name)
    }
}
