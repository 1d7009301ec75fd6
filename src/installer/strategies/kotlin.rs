use std::path::{Path, PathBuf};

use crate::installer::base::BaseInstaller;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::Platform;
use crate::installer::strategy::Installer;

const NAME: &str = "kotlin-language-server";
const VERSION: &str = "0.5.2";
const DEFAULT_BASE_URL: &str = "https://github.com/fwcd/kotlin-language-server/releases/download";

pub struct KotlinInstaller {
    base: BaseInstaller,
    bin_name: String,
    base_url: String,
}

impl KotlinInstaller {
    pub fn new(base_dir: &Path, platform: Platform) -> Self {
        Self {
            base: BaseInstaller::new(base_dir.join(NAME)),
            bin_name: platform.script(NAME),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn download_url(&self) -> String {
        format!("{}/{VERSION}/server.zip", self.base_url)
    }
}

#[async_trait::async_trait]
impl Installer for KotlinInstaller {
    fn name(&self) -> &str {
        NAME
    }

    fn bin_name(&self) -> &str {
        &self.bin_name
    }

    fn dir(&self) -> &Path {
        self.base.dir()
    }

    fn version(&self) -> &str {
        VERSION
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let archive = self.dir().join("server.zip");
        self.base
            .fetch_with_extract(ctx, &self.download_url(), &archive)
            .await?;

        let target: PathBuf = ["server", "bin", self.bin_name.as_str()].iter().collect();
        self.base.link(&target, &self.bin_name)
    }
}
