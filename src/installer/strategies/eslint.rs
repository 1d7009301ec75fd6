use std::path::Path;

use crate::installer::base::BaseInstaller;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::strategy::{Installer, NO_EXECUTABLE};

const NAME: &str = "eslint-server";
const VERSION: &str = "2.1.4-next.1";
const DEFAULT_BASE_URL: &str = "https://github.com/microsoft/vscode-eslint/releases/download";

/// Unpacks the VS Code extension bundle. The server is a node script the
/// editor starts itself, so there is no executable to probe.
pub struct EslintServerInstaller {
    base: BaseInstaller,
    base_url: String,
}

impl EslintServerInstaller {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base: BaseInstaller::new(base_dir.join(NAME)),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Release tags carry pre-release suffixes the asset names drop.
    fn asset(&self) -> String {
        let normalized = VERSION.split('-').next().unwrap_or(VERSION);
        format!("vscode-eslint-{normalized}.vsix")
    }

    pub fn download_url(&self) -> String {
        format!("{}/release%2F{VERSION}/{}", self.base_url, self.asset())
    }
}

#[async_trait::async_trait]
impl Installer for EslintServerInstaller {
    fn name(&self) -> &str {
        NAME
    }

    fn bin_name(&self) -> &str {
        NO_EXECUTABLE
    }

    fn dir(&self) -> &Path {
        self.base.dir()
    }

    fn version(&self) -> &str {
        VERSION
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let archive = self.dir().join(self.asset());
        self.base
            .fetch_with_extract(ctx, &self.download_url(), &archive)
            .await
    }
}
