use std::path::Path;

use crate::installer::base::BaseInstaller;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::strategy::{Installer, NO_EXECUTABLE, VERSION_LATEST};

const NAME: &str = "eclipse.jdt.ls";
const SNAPSHOT: &str = "jdt-language-server-latest.tar.gz";
const DEFAULT_BASE_URL: &str = "https://download.eclipse.org/jdtls/snapshots";

/// Unpacks the latest Eclipse JDT snapshot. Editors launch it through
/// `java -jar plugins/org.eclipse.equinox.launcher_*.jar`.
pub struct JdtlsInstaller {
    base: BaseInstaller,
    base_url: String,
}

impl JdtlsInstaller {
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

    pub fn download_url(&self) -> String {
        format!("{}/{SNAPSHOT}", self.base_url)
    }
}

#[async_trait::async_trait]
impl Installer for JdtlsInstaller {
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
        VERSION_LATEST
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let archive = self.dir().join(SNAPSHOT);
        self.base
            .fetch_with_extract(ctx, &self.download_url(), &archive)
            .await
    }
}
