//! Metals is bootstrapped by coursier, which resolves the server's JVM
//! dependencies and writes a launcher script.

use std::path::Path;

use tracing::info;

use crate::installer::base::BaseInstaller;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::Platform;
use crate::installer::strategy::Installer;

const NAME: &str = "metals";
const VERSION: &str = "0.9.0";
const COURSIER_URL: &str = "https://git.io/coursier-cli";
const COURSIER_BAT_URL: &str = "https://git.io/coursier-bat";

pub struct MetalsInstaller {
    base: BaseInstaller,
    bin_name: String,
    platform: Platform,
    coursier_url: String,
    coursier_bat_url: String,
}

impl MetalsInstaller {
    pub fn new(base_dir: &Path, platform: Platform) -> Self {
        Self {
            base: BaseInstaller::new(base_dir.join(NAME)),
            bin_name: platform.script(NAME),
            platform,
            coursier_url: COURSIER_URL.to_string(),
            coursier_bat_url: COURSIER_BAT_URL.to_string(),
        }
    }

    pub fn with_coursier_urls(mut self, launcher: &str, bat: &str) -> Self {
        self.coursier_url = launcher.to_string();
        self.coursier_bat_url = bat.to_string();
        self
    }

    fn bootstrap_args(&self) -> Vec<String> {
        let artifact = format!("org.scalameta:metals_2.12:{VERSION}");
        let output = self.dir().join(NAME).display().to_string();
        [
            "-jar",
            "coursier",
            "bootstrap",
            "--ttl",
            "Inf",
            artifact.as_str(),
            "-r",
            "bintray:scalacenter/releases",
            "-r",
            "sonatype:public",
            "-o",
            output.as_str(),
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

#[async_trait::async_trait]
impl Installer for MetalsInstaller {
    fn name(&self) -> &str {
        NAME
    }

    fn bin_name(&self) -> &str {
        &self.bin_name
    }

    fn dir(&self) -> &Path {
        self.base.dir()
    }

    fn requires(&self) -> &[&'static str] {
        &["java"]
    }

    fn version(&self) -> &str {
        VERSION
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        info!("Downloading coursier launcher");
        let coursier = self.dir().join("coursier");
        self.base.download(ctx, &self.coursier_url, &coursier).await?;
        self.base.set_executable(&coursier)?;

        if self.platform.os.is_windows() {
            let bat = self.dir().join("coursier.bat");
            self.base.download(ctx, &self.coursier_bat_url, &bat).await?;
        }

        self.base.run(ctx, "java", self.bootstrap_args()).await
    }
}
