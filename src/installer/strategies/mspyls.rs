//! Microsoft Python Language Server: the server package is resolved from a
//! release listing, and it runs on a private .NET runtime. Both are fetched
//! at the same time.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::installer::base::BaseInstaller;
use crate::installer::catalog::{ReleaseCatalog, platform_token};
use crate::installer::concurrent::run_both;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::{Os, Platform};
use crate::installer::strategy::{Installer, NO_EXECUTABLE, VERSION_UNSPECIFIED};

const NAME: &str = "microsoft-python-language-server";
const LISTING_URL: &str = "https://pvsc.blob.core.windows.net/python-language-server-stable?restype=container&comp=list&prefix=Python-Language-Server";
const DOTNET_SCRIPT_BASE_URL: &str = "https://dot.net/v1";

pub struct MsPylsInstaller {
    base: BaseInstaller,
    platform: Platform,
    catalog: ReleaseCatalog,
    dotnet_script_base_url: String,
}

impl MsPylsInstaller {
    pub fn new(base_dir: &Path, platform: Platform) -> Self {
        Self {
            base: BaseInstaller::new(base_dir.join(NAME)),
            platform,
            catalog: ReleaseCatalog::new(LISTING_URL),
            dotnet_script_base_url: DOTNET_SCRIPT_BASE_URL.to_string(),
        }
    }

    pub fn with_listing_url(mut self, url: &str) -> Self {
        self.catalog = ReleaseCatalog::new(url);
        self
    }

    pub fn with_dotnet_script_base_url(mut self, base_url: &str) -> Self {
        self.dotnet_script_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn dotnet_dir(&self) -> PathBuf {
        self.dir().join("dotnet")
    }

    async fn install_server(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let release = self
            .catalog
            .resolve(ctx, platform_token(self.platform.os))
            .await?;
        let archive = self.dir().join(format!("{NAME}.zip"));
        self.base
            .fetch_with_extract(ctx, &release.url, &archive)
            .await
    }

    async fn install_dotnet(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        let script_name = match self.platform.os {
            Os::Windows => "dotnet-install.ps1",
            Os::Darwin | Os::Linux => "dotnet-install.sh",
            _ => {
                return Err(InstallError::Preflight(format!(
                    "no .NET install script for {}",
                    self.platform
                )));
            }
        };
        let url = format!("{}/{script_name}", self.dotnet_script_base_url);
        let script = self.dir().join(script_name);

        info!("Downloading {}", url);
        self.base.download(ctx, &url, &script).await?;
        self.base.set_executable(&script)?;
        ctx.checkpoint()?;

        let install_dir = self.dotnet_dir();
        if self.platform.os.is_windows() {
            self.base
                .run(
                    ctx,
                    "powershell",
                    [
                        OsStr::new("-NoProfile"),
                        OsStr::new("-ExecutionPolicy"),
                        OsStr::new("Bypass"),
                        OsStr::new("-File"),
                        script.as_os_str(),
                        OsStr::new("-InstallDir"),
                        install_dir.as_os_str(),
                    ],
                )
                .await
        } else {
            self.base
                .run(
                    ctx,
                    &script,
                    [OsStr::new("--install-dir"), install_dir.as_os_str()],
                )
                .await
        }
    }
}

#[async_trait::async_trait]
impl Installer for MsPylsInstaller {
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
        VERSION_UNSPECIFIED
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), InstallError> {
        run_both(
            ctx,
            |ctx| async move { self.install_server(&ctx).await },
            |ctx| async move { self.install_dotnet(&ctx).await },
        )
        .await
    }
}
