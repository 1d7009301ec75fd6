//! Primitives shared by every acquisition strategy: download, extract, run.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::USER_AGENT;
use crate::installer::archive;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;

/// Builds the HTTP client used for every download.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to create HTTP client")
}

/// Directory ownership plus the download/extract/run capabilities composed
/// into every strategy.
#[derive(Debug, Clone)]
pub struct BaseInstaller {
    dir: PathBuf,
    client: reqwest::Client,
}

impl BaseInstaller {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            client: http_client(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// GETs `url` and streams the body into `dst`, reporting progress.
    ///
    /// Any non-success status fails with [`InstallError::Status`] carrying the
    /// response body. The destination file is closed on every exit path.
    pub async fn download(
        &self,
        ctx: &InstallContext,
        url: &str,
        dst: &Path,
    ) -> Result<(), InstallError> {
        debug!("Downloading {} to {:?}", url, dst);

        let network = |source| InstallError::Network {
            url: url.to_string(),
            source,
        };

        let mut response = tokio::select! {
            biased;
            () = ctx.cancelled() => return Err(InstallError::Cancelled),
            response = self.client.get(url).send() => response.map_err(network)?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(network)?;
            return Err(InstallError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let mut file = tokio::fs::File::create(dst)
            .await
            .map_err(InstallError::fs("create", dst))?;

        let bar = ProgressBar::with_draw_target(
            response.content_length(),
            ctx.output().progress_target(),
        );
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {bytes}/{total_bytes} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        loop {
            let chunk = tokio::select! {
                biased;
                () = ctx.cancelled() => {
                    bar.abandon();
                    return Err(InstallError::Cancelled);
                }
                chunk = response.chunk() => chunk.map_err(network)?,
            };
            let Some(chunk) = chunk else {
                break;
            };
            file.write_all(&chunk)
                .await
                .map_err(InstallError::fs("write", dst))?;
            bar.inc(chunk.len() as u64);
        }

        file.flush().await.map_err(InstallError::fs("write", dst))?;
        bar.finish_and_clear();
        Ok(())
    }

    /// Unpacks `archive` into the installer directory, then removes the
    /// archive whether or not unpacking succeeded.
    pub async fn extract(&self, archive: &Path) -> Result<(), InstallError> {
        let source = archive.to_path_buf();
        let dest = self.dir.clone();
        let result = tokio::task::spawn_blocking(move || archive::unpack(&source, &dest))
            .await
            .unwrap_or_else(|e| Err(InstallError::extraction(archive, e)));

        if let Err(e) = tokio::fs::remove_file(archive).await {
            warn!("Failed to remove archive {:?}: {}", archive, e);
        }
        result
    }

    /// Downloads `url` to `archive` and unpacks it into the installer directory.
    pub async fn fetch_with_extract(
        &self,
        ctx: &InstallContext,
        url: &str,
        archive: &Path,
    ) -> Result<(), InstallError> {
        self.download(ctx, url, archive).await?;
        ctx.checkpoint()?;
        self.extract(archive).await
    }

    /// Runs `program` with the installer directory as working directory.
    pub async fn run<I, S>(
        &self,
        ctx: &InstallContext,
        program: impl AsRef<OsStr>,
        args: I,
    ) -> Result<(), InstallError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.run_with_env(ctx, program, args, &[]).await
    }

    /// Like [`BaseInstaller::run`], with extra variables set only for the
    /// spawned process.
    pub async fn run_with_env<I, S>(
        &self,
        ctx: &InstallContext,
        program: impl AsRef<OsStr>,
        args: I,
        envs: &[(&str, &OsStr)],
    ) -> Result<(), InstallError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let program_name = Path::new(program).display().to_string();

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(&self.dir)
            .envs(envs.iter().copied())
            .stdin(std::process::Stdio::null())
            .stdout(ctx.output().stdio())
            .stderr(ctx.output().stdio())
            .kill_on_drop(true);

        debug!("Running {:?} in {:?}", command.as_std(), self.dir);
        let mut child = command.spawn().map_err(|source| InstallError::Spawn {
            program: program_name.clone(),
            source,
        })?;

        let status = tokio::select! {
            biased;
            () = ctx.cancelled() => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill {}: {}", program_name, e);
                }
                return Err(InstallError::Cancelled);
            }
            status = child.wait() => status.map_err(|source| InstallError::Spawn {
                program: program_name.clone(),
                source,
            })?,
        };

        if !status.success() {
            return Err(InstallError::Subprocess {
                program: program_name,
                status,
            });
        }
        Ok(())
    }

    /// Creates `dir/bin_name` as a link to `target`, which is interpreted
    /// relative to the installer directory.
    pub fn link(&self, target: &Path, bin_name: &str) -> Result<(), InstallError> {
        let link = self.dir.join(bin_name);
        symlink(target, &link).map_err(InstallError::fs("link", link))
    }

    /// Marks `path` executable (0755). No-op where no such bit exists.
    pub fn set_executable(&self, path: &Path) -> Result<(), InstallError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
                .map_err(InstallError::fs("chmod", path))?;
        }
        #[cfg(not(unix))]
        let _ = path;
        Ok(())
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
