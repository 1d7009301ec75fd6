//! Concrete acquisition strategies and the default tool registry.

pub mod efm;
pub mod eslint;
pub mod go;
pub mod jdtls;
pub mod kotlin;
pub mod metals;
pub mod mspyls;
pub mod npm;
pub mod pip;
pub mod rust_analyzer;
pub mod terraform;

use std::path::Path;

pub use efm::EfmInstaller;
pub use eslint::EslintServerInstaller;
pub use go::GoInstaller;
pub use jdtls::JdtlsInstaller;
pub use kotlin::KotlinInstaller;
pub use metals::MetalsInstaller;
pub use mspyls::MsPylsInstaller;
pub use npm::NpmInstaller;
pub use pip::PipInstaller;
pub use rust_analyzer::RustAnalyzerInstaller;
pub use terraform::{TerraformLsInstaller, TerraformLspInstaller};

use crate::installer::platform::Platform;
use crate::installer::strategy::Installer;

/// Every supported language server, each owning `base_dir/<name>`.
pub fn default_installers(base_dir: &Path, platform: Platform) -> Vec<Box<dyn Installer>> {
    vec![
        Box::new(NpmInstaller::new(base_dir, "bash-language-server", "bash-language-server")),
        Box::new(NpmInstaller::new(
            base_dir,
            "dockerfile-language-server-nodejs",
            "docker-langserver",
        )),
        Box::new(NpmInstaller::new(
            base_dir,
            "typescript-language-server",
            "typescript-language-server",
        )),
        Box::new(NpmInstaller::new(base_dir, "vim-language-server", "vim-language-server")),
        Box::new(NpmInstaller::new(base_dir, "vls", "vls")),
        Box::new(NpmInstaller::with_package(
            base_dir,
            "vscode-css-languageserver",
            "vscode-css-languageserver-bin",
            "css-languageserver",
        )),
        Box::new(NpmInstaller::with_package(
            base_dir,
            "vscode-html-languageserver",
            "vscode-html-languageserver-bin",
            "html-languageserver",
        )),
        Box::new(NpmInstaller::new(
            base_dir,
            "vscode-json-languageserver",
            "vscode-json-languageserver",
        )),
        Box::new(NpmInstaller::new(base_dir, "yaml-language-server", "yaml-language-server")),
        Box::new(GoInstaller::new(
            base_dir,
            platform,
            "golang.org/x/tools/gopls",
            "gopls",
            false,
        )),
        Box::new(GoInstaller::new(
            base_dir,
            platform,
            "github.com/lighttiger2505/sqls",
            "sqls",
            true,
        )),
        Box::new(PipInstaller::new(base_dir, platform, "python-language-server", "pyls")),
        Box::new(PipInstaller::new(base_dir, platform, "fortran-language-server", "fortls")),
        Box::new(EfmInstaller::new(base_dir, platform)),
        Box::new(RustAnalyzerInstaller::new(base_dir, platform)),
        Box::new(KotlinInstaller::new(base_dir, platform)),
        Box::new(MetalsInstaller::new(base_dir, platform)),
        Box::new(TerraformLsInstaller::new(base_dir, platform)),
        Box::new(TerraformLspInstaller::new(base_dir, platform)),
        Box::new(EslintServerInstaller::new(base_dir)),
        Box::new(JdtlsInstaller::new(base_dir)),
        Box::new(MsPylsInstaller::new(base_dir, platform)),
    ]
}
