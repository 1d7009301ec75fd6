//! Archive unpacking for downloaded release assets.

use std::fs::File;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::{debug, warn};

use crate::installer::error::InstallError;

/// Supported container formats, detected from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Tar,
    /// Plain zip and zip-based containers (`.vsix`, `.nupkg`, `.jar`).
    Zip,
}

impl ArchiveFormat {
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else if name.ends_with(".tar") {
            Some(ArchiveFormat::Tar)
        } else if [".zip", ".vsix", ".nupkg", ".jar"]
            .iter()
            .any(|ext| name.ends_with(ext))
        {
            Some(ArchiveFormat::Zip)
        } else {
            None
        }
    }
}

/// Unpacks `archive` into `dest`. Blocking; run it off the async runtime.
pub fn unpack(archive: &Path, dest: &Path) -> Result<(), InstallError> {
    let format = ArchiveFormat::detect(archive).ok_or_else(|| {
        InstallError::extraction(archive, "unsupported archive format".to_string())
    })?;
    debug!("Unpacking {:?} ({:?}) into {:?}", archive, format, dest);

    let file = File::open(archive).map_err(InstallError::fs("open", archive))?;

    match format {
        ArchiveFormat::TarGz => tar::Archive::new(GzDecoder::new(file))
            .unpack(dest)
            .map_err(|e| InstallError::extraction(archive, e)),
        ArchiveFormat::Tar => tar::Archive::new(file)
            .unpack(dest)
            .map_err(|e| InstallError::extraction(archive, e)),
        ArchiveFormat::Zip => unpack_zip(file, archive, dest),
    }
}

/// Extracts zip entries one by one, skipping entries whose path would land
/// outside `dest`, the way `tar::Archive::unpack` does.
fn unpack_zip(file: File, archive: &Path, dest: &Path) -> Result<(), InstallError> {
    let mut zip = zip::ZipArchive::new(file).map_err(|e| InstallError::extraction(archive, e))?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| InstallError::extraction(archive, e))?;
        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping unsafe entry {:?} in {:?}", entry.name(), archive);
            continue;
        };
        let out = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out).map_err(InstallError::fs("create", &out))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).map_err(InstallError::fs("create", parent))?;
        }
        let mut target = File::create(&out).map_err(InstallError::fs("create", &out))?;
        std::io::copy(&mut entry, &mut target).map_err(|e| InstallError::extraction(archive, e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&out, std::fs::Permissions::from_mode(mode & 0o777))
                .map_err(InstallError::fs("chmod", &out))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::TempDir;

    #[rstest]
    #[case("efm-langserver_v0.0.14_linux_amd64.tar.gz", Some(ArchiveFormat::TarGz))]
    #[case("jdt-language-server-latest.TGZ", Some(ArchiveFormat::TarGz))]
    #[case("bundle.tar", Some(ArchiveFormat::Tar))]
    #[case("server.zip", Some(ArchiveFormat::Zip))]
    #[case("vscode-eslint-2.1.4.vsix", Some(ArchiveFormat::Zip))]
    #[case("Python-Language-Server-linux-x64.0.5.31.nupkg", Some(ArchiveFormat::Zip))]
    #[case("rust-analyzer-linux", None)]
    #[case("archive.7z", None)]
    fn detect_returns_expected(#[case] name: &str, #[case] expected: Option<ArchiveFormat>) {
        assert_eq!(ArchiveFormat::detect(Path::new(name)), expected);
    }

    #[test]
    fn unpack_extracts_tar_gz() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("tool.tar.gz");

        let encoder = flate2::write::GzEncoder::new(
            File::create(&archive).unwrap(),
            flate2::Compression::default(),
        );
        let mut builder = tar::Builder::new(encoder);
        let content = b"#!/bin/sh\necho hi\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, "tool/bin/tool", &content[..])
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        let dest = temp.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        unpack(&archive, &dest).unwrap();

        let extracted = std::fs::read(dest.join("tool/bin/tool")).unwrap();
        assert_eq!(extracted, content);
    }

    #[test]
    fn unpack_extracts_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("server.zip");

        let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
        writer
            .start_file("server/bin/kotlin-language-server", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"echo kotlin").unwrap();
        writer.finish().unwrap();

        let dest = temp.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        unpack(&archive, &dest).unwrap();

        assert!(dest.join("server/bin/kotlin-language-server").is_file());
    }

    #[test]
    fn unpack_skips_zip_entries_escaping_destination() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bundle.vsix");

        let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("extension/package.json", options).unwrap();
        writer.write_all(b"{}").unwrap();
        writer.start_file("../escape", options).unwrap();
        writer.write_all(b"outside").unwrap();
        writer.finish().unwrap();

        let dest = temp.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        unpack(&archive, &dest).unwrap();

        assert!(dest.join("extension/package.json").is_file());
        assert!(!temp.path().join("escape").exists());
    }

    #[cfg(unix)]
    #[test]
    fn unpack_keeps_zip_unix_modes() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("server.zip");

        let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
        writer
            .start_file(
                "server/bin/kotlin-language-server",
                zip::write::SimpleFileOptions::default().unix_permissions(0o755),
            )
            .unwrap();
        writer.write_all(b"echo kotlin").unwrap();
        writer.finish().unwrap();

        let dest = temp.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        unpack(&archive, &dest).unwrap();

        let mode = std::fs::metadata(dest.join("server/bin/kotlin-language-server"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn unpack_skips_tar_entries_escaping_destination() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("tool.tar.gz");

        let encoder = flate2::write::GzEncoder::new(
            File::create(&archive).unwrap(),
            flate2::Compression::default(),
        );
        let mut builder = tar::Builder::new(encoder);
        let mut append = |name: &[u8], content: &[u8]| {
            let mut header = tar::Header::new_gnu();
            header.as_gnu_mut().unwrap().name[..name.len()].copy_from_slice(name);
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_entry_type(tar::EntryType::Regular);
            header.set_cksum();
            builder.append(&header, content).unwrap();
        };
        append(b"tool/README", b"ok");
        append(b"../escape", b"outside");
        builder.into_inner().unwrap().finish().unwrap();

        let dest = temp.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        unpack(&archive, &dest).unwrap();

        assert!(dest.join("tool/README").is_file());
        assert!(!temp.path().join("escape").exists());
    }

    #[test]
    fn unpack_rejects_unknown_format() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("blob.bin");
        std::fs::write(&archive, b"data").unwrap();

        let result = unpack(&archive, temp.path());

        assert!(matches!(result, Err(InstallError::Extraction { .. })));
    }

    #[test]
    fn unpack_reports_corrupt_zip_as_extraction_error() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.zip");
        std::fs::write(&archive, b"not a zip").unwrap();

        let result = unpack(&archive, temp.path());

        assert!(matches!(result, Err(InstallError::Extraction { .. })));
    }
}
