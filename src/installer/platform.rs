//! Operating system and architecture model used for support matrices and
//! download URL templating.

use std::fmt;

/// Operating system family, named the way upstream release assets name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
    FreeBsd,
    OpenBsd,
    Solaris,
    Other,
}

impl Os {
    /// Detects the operating system this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "macos") {
            Os::Darwin
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "freebsd") {
            Os::FreeBsd
        } else if cfg!(target_os = "openbsd") {
            Os::OpenBsd
        } else if cfg!(any(target_os = "solaris", target_os = "illumos")) {
            Os::Solaris
        } else {
            Os::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
            Os::FreeBsd => "freebsd",
            Os::OpenBsd => "openbsd",
            Os::Solaris => "solaris",
            Os::Other => "unknown",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Os::Windows)
    }
}

/// CPU architecture, named the way upstream release assets name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Amd64,
    I386,
    Arm,
    Arm64,
    Other,
}

impl Arch {
    /// Detects the architecture this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_arch = "x86_64") {
            Arch::Amd64
        } else if cfg!(target_arch = "x86") {
            Arch::I386
        } else if cfg!(target_arch = "arm") {
            Arch::Arm
        } else if cfg!(target_arch = "aarch64") {
            Arch::Arm64
        } else {
            Arch::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::I386 => "386",
            Arch::Arm => "arm",
            Arch::Arm64 => "arm64",
            Arch::Other => "unknown",
        }
    }
}

/// An (operating system, architecture) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// The platform of the running process. Computed on demand; callers that
    /// need another platform (tests, cross checks) construct one with [`Platform::new`].
    pub fn current() -> Self {
        Self::new(Os::current(), Arch::current())
    }

    /// File name of a native executable, e.g. `gopls` or `gopls.exe`.
    pub fn executable(&self, name: &str) -> String {
        if self.os.is_windows() {
            format!("{name}.exe")
        } else {
            name.to_string()
        }
    }

    /// File name of a launcher script, e.g. `metals` or `metals.bat`.
    pub fn script(&self, name: &str) -> String {
        if self.os.is_windows() {
            format!("{name}.bat")
        } else {
            name.to_string()
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.as_str(), self.arch.as_str())
    }
}

/// Matrix shared by most prebuilt release assets.
pub const GENERAL_SUPPORTS: &[Platform] = &[
    Platform::new(Os::Darwin, Arch::Amd64),
    Platform::new(Os::Linux, Arch::Amd64),
    Platform::new(Os::Windows, Arch::Amd64),
];

/// An empty matrix means the installer has not declared one and is assumed
/// to work everywhere.
pub fn is_supported(supports: &[Platform], platform: Platform) -> bool {
    supports.is_empty() || supports.contains(&platform)
}
