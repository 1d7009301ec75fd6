#![allow(dead_code)]

mod archive;
mod installer;

pub use archive::tar_gz;
pub use installer::{FakeInstaller, FixedLocator, quiet};
