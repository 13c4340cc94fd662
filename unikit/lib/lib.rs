//! `unikit` packages a user program and its dependencies into a bootable
//! unikernel image description, and defines the interfaces the resulting
//! image is provisioned through.
//!
//! # Overview
//!
//! The core of the crate is the [`manifest`] module: it builds an in-memory
//! virtual filesystem from host-side files, directories and symlinks plus
//! the program's runtime configuration (arguments, environment, debug
//! flags, klib extension modules, mount points, static network settings),
//! detects structural conflicts as entries are added, and deterministically
//! renders everything into the nested text document the boot loader
//! consumes.
//!
//! Around that core:
//!
//! - [`provider`] - interfaces to the hypervisors and cloud targets a built
//!   image is provisioned onto, including the bounded operation poll loop
//! - [`utils`] - klib directory resolution, host file lookup, and image
//!   archive packaging
//!
//! # Usage Example
//!
//! ```no_run
//! use unikit::manifest::Manifest;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut manifest = Manifest::new(None);
//!     manifest.add_kernel("/host/kernel");
//!     manifest.add_user_program("./build/server")?;
//!     manifest.add_environment_variable("PORT", "8080");
//!     manifest.add_klibs(["tls"]);
//!
//!     let document = manifest.render();
//!     println!("{}", document);
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Conditions that would leave the image unusable (a directory/file
//! conflict while adding files, a referenced host file that does not
//! exist) surface as [`UnikitError::Fatal`]; callers driving a build are
//! expected to abort on them. Degradable conditions (a broken symlink in a
//! bulk import, a requested klib missing from the klib directory) are
//! logged and skipped.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod error;
mod log;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod manifest;
pub mod provider;
pub mod utils;

pub use error::*;
pub use log::*;
