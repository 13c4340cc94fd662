//! Manifest construction and serialization for bootable unikernel images.
//!
//! A [`Manifest`] is built up through its `add_*` operations and then
//! rendered exactly once into the nested text document the boot loader
//! consumes.

mod manifest;
mod network;
mod node;
mod serialize;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use manifest::*;
pub use network::*;
pub use node::*;
pub use serialize::*;
