//! Utility functions and types.

mod archive;
mod file;
mod path;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use archive::*;
pub use file::*;
pub use path::*;
