//! Interfaces for the provisioning pipeline that consumes built images.
//!
//! The manifest core hands its rendered document to an image builder; the
//! resulting disk image is uploaded and instantiated through a [`Provider`].
//! Long-running provider-side work is tracked with the bounded
//! [`poll_operation`] loop.

mod operation;
mod provider;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use operation::*;
pub use provider::*;
