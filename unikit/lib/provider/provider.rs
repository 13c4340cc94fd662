use std::path::Path;

use async_trait::async_trait;
use getset::Getters;
use serde::{Deserialize, Serialize};

use crate::UnikitResult;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A target that can host built unikernel images.
///
/// Implementations wrap a cloud API or a local hypervisor. The manifest
/// core only produces the image description; a provider takes the packaged
/// image archive from there. Long-running provider calls are expected to be
/// tracked with [`poll_operation`](crate::provider::poll_operation), so
/// every method either succeeds, reports an explicit failure, or times out.
#[async_trait]
pub trait Provider {
    /// Registers a packaged image archive under `image_name`.
    async fn create_image(&self, image_name: &str, archive_path: &Path) -> UnikitResult<()>;

    /// Lists the images registered with the provider.
    async fn list_images(&self) -> UnikitResult<Vec<ResourceInfo>>;

    /// Deletes a registered image.
    async fn delete_image(&self, image_name: &str) -> UnikitResult<()>;

    /// Boots an instance from a registered image, returning the instance
    /// name the provider assigned.
    async fn create_instance(&self, image_name: &str) -> UnikitResult<String>;

    /// Lists the running instances.
    async fn list_instances(&self) -> UnikitResult<Vec<ResourceInfo>>;

    /// Deletes a running instance.
    async fn delete_instance(&self, instance_name: &str) -> UnikitResult<()>;
}

/// Summary of a provider-side resource, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[getset(get = "pub with_prefix")]
pub struct ResourceInfo {
    /// The resource name.
    name: String,

    /// The provider-reported status.
    status: String,

    /// The creation timestamp, as reported by the provider.
    created: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ResourceInfo {
    /// Creates a new resource summary.
    pub fn new(
        name: impl Into<String>,
        status: impl Into<String>,
        created: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            created: created.into(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
