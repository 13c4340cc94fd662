use std::{
    error::Error,
    fmt::{self, Display},
    path::PathBuf,
};
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a unikit-related operation.
pub type UnikitResult<T> = Result<T, UnikitError>;

/// An error that occurred while building or provisioning an image manifest.
#[derive(Debug, Error)]
pub enum UnikitError {
    /// An I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that can represent any error.
    #[error(transparent)]
    Custom(#[from] AnyError),

    /// A link entry would override an existing directory. Recoverable: the
    /// caller may skip the link and keep building.
    #[error("link {0} would override an existing directory")]
    LinkPathConflict(String),

    /// A condition that leaves the manifest structurally unusable. The
    /// top-level driver is expected to abort the build.
    #[error("fatal manifest error: {0}")]
    Fatal(#[from] FatalManifestError),

    /// An error that occurred while walking a host directory.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A cloud operation reported failure.
    #[error("operation {name} failed: {reason}")]
    OperationFailed {
        /// The name of the operation.
        name: String,

        /// The failure reason reported by the provider.
        reason: String,
    },

    /// A cloud operation did not complete within the bounded poll window.
    #[error("operation {name} timed out after {attempts} tries")]
    OperationTimedOut {
        /// The name of the operation.
        name: String,

        /// The number of polls performed before giving up.
        attempts: u32,
    },
}

/// A manifest error the build cannot continue past.
#[derive(Debug, Error)]
pub enum FatalManifestError {
    /// A file entry would override an existing directory.
    #[error("file {0} would override an existing directory")]
    FileOverridesDirectory(String),

    /// A directory entry would override an existing file or link.
    #[error("directory {0} is conflicting with an existing file")]
    DirectoryOverridesFile(String),

    /// A referenced host file does not exist under the target root.
    #[error("missing host file referenced by manifest: {0}")]
    MissingHostFile(PathBuf),

    /// A host symlink whose target could not be resolved.
    #[error("cannot resolve symlink: {0}")]
    UnreadableSymlink(PathBuf),
}

/// An error that can represent any error.
#[derive(Debug)]
pub struct AnyError {
    error: anyhow::Error,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl UnikitError {
    /// Creates a new `Err` result.
    pub fn custom(error: impl Into<anyhow::Error>) -> UnikitError {
        UnikitError::Custom(AnyError {
            error: error.into(),
        })
    }

    /// Returns `true` if the error is fatal for the whole image build.
    pub fn is_fatal(&self) -> bool {
        matches!(self, UnikitError::Fatal(_))
    }
}

impl AnyError {
    /// Downcasts the error to a `T`.
    pub fn downcast<T>(&self) -> Option<&T>
    where
        T: Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref::<T>()
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `UnikitResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> UnikitResult<T> {
    Result::Ok(value)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for AnyError {
    fn eq(&self, other: &Self) -> bool {
        self.error.to_string() == other.error.to_string()
    }
}

impl Display for AnyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Error for AnyError {}
