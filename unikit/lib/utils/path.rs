use std::{path::PathBuf, sync::LazyLock};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The sub directory where unikit artifacts, kernels and klibs are stored.
pub const UNIKIT_HOME_DIR: &str = ".unikit";

/// The sub directory where klib extension modules are installed.
pub const KLIBS_SUBDIR: &str = "klibs";

/// The sub directory holding nightly kernel and klib builds.
pub const NIGHTLY_SUBDIR: &str = "nightly";

/// The path where all unikit global data is stored.
pub static DEFAULT_UNIKIT_HOME: LazyLock<PathBuf> =
    LazyLock::new(|| dirs::home_dir().unwrap().join(UNIKIT_HOME_DIR));

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the directory where klib extension modules live, for either the
/// stable or the nightly kernel channel.
pub fn klibs_dir(nightly: bool) -> PathBuf {
    if nightly {
        DEFAULT_UNIKIT_HOME.join(NIGHTLY_SUBDIR).join(KLIBS_SUBDIR)
    } else {
        DEFAULT_UNIKIT_HOME.join(KLIBS_SUBDIR)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
