use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use getset::Getters;
use tracing::warn;
use typed_path::Utf8UnixPathBuf;
use walkdir::WalkDir;

use crate::{utils, FatalManifestError, UnikitError, UnikitResult};

use super::{Children, NetworkConfig, Node};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Environment variables that imply required klib extension modules.
///
/// Setting one of these variables pulls the listed klibs into the manifest
/// even when they were never requested explicitly. New policies are rows in
/// this table, not special cases in [`Manifest::add_environment_variable`].
const ENV_IMPLIED_KLIBS: &[(&str, &[&str])] = &[("RADAR_KEY", &["tls", "radar"])];

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The in-memory description of a bootable image.
///
/// A manifest holds two virtual filesystem trees (one for the boot stage,
/// one for the running root filesystem) plus the runtime configuration of
/// the packaged program: arguments, environment, debug flags, mount points,
/// klib extension modules and optional static network settings.
///
/// Entries are added through the `add_*` operations; later additions may
/// rebind a path to a different host source, which is reported as a warning
/// rather than an error. Structural conflicts between directories and leaf
/// entries fail the operation — see [`FatalManifestError`].
///
/// ## Examples
///
/// ```no_run
/// use unikit::manifest::Manifest;
///
/// # fn main() -> anyhow::Result<()> {
/// let mut manifest = Manifest::new(None);
/// manifest.add_file("/bin/app", "/host/build/app")?;
/// manifest.add_environment_variable("PORT", "8080");
/// manifest.add_argument("--verbose");
///
/// let document = manifest.render();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub with_prefix")]
pub struct Manifest {
    /// The boot-stage filesystem tree.
    boot: Children,

    /// The root filesystem tree.
    root: Children,

    /// The absolute virtual path of the entry-point executable.
    program: Option<Utf8UnixPathBuf>,

    /// Command-line arguments passed to the program, in order.
    args: Vec<String>,

    /// Debug flags, each a single-character value keyed by flag name.
    debug_flags: BTreeMap<String, char>,

    /// Trace-exclusion patterns, in order.
    no_trace: Vec<String>,

    /// Environment variables for the program.
    environment: BTreeMap<String, String>,

    /// Mount labels mapped to virtual paths.
    mounts: BTreeMap<String, String>,

    /// Requested klib extension modules, deduplicated in first-seen order.
    klibs: Vec<String>,

    /// Whether klibs resolve against the nightly kernel channel.
    nightly: bool,

    /// Explicit directory klibs are resolved from. `None` resolves the
    /// default directory for the selected kernel channel.
    klibs_dir: Option<PathBuf>,

    /// Optional static network configuration.
    network_config: Option<NetworkConfig>,

    /// Host-side root directory that referenced host files are validated
    /// against. `None` validates against the real filesystem root.
    target_root: Option<PathBuf>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Manifest {
    /// Creates a new empty manifest.
    ///
    /// `target_root` points at an alternative host root to validate
    /// referenced files against, or `None` for the real filesystem root.
    pub fn new(target_root: Option<PathBuf>) -> Self {
        Self {
            boot: Children::new(),
            root: Children::new(),
            program: None,
            args: Vec::new(),
            debug_flags: BTreeMap::new(),
            no_trace: Vec::new(),
            environment: BTreeMap::new(),
            mounts: BTreeMap::new(),
            klibs: Vec::new(),
            nightly: false,
            klibs_dir: None,
            network_config: None,
            target_root,
        }
    }

    /// Adds a file entry at `virtual_path` backed by `host_path`.
    ///
    /// Intermediate directory nodes are created as needed. Rebinding an
    /// existing file to a different host source emits a warning and
    /// proceeds; an existing directory at the path is a fatal conflict, as
    /// is a missing host file.
    pub fn add_file(&mut self, virtual_path: &str, host_path: impl AsRef<Path>) -> UnikitResult<()> {
        let host_path = host_path.as_ref();
        let segments = Self::split_segments(virtual_path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(UnikitError::custom(anyhow::anyhow!(
                "empty virtual path for host file {}",
                host_path.display()
            )));
        };

        let parent = Self::descend(&mut self.root, parents)
            .map_err(|_| FatalManifestError::DirectoryOverridesFile(virtual_path.to_string()))?;

        match parent.get(*last) {
            Some(Node::Directory(_)) => {
                return Err(
                    FatalManifestError::FileOverridesDirectory(virtual_path.to_string()).into(),
                );
            }
            Some(Node::File(existing)) if existing != host_path => {
                warn!(
                    "overwriting existing file {} hostpath old: {} new: {}",
                    virtual_path,
                    existing.display(),
                    host_path.display()
                );
            }
            Some(Node::Link(_)) => {
                warn!(
                    "overwriting existing link {} with file {}",
                    virtual_path,
                    host_path.display()
                );
            }
            _ => {}
        }

        utils::lookup_file(self.target_root.as_deref(), host_path)?;

        parent.insert((*last).to_string(), Node::File(host_path.to_path_buf()));
        Ok(())
    }

    /// Adds a symlink entry at `virtual_path`, recording the target the host
    /// symlink at `host_path` resolves to.
    ///
    /// Unlike [`Manifest::add_file`], conflicting with an existing directory
    /// is recoverable: the error is returned and the manifest is left
    /// untouched. A missing host path or an unreadable link is fatal.
    pub fn add_link(&mut self, virtual_path: &str, host_path: impl AsRef<Path>) -> UnikitResult<()> {
        let host_path = host_path.as_ref();
        let segments = Self::split_segments(virtual_path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(UnikitError::custom(anyhow::anyhow!(
                "empty virtual path for host link {}",
                host_path.display()
            )));
        };

        let parent = Self::descend(&mut self.root, parents)
            .map_err(|_| UnikitError::LinkPathConflict(virtual_path.to_string()))?;

        if matches!(parent.get(*last), Some(Node::Directory(_))) {
            return Err(UnikitError::LinkPathConflict(virtual_path.to_string()));
        }

        utils::lookup_file(self.target_root.as_deref(), host_path)?;

        let resolved = utils::resolve_under_root(self.target_root.as_deref(), host_path);
        let target = fs::read_link(&resolved)
            .map_err(|_| FatalManifestError::UnreadableSymlink(resolved.clone()))?
            .to_string_lossy()
            .into_owned();

        if let Some(existing) = parent.get(*last) {
            if Self::link_rebinds(existing, host_path, &target) {
                warn!(
                    "overwriting existing entry {} with link to {}",
                    virtual_path, target
                );
            }
        }

        parent.insert((*last).to_string(), Node::Link(target));
        Ok(())
    }

    /// Adds a dependent library at `path`, used both as the virtual path and
    /// as the host source. No host-existence check is performed.
    pub fn add_library(&mut self, path: &str) -> UnikitResult<()> {
        let segments = Self::split_segments(path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(UnikitError::custom(anyhow::anyhow!(
                "empty library path"
            )));
        };

        let parent = Self::descend(&mut self.root, parents)
            .map_err(|_| FatalManifestError::DirectoryOverridesFile(path.to_string()))?;

        if matches!(parent.get(*last), Some(Node::Directory(_))) {
            return Err(FatalManifestError::FileOverridesDirectory(path.to_string()).into());
        }

        parent.insert((*last).to_string(), Node::File(PathBuf::from(path)));
        Ok(())
    }

    /// Adds the user program at its host path, mirroring it into the image
    /// at the equivalent absolute virtual path.
    pub fn add_user_program(&mut self, host_path: &str) -> UnikitResult<()> {
        let trimmed = host_path.strip_prefix("./").unwrap_or(host_path);
        let program = format!("/{}", Self::split_segments(trimmed).join("/"));

        self.add_file(&program, host_path)?;
        self.set_program(program);
        Ok(())
    }

    /// Sets the virtual path of the entry-point executable.
    pub fn set_program(&mut self, virtual_path: impl Into<Utf8UnixPathBuf>) {
        self.program = Some(virtual_path.into());
    }

    /// Sets the kernel the boot filesystem loads, replacing any previous
    /// boot entries.
    pub fn add_kernel(&mut self, host_path: impl AsRef<Path>) {
        self.boot.clear();
        self.boot.insert(
            "kernel".to_string(),
            Node::File(host_path.as_ref().to_path_buf()),
        );
    }

    /// Declares a mount point: an empty directory at `virtual_path` plus a
    /// `label -> path` record in the mounts block.
    pub fn add_mount(
        &mut self,
        label: impl Into<String>,
        virtual_path: impl Into<String>,
    ) -> UnikitResult<()> {
        let virtual_path = virtual_path.into();
        self.ensure_directory_chain(&virtual_path)?;
        self.mounts.insert(label.into(), virtual_path);
        Ok(())
    }

    /// Recursively adds every entry under `host_dir`, keeping host paths as
    /// virtual paths (relative host paths are rooted at `/`).
    ///
    /// Symlinks are re-stat'ed through the link and added as link entries;
    /// broken symlinks are skipped with a warning.
    pub fn add_directory(&mut self, host_dir: impl AsRef<Path>) -> UnikitResult<()> {
        let host_dir = host_dir.as_ref().to_path_buf();
        self.import_directory(&host_dir, |host_path| {
            if host_path.is_absolute() {
                host_path.to_string_lossy().into_owned()
            } else {
                format!("/{}", host_path.to_string_lossy())
            }
        })
    }

    /// Recursively adds every entry under `source_dir`, re-rooting the
    /// walked tree at `/` by stripping the source directory prefix.
    pub fn add_relative_directory(&mut self, source_dir: impl AsRef<Path>) -> UnikitResult<()> {
        let source_dir = source_dir.as_ref().to_path_buf();
        let source = source_dir.clone();
        self.import_directory(&source_dir, move |host_path| {
            let relative = host_path.strip_prefix(&source).unwrap_or(host_path);
            format!("/{}", relative.to_string_lossy())
        })
    }

    /// Appends a command-line argument for the program.
    pub fn add_argument(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    /// Enables a debug flag.
    pub fn add_debug_flag(&mut self, name: impl Into<String>, value: char) {
        self.debug_flags.insert(name.into(), value);
    }

    /// Appends a trace-exclusion pattern.
    pub fn add_no_trace(&mut self, name: impl Into<String>) {
        self.no_trace.push(name.into());
    }

    /// Sets an environment variable for the program.
    ///
    /// Some variables imply required klibs; those are pulled in
    /// automatically.
    pub fn add_environment_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.environment.insert(name.clone(), value.into());
        self.apply_env_policies(&name);
    }

    /// Appends klib extension modules, skipping names already requested.
    /// First-seen order is preserved.
    pub fn add_klibs<I, S>(&mut self, klibs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for klib in klibs {
            let klib = klib.into();
            if !self.klibs.contains(&klib) {
                self.klibs.push(klib);
            }
        }
    }

    /// Sets the static network configuration.
    pub fn add_network_config(&mut self, network_config: NetworkConfig) {
        self.network_config = Some(network_config);
    }

    /// Selects the nightly kernel channel for klib resolution.
    pub fn set_nightly(&mut self, nightly: bool) {
        self.nightly = nightly;
    }

    /// Resolves klibs from an explicit directory instead of the default
    /// channel directory.
    pub fn set_klibs_dir(&mut self, klibs_dir: impl Into<PathBuf>) {
        self.klibs_dir = Some(klibs_dir.into());
    }

    /// Returns whether `virtual_path` resolves to a file entry. Directories,
    /// links and missing paths all return `false`.
    pub fn file_exists(&self, virtual_path: &str) -> bool {
        let segments = Self::split_segments(virtual_path);
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };

        let mut children = &self.root;
        for segment in parents {
            match children.get(*segment) {
                Some(Node::Directory(next)) => children = next,
                _ => return false,
            }
        }

        matches!(children.get(*last), Some(Node::File(_)))
    }

    /// Splits a virtual path into its non-empty segments.
    fn split_segments(virtual_path: &str) -> Vec<&str> {
        virtual_path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Whether binding a link from `host_path` over `existing` changes the
    /// recorded source. Re-adding the same link target, or re-binding the
    /// entry the link was added from, stays silent.
    fn link_rebinds(existing: &Node, host_path: &Path, target: &str) -> bool {
        match existing {
            Node::Link(existing) => existing.as_str() != target,
            Node::File(existing) => existing.as_path() != host_path,
            Node::Directory(_) => false,
        }
    }

    /// Walks `segments` from `children`, creating directory nodes as needed,
    /// and returns the children of the final directory. A file or link bound
    /// at any segment is a conflict, reported with the offending segment.
    fn descend<'a>(
        mut children: &'a mut Children,
        segments: &[&str],
    ) -> Result<&'a mut Children, String> {
        for segment in segments {
            let node = children
                .entry((*segment).to_string())
                .or_insert_with(Node::directory);

            match node.children_mut() {
                Some(next) => children = next,
                None => return Err((*segment).to_string()),
            }
        }
        Ok(children)
    }

    /// Creates the full directory chain for `virtual_path` in the root tree.
    fn ensure_directory_chain(&mut self, virtual_path: &str) -> UnikitResult<()> {
        let segments = Self::split_segments(virtual_path);
        Self::descend(&mut self.root, &segments)
            .map_err(|_| FatalManifestError::DirectoryOverridesFile(virtual_path.to_string()))?;
        Ok(())
    }

    /// Walks a host directory and imports every entry, mapping host paths to
    /// virtual paths through `to_virtual`.
    fn import_directory(
        &mut self,
        host_dir: &Path,
        to_virtual: impl Fn(&Path) -> String,
    ) -> UnikitResult<()> {
        for entry in WalkDir::new(host_dir) {
            let entry = entry?;
            let host_path = entry.path();
            let virtual_path = to_virtual(host_path);

            if entry.path_is_symlink() {
                // re-stat through the link; broken symlinks are tolerated
                if let Err(e) = fs::metadata(host_path) {
                    warn!("skipping broken symlink {}: {}", host_path.display(), e);
                    continue;
                }
                self.add_link(&virtual_path, host_path)?;
            } else if entry.file_type().is_dir() {
                self.ensure_directory_chain(&virtual_path)?;
            } else {
                self.add_file(&virtual_path, host_path)?;
            }
        }
        Ok(())
    }

    /// Pulls in klibs implied by the named environment variable, if any.
    fn apply_env_policies(&mut self, name: &str) {
        for (var, implied) in ENV_IMPLIED_KLIBS {
            if *var == name {
                self.add_klibs(implied.iter().copied());
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn host_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn test_manifest_add_file_builds_tree() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let host = host_file(&temp_dir, "app");

        let mut manifest = Manifest::new(None);
        manifest.add_file("/bin/app", &host)?;

        let bin = manifest.get_root().get("bin").unwrap();
        assert_eq!(bin.children().unwrap().get("app"), Some(&Node::File(host)));

        Ok(())
    }

    #[test]
    fn test_manifest_idempotent_readd() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let host = host_file(&temp_dir, "app");

        let mut manifest = Manifest::new(None);
        manifest.add_file("/bin/app", &host)?;
        let before = manifest.get_root().clone();

        manifest.add_file("/bin/app", &host)?;
        assert_eq!(manifest.get_root(), &before);

        Ok(())
    }

    #[test]
    fn test_manifest_overwrite_with_different_source() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let old = host_file(&temp_dir, "app-v1");
        let new = host_file(&temp_dir, "app-v2");

        let mut manifest = Manifest::new(None);
        manifest.add_file("/bin/app", &old)?;
        manifest.add_file("/bin/app", &new)?;

        let bin = manifest.get_root().get("bin").unwrap();
        assert_eq!(bin.children().unwrap().get("app"), Some(&Node::File(new)));

        Ok(())
    }

    #[test]
    fn test_manifest_file_over_directory_is_fatal() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let host = host_file(&temp_dir, "etc");

        let mut manifest = Manifest::new(None);
        manifest.add_mount("config", "/etc/app")?;

        let err = manifest.add_file("/etc/app", &host).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            UnikitError::Fatal(FatalManifestError::FileOverridesDirectory(_))
        ));

        Ok(())
    }

    #[test]
    fn test_manifest_directory_over_file_is_fatal() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let host = host_file(&temp_dir, "app");

        let mut manifest = Manifest::new(None);
        manifest.add_file("/bin/app", &host)?;

        // a file entry blocks the directory chain below it
        let err = manifest.add_file("/bin/app/nested", &host).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            UnikitError::Fatal(FatalManifestError::DirectoryOverridesFile(_))
        ));

        let err = manifest.add_mount("data", "/bin/app").unwrap_err();
        assert!(err.is_fatal());

        Ok(())
    }

    #[test]
    fn test_manifest_missing_host_file_is_fatal() {
        let mut manifest = Manifest::new(None);
        let err = manifest
            .add_file("/bin/app", "/definitely/not/here")
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(matches!(
            err,
            UnikitError::Fatal(FatalManifestError::MissingHostFile(_))
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_manifest_add_link_records_target() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        host_file(&temp_dir, "bash");
        let link = temp_dir.path().join("sh");
        std::os::unix::fs::symlink("bash", &link)?;

        let mut manifest = Manifest::new(None);
        manifest.add_link("/bin/sh", &link)?;

        let bin = manifest.get_root().get("bin").unwrap();
        assert_eq!(
            bin.children().unwrap().get("sh"),
            Some(&Node::Link("bash".to_string()))
        );

        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_manifest_link_over_directory_is_recoverable() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        host_file(&temp_dir, "bash");
        let link = temp_dir.path().join("sh");
        std::os::unix::fs::symlink("bash", &link)?;

        let mut manifest = Manifest::new(None);
        manifest.add_mount("data", "/bin/sh")?;

        let err = manifest.add_link("/bin/sh", &link).unwrap_err();
        assert!(!err.is_fatal());
        assert!(matches!(err, UnikitError::LinkPathConflict(_)));

        Ok(())
    }

    #[test]
    fn test_manifest_add_link_on_regular_file_is_fatal() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let host = host_file(&temp_dir, "plain");

        let mut manifest = Manifest::new(None);
        let err = manifest.add_link("/bin/plain", &host).unwrap_err();

        assert!(err.is_fatal());
        assert!(matches!(
            err,
            UnikitError::Fatal(FatalManifestError::UnreadableSymlink(_))
        ));

        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_manifest_add_relative_directory() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        fs::create_dir_all(temp_dir.path().join("lib/sub"))?;
        fs::write(temp_dir.path().join("lib/libc.so"), b"elf")?;
        fs::write(temp_dir.path().join("lib/sub/data"), b"x")?;
        std::os::unix::fs::symlink("libc.so", temp_dir.path().join("lib/libc.so.6"))?;

        // broken symlinks are skipped, not fatal
        std::os::unix::fs::symlink("missing", temp_dir.path().join("lib/dangling"))?;

        let mut manifest = Manifest::new(None);
        manifest.add_relative_directory(temp_dir.path())?;

        assert!(manifest.file_exists("/lib/libc.so"));
        assert!(manifest.file_exists("/lib/sub/data"));
        assert!(!manifest.file_exists("/lib/dangling"));

        let lib = manifest.get_root().get("lib").unwrap();
        assert_eq!(
            lib.children().unwrap().get("libc.so.6"),
            Some(&Node::Link("libc.so".to_string()))
        );

        Ok(())
    }

    #[test]
    fn test_manifest_add_directory_keeps_host_paths() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        fs::create_dir_all(temp_dir.path().join("etc/ssl"))?;
        fs::write(temp_dir.path().join("etc/ssl/certs.pem"), b"pem")?;

        let mut manifest = Manifest::new(None);
        manifest.add_directory(temp_dir.path())?;

        // entries keep their full host-derived virtual path, unlike the
        // re-rooting import
        let virtual_path = format!("{}/etc/ssl/certs.pem", temp_dir.path().display());
        assert!(manifest.file_exists(&virtual_path));
        assert!(!manifest.file_exists("/etc/ssl/certs.pem"));

        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_manifest_link_readd_keeps_source() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        host_file(&temp_dir, "bash");
        let link = temp_dir.path().join("sh");
        std::os::unix::fs::symlink("bash", &link)?;

        let mut manifest = Manifest::new(None);
        manifest.add_file("/bin/sh", &link)?;
        manifest.add_link("/bin/sh", &link)?;
        let before = manifest.get_root().clone();

        manifest.add_link("/bin/sh", &link)?;
        assert_eq!(manifest.get_root(), &before);

        // an unchanged source is never a rebind
        assert!(!Manifest::link_rebinds(&Node::File(link.clone()), &link, "bash"));
        assert!(!Manifest::link_rebinds(
            &Node::Link("bash".to_string()),
            &link,
            "bash"
        ));
        assert!(Manifest::link_rebinds(
            &Node::Link("dash".to_string()),
            &link,
            "bash"
        ));
        assert!(Manifest::link_rebinds(
            &Node::File(PathBuf::from("/elsewhere/sh")),
            &link,
            "bash"
        ));

        Ok(())
    }

    #[test]
    fn test_manifest_add_user_program() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let host = host_file(&temp_dir, "server");

        let mut manifest = Manifest::new(None);
        manifest.add_user_program(host.to_str().unwrap())?;

        let program = manifest.get_program().as_ref().unwrap().as_str().to_string();
        assert!(program.starts_with('/'));
        assert!(program.ends_with("/server"));
        assert!(manifest.file_exists(&program));

        Ok(())
    }

    #[test]
    fn test_manifest_file_exists_semantics() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let host = host_file(&temp_dir, "app");

        let mut manifest = Manifest::new(None);
        manifest.add_file("/bin/app", &host)?;
        manifest.add_mount("data", "/var/data")?;

        assert!(manifest.file_exists("/bin/app"));
        assert!(!manifest.file_exists("/bin"));
        assert!(!manifest.file_exists("/var/data"));
        assert!(!manifest.file_exists("/nope"));
        assert!(!manifest.file_exists("/"));

        Ok(())
    }

    #[test]
    fn test_manifest_klib_dedup() {
        let mut manifest = Manifest::new(None);
        manifest.add_klibs(["tls", "radar"]);
        manifest.add_klibs(["tls", "radar"]);
        manifest.add_klibs(["ntp"]);

        assert_eq!(manifest.get_klibs(), &["tls", "radar", "ntp"]);
    }

    #[test]
    fn test_manifest_radar_key_pulls_in_klibs() {
        let mut manifest = Manifest::new(None);
        manifest.add_environment_variable("RADAR_KEY", "secret");

        assert_eq!(manifest.get_klibs(), &["tls", "radar"]);
        assert_eq!(
            manifest.get_environment().get("RADAR_KEY"),
            Some(&"secret".to_string())
        );

        // other variables do not
        let mut manifest = Manifest::new(None);
        manifest.add_environment_variable("HOME", "/root");
        assert!(manifest.get_klibs().is_empty());
    }

    #[test]
    fn test_manifest_add_kernel_resets_boot_tree() {
        let mut manifest = Manifest::new(None);
        manifest.add_kernel("/host/kernel-1");
        manifest.add_kernel("/host/kernel-2");

        assert_eq!(manifest.get_boot().len(), 1);
        assert_eq!(
            manifest.get_boot().get("kernel"),
            Some(&Node::File(PathBuf::from("/host/kernel-2")))
        );
    }

    #[test]
    fn test_manifest_target_root_lookup() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        fs::create_dir_all(temp_dir.path().join("bin"))?;
        fs::write(temp_dir.path().join("bin/app"), b"elf")?;

        let mut manifest = Manifest::new(Some(temp_dir.path().to_path_buf()));
        manifest.add_file("/bin/app", "/bin/app")?;

        assert!(manifest.file_exists("/bin/app"));
        Ok(())
    }
}
