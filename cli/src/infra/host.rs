//! `HostProbe` backed by the real process environment.

use std::path::{Path, PathBuf};

use crate::application::ports::HostProbe;

pub struct SystemHostProbe;

impl HostProbe for SystemHostProbe {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        let candidate = Path::new(program);
        if candidate.components().count() > 1 {
            return is_executable(candidate).then(|| candidate.to_path_buf());
        }
        let path = std::env::var_os("PATH")?;
        std::env::split_paths(&path)
            .map(|dir| dir.join(program))
            .find(|p| is_executable(p))
    }

    #[cfg(unix)]
    fn is_root(&self) -> bool {
        use std::os::unix::fs::MetadataExt;
        // /proc/self is owned by the effective uid of the reading process.
        std::fs::metadata("/proc/self").is_ok_and(|m| m.uid() == 0)
    }

    #[cfg(not(unix))]
    fn is_root(&self) -> bool {
        false
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
