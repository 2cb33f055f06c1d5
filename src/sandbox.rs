// ABOUTME: Sandboxed I/O module for the `read-file`/`write-file` builtins
// Provides safe filesystem access with capability-based security using cap-std

use crate::config::FsConfig;
use cap_std::fs::Dir;

/// Error type for sandbox operations
#[derive(Debug, Clone)]
pub enum SandboxError {
    PathNotAllowed(String),
    FileNotFound(String),
    FileTooLarge(String),
    IoError(String),
}

impl std::fmt::Display for SandboxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SandboxError::PathNotAllowed(path) => {
                write!(f, "Access denied: {} is not in allowed paths", path)
            }
            SandboxError::FileNotFound(path) => write!(f, "File not found: {}", path),
            SandboxError::FileTooLarge(msg) => write!(f, "File too large: {}", msg),
            SandboxError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for SandboxError {}

/// Capability-based filesystem sandbox for `read-file`/`write-file`.
/// `print`/`prompt` need no sandboxing and are not routed through here.
pub struct Sandbox {
    fs_roots: Vec<Dir>,
    fs_config: FsConfig,
}

impl Sandbox {
    pub fn new(fs_config: FsConfig) -> Result<Self, SandboxError> {
        let mut fs_roots = Vec::new();

        for path in &fs_config.allowed_paths {
            std::fs::create_dir_all(path).map_err(|e| {
                SandboxError::IoError(format!("Cannot create {}: {}", path.display(), e))
            })?;

            let dir = Dir::open_ambient_dir(path, cap_std::ambient_authority()).map_err(|e| {
                SandboxError::IoError(format!("Cannot open {}: {}", path.display(), e))
            })?;

            fs_roots.push(dir);
        }

        Ok(Self {
            fs_roots,
            fs_config,
        })
    }

    fn reject_unsafe_path(path: &str) -> Result<(), SandboxError> {
        if path.starts_with('/') || path.starts_with('\\') || path.contains("..") {
            return Err(SandboxError::PathNotAllowed(path.to_string()));
        }
        Ok(())
    }

    /// For reads, try each root in order; for writes, always the first.
    fn find_root_for_path(&self, user_path: &str, write_mode: bool) -> Result<&Dir, SandboxError> {
        if write_mode {
            return self
                .fs_roots
                .first()
                .ok_or_else(|| SandboxError::PathNotAllowed(user_path.to_string()));
        }

        for root in &self.fs_roots {
            if root.metadata(user_path).is_ok() {
                return Ok(root);
            }
        }

        self.fs_roots
            .first()
            .ok_or_else(|| SandboxError::PathNotAllowed(user_path.to_string()))
    }

    pub fn read_file(&self, path: &str) -> Result<String, SandboxError> {
        Self::reject_unsafe_path(path)?;
        let root = self.find_root_for_path(path, false)?;
        root.read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SandboxError::FileNotFound(path.to_string())
            } else {
                SandboxError::IoError(format!("Cannot read {}: {}", path, e))
            }
        })
    }

    pub fn write_file(&self, path: &str, contents: &str) -> Result<(), SandboxError> {
        Self::reject_unsafe_path(path)?;

        if contents.len() > self.fs_config.max_file_size {
            return Err(SandboxError::FileTooLarge(format!(
                "{} bytes exceeds limit of {} bytes",
                contents.len(),
                self.fs_config.max_file_size
            )));
        }

        let root = self.find_root_for_path(path, true)?;
        root.write(path, contents)
            .map_err(|e| SandboxError::IoError(format!("Cannot write {}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::path::PathBuf;

    fn create_test_sandbox() -> (Sandbox, PathBuf) {
        let test_dir = PathBuf::from("./test_sandbox_temp");
        let _ = fs::remove_dir_all(&test_dir);
        fs::create_dir_all(&test_dir).unwrap();

        let fs_config = FsConfig {
            allowed_paths: vec![test_dir.clone()],
            ..Default::default()
        };

        (Sandbox::new(fs_config).unwrap(), test_dir)
    }

    fn cleanup_test_sandbox(test_dir: &PathBuf) {
        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    #[serial]
    fn read_file_success() {
        let (sandbox, test_dir) = create_test_sandbox();
        fs::write(test_dir.join("test.txt"), "hello world").unwrap();
        assert_eq!(sandbox.read_file("test.txt").unwrap(), "hello world");
        cleanup_test_sandbox(&test_dir);
    }

    #[test]
    #[serial]
    fn write_then_read() {
        let (sandbox, test_dir) = create_test_sandbox();
        sandbox.write_file("output.txt", "test data").unwrap();
        assert_eq!(sandbox.read_file("output.txt").unwrap(), "test data");
        cleanup_test_sandbox(&test_dir);
    }

    #[test]
    #[serial]
    fn path_traversal_rejected() {
        let (sandbox, test_dir) = create_test_sandbox();
        let result = sandbox.read_file("../../../etc/passwd");
        assert!(matches!(result, Err(SandboxError::PathNotAllowed(_))));
        cleanup_test_sandbox(&test_dir);
    }

    #[test]
    #[serial]
    fn absolute_path_rejected() {
        let (sandbox, test_dir) = create_test_sandbox();
        let result = sandbox.read_file("/etc/passwd");
        assert!(matches!(result, Err(SandboxError::PathNotAllowed(_))));
        cleanup_test_sandbox(&test_dir);
    }

    #[test]
    #[serial]
    fn write_over_size_limit_rejected() {
        let (sandbox, test_dir) = create_test_sandbox();
        let fs_config = FsConfig {
            allowed_paths: vec![test_dir.clone()],
            max_file_size: 4,
        };
        let small_sandbox = Sandbox::new(fs_config).unwrap();
        let result = small_sandbox.write_file("too_big.txt", "too long");
        assert!(matches!(result, Err(SandboxError::FileTooLarge(_))));
        cleanup_test_sandbox(&test_dir);
    }
}
