use std::path::PathBuf;

/// Configuration for the local-disk fragment store.
#[derive(Debug, Clone)]
pub struct FsConfig {
    /// Directory holding one subdirectory per owner.
    pub root: PathBuf,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data"),
        }
    }
}

impl FsConfig {
    /// Create a configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = FsConfig::default();
        assert_eq!(cfg.root, PathBuf::from("./data"));
    }
}
