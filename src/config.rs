//! Engine configuration

use std::path::PathBuf;

/// Default directory under which every database gets its own folder.
pub const DEFAULT_BASE_PATH: &str = "data";

/// Where databases are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base directory; database `name` lives in `<base_path>/<name>/`.
    pub base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
        }
    }
}

impl Config {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory that holds the tables of database `name`.
    pub fn database_dir(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_path() {
        let config = Config::default();
        assert_eq!(config.base_path, PathBuf::from("data"));
        assert_eq!(config.database_dir("shop"), PathBuf::from("data").join("shop"));
    }

    #[test]
    fn test_custom_base_path() {
        let config = Config::new("/tmp/tabula");
        assert_eq!(config.database_dir("x"), PathBuf::from("/tmp/tabula/x"));
    }
}
