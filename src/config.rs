use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "PROTEIN_TABLES_DATA_DIR";

/// Location of the read-only data tree.
///
/// Layout below `root`:
/// ```text
///  data/
///  ├── metamorpheus/<run>/Task1-SearchTask/<name>.tsv
///  └── proteome_discoverer/<run>/<prefix>_<name>.txt
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLayout {
    pub root: PathBuf,
}

impl DataLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        DataLayout {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Read the root from `PROTEIN_TABLES_DATA_DIR`, falling back to the
    /// `data/` directory shipped next to the crate.
    pub fn from_env() -> Self {
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => DataLayout::new(dir),
            _ => DataLayout::default(),
        }
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        DataLayout::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }
}
