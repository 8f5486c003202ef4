use std::fs;
use std::path::Path;

use crate::store::Store;

/// Directory holding the persisted store, relative to the working root.
pub const STATE_DIR: &str = ".stint";
const STATE_FILE: &str = "state.json";

/// Read the persisted store snapshot. A missing or malformed file yields
/// `None` and the caller starts fresh.
pub fn read_store(root: &Path) -> Option<Store> {
    let path = root.join(STATE_DIR).join(STATE_FILE);
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write the store snapshot, creating the state directory if needed.
pub fn write_store(root: &Path, store: &Store) -> Result<(), std::io::Error> {
    let dir = root.join(STATE_DIR);
    fs::create_dir_all(&dir)?;
    let content = serde_json::to_string_pretty(store)?;
    fs::write(dir.join(STATE_FILE), content)
}
