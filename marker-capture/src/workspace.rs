use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

pub const WORKSPACE_PREFIX: &str = "Fixed_Marker_Capture";

/// Creates `<root>/Fixed_Marker_Capture<timestamp>/` unless it already exists.
pub fn create_workspace(root: &Path, timestamp: &str) -> anyhow::Result<PathBuf> {
    let workspace = root.join(format!("{WORKSPACE_PREFIX}{timestamp}"));
    if !workspace.exists() {
        fs::create_dir_all(&workspace)
            .with_context(|| format!("Failed to create workspace {}", workspace.display()))?;
        log::info!("Folder name {}", workspace.display());
    }

    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_is_created_once() {
        let root = std::env::temp_dir().join(format!("marker-capture-{}", std::process::id()));

        let first = create_workspace(&root, "19_10_2026_12_00_00").unwrap();
        fs::write(first.join("fixed.avi"), b"x").unwrap();
        let second = create_workspace(&root, "19_10_2026_12_00_00").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.file_name().unwrap(), "Fixed_Marker_Capture19_10_2026_12_00_00");
        assert!(second.join("fixed.avi").exists());

        fs::remove_dir_all(&root).unwrap();
    }
}
