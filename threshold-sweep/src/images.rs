use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Files in `folder` with the given extension, sorted by name.
pub fn list_images(folder: &Path, extension: &str) -> anyhow::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder).with_context(|| format!("Failed to open folder {}", folder.display()))?;

    let mut images = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == extension);
        if matches && path.is_file() {
            images.push(path);
        }
    }
    images.sort();

    Ok(images)
}

/// Last component of the folder, used to name the report files.
pub fn folder_stem(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "images".to_string())
}
