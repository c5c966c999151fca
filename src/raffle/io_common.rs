use std::path::{Path, PathBuf};

/// The last component of a path, for display.
pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Paths in a configuration file are relative to the directory of that file.
pub fn resolve_path(config_path: Option<&str>, path: &str) -> String {
    let p = Path::new(path);
    match config_path.and_then(|c| Path::new(c).parent()) {
        Some(root) if p.is_relative() => {
            let full: PathBuf = root.join(p);
            full.display().to_string()
        }
        _ => path.to_string(),
    }
}
