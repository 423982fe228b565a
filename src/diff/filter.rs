//! Narrows a parsed diff down to catalog files under the locale root.

use std::path::Path;

use glob::Pattern;

use super::FilePatch;

/// True if `path` is a catalog file inside `locale_root`.
pub fn is_catalog_path(path: &str, locale_root: &Path, extension: &str) -> bool {
    let path = Path::new(path);
    path.starts_with(locale_root)
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == extension)
}

/// Keeps patches whose effective path is a catalog file under the locale
/// root and matches no ignore pattern. Everything else is dropped.
pub fn locale_patches(
    patches: Vec<FilePatch>,
    locale_root: &Path,
    extension: &str,
    ignores: &[Pattern],
) -> Vec<FilePatch> {
    patches
        .into_iter()
        .filter(|patch| {
            patch.effective_path().is_some_and(|path| {
                is_catalog_path(path, locale_root, extension)
                    && !ignores.iter().any(|pattern| pattern.matches(path))
            })
        })
        .collect()
}

/// Extracts the locale code from a catalog path.
///
/// Nested layouts use the directory right under the root
/// (`locale/de_DE/app.po` -> `de_DE`); flat layouts fall back to the file
/// stem (`locale/de.po` -> `de`).
pub fn locale_of(path: &str, locale_root: &Path) -> String {
    let path = Path::new(path);
    let relative = path.strip_prefix(locale_root).unwrap_or(path);
    let mut components = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str());
    match (components.next(), components.next()) {
        (Some(dir), Some(_)) => dir.to_string(),
        _ => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string(),
    }
}
