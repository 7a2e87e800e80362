use super::error::DocError;
use super::schema::{FileMetadata, WriteResult};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Stat a regular file and describe it.
pub fn metadata(path: &Path) -> Result<FileMetadata, DocError> {
    let meta = fs::metadata(path).map_err(|_| not_found(path))?;
    if !meta.is_file() {
        return Err(not_found(path));
    }

    let modified_at = meta
        .modified()
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now());

    Ok(FileMetadata {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        absolute_path: absolute(path).to_string_lossy().into_owned(),
        size_bytes: meta.len(),
        modified_at,
    })
}

/// List regular files directly inside `directory`, optionally keeping only
/// those whose extension matches `extension` (case-insensitive, with or
/// without the leading dot). Order is whatever the filesystem yields.
pub fn list_files(
    directory: &Path,
    extension: Option<&str>,
) -> Result<Vec<FileMetadata>, DocError> {
    if !directory.is_dir() {
        return Err(DocError::NotADirectory(directory.display().to_string()));
    }

    let wanted = extension.map(normalize_extension);
    let entries = fs::read_dir(directory)
        .map_err(|_| DocError::NotADirectory(directory.display().to_string()))?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        // DirEntry::file_type does not follow symlinks.
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        let path = entry.path();
        if let Some(wanted) = &wanted {
            if dotted_extension(&path).as_deref() != Some(wanted.as_str()) {
                continue;
            }
        }
        match metadata(&path) {
            Ok(meta) => files.push(meta),
            Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    tracing::debug!("Listed {} files in {}", files.len(), directory.display());
    Ok(files)
}

/// Write `content` as UTF-8, creating parent directories and overwriting any
/// existing file.
pub fn write_file(path: &Path, content: &str) -> WriteResult {
    let attempt = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    };

    match attempt() {
        Ok(()) => WriteResult {
            ok: true,
            path: absolute(path).to_string_lossy().into_owned(),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Failed to write {}: {}", path.display(), e);
            WriteResult {
                ok: false,
                path: path.display().to_string(),
                error: Some(DocError::WriteFailed {
                    path: path.display().to_string(),
                    detail: e.to_string(),
                }),
            }
        }
    }
}

/// Lower-cased extension of `path` with a leading dot, e.g. `".pdf"`.
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn not_found(path: &Path) -> DocError {
    DocError::NotFound(path.display().to_string())
}
