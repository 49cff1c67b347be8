//! Posts directory scanning.

use std::path::{Path, PathBuf};

use crate::BuildError;

/// Markdown post found in the source directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostSource {
    /// File name without the `.md` extension.
    pub slug: String,
    /// Path of the markdown file.
    pub path: PathBuf,
}

/// Contents of the source directory relevant to a build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SourceFiles {
    /// Markdown posts, sorted by slug.
    pub posts: Vec<PostSource>,
    /// Pre-rendered SVG files copied verbatim, sorted by path.
    pub assets: Vec<PathBuf>,
}

/// List posts and SVG assets directly inside `source_dir`.
///
/// Subdirectories and other files are skipped.
pub(crate) async fn scan(source_dir: &Path) -> Result<SourceFiles, BuildError> {
    if !tokio::fs::try_exists(source_dir)
        .await
        .map_err(BuildError::io(source_dir))?
    {
        return Err(BuildError::SourceDirMissing(source_dir.to_path_buf()));
    }

    let mut files = SourceFiles::default();
    let mut entries = tokio::fs::read_dir(source_dir)
        .await
        .map_err(BuildError::io(source_dir))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(BuildError::io(source_dir))?
    {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(BuildError::io(&path))?;
        if !file_type.is_file() {
            tracing::debug!(path = %path.display(), "skipping non-file entry");
            continue;
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("md") => {
                if let Some(slug) = path.file_stem().and_then(|stem| stem.to_str()) {
                    files.posts.push(PostSource {
                        slug: slug.to_owned(),
                        path: path.clone(),
                    });
                }
            }
            Some("svg") => files.assets.push(path),
            _ => {}
        }
    }

    files.posts.sort_by(|a, b| a.slug.cmp(&b.slug));
    files.assets.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_scan_posts_and_assets() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("the-edge.md"), "# Edge").unwrap();
        std::fs::write(root.join("about.md"), "# About").unwrap();
        std::fs::write(root.join("flow.svg"), "<svg/>").unwrap();
        std::fs::write(root.join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(root.join("drafts.md")).unwrap();

        let files = scan(root).await.unwrap();
        assert_eq!(
            files,
            SourceFiles {
                posts: vec![
                    PostSource {
                        slug: "about".to_owned(),
                        path: root.join("about.md"),
                    },
                    PostSource {
                        slug: "the-edge".to_owned(),
                        path: root.join("the-edge.md"),
                    },
                ],
                assets: vec![root.join("flow.svg")],
            }
        );
    }

    #[tokio::test]
    async fn test_scan_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("posts");
        let err = scan(&missing).await.unwrap_err();
        assert!(matches!(err, BuildError::SourceDirMissing(path) if path == missing));
    }
}
