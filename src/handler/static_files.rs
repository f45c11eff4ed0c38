//! Static file serving module
//!
//! Serves the configured web root, including assets fetched at startup.

use crate::config::StaticFilesConfig;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a path from the static root, or 404
pub async fn serve(config: &StaticFilesConfig, path: &str, is_head: bool) -> Response<Full<Bytes>> {
    match load_from_directory(&config.root, path, &config.index_files).await {
        Some((content, content_type)) => http::build_file_response(content, &content_type, is_head),
        None => http::build_404_response(),
    }
}

/// Load a file below `static_dir`, trying index files for directories
///
/// Paths resolving outside the root are refused.
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, String)> {
    let relative_path = path.trim_start_matches('/');

    let static_dir_canonical = match fs::canonicalize(static_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_debug(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = Path::new(static_dir).join(relative_path);
    if is_dir(&file_path).await {
        file_path = find_index_file(&file_path, index_files).await?;
    }

    // File not found is common (404), no need to log at warning level
    let file_path_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime_guess::from_path(&file_path_canonical)
        .first_or_octet_stream()
        .to_string();

    Some((content, content_type))
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for index_file in index_files {
        let candidate = dir.join(index_file);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string()]
    }

    #[tokio::test]
    async fn test_serves_file_with_mime() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), b"console.log(1)").unwrap();
        let root = dir.path().to_str().unwrap();

        let (content, content_type) = load_from_directory(root, "/app.js", &index_files())
            .await
            .unwrap();
        assert_eq!(content, b"console.log(1)");
        assert!(content_type.contains("javascript"));
    }

    #[tokio::test]
    async fn test_index_file_for_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"<h1>relay</h1>").unwrap();
        let root = dir.path().to_str().unwrap();

        let (content, content_type) = load_from_directory(root, "/", &index_files())
            .await
            .unwrap();
        assert_eq!(content, b"<h1>relay</h1>");
        assert_eq!(content_type, "text/html");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        assert!(load_from_directory(root, "/nope.png", &index_files())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("public");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), b"hidden").unwrap();

        let result =
            load_from_directory(root.to_str().unwrap(), "/../secret.txt", &index_files()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_missing_root_is_404() {
        let config = StaticFilesConfig {
            root: "/definitely/not/here".to_string(),
            index_files: index_files(),
        };
        let resp = serve(&config, "/index.html", false).await;
        assert_eq!(resp.status(), 404);
    }
}
