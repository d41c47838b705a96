//! Image gallery over the render output directory.
//!
//! Routes:
//! * `GET /` - HTML page of every image, click to zoom.
//! * `GET /img/{name}` - one image file.
//! * `GET /api/images` - JSON list of image names.
//!
//! The gallery only reads files; it never touches a loaded network.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::types::error::Result;

const IMAGE_EXTENSIONS: [&str; 2] = ["png", "svg"];

/// Bytes escaped in a URL path segment (RFC 3986 unreserved stay as is).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug)]
struct GalleryState {
    dir: PathBuf,
}

/// Lists image files in `dir`, sorted by name.
pub fn list_images(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
            });
        if !is_image || !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            images.push(name.to_string());
        }
    }
    images.sort();
    Ok(images)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Network Renders</title>
    <style>
        body { margin: 0; font-family: 'Segoe UI', sans-serif; background: #fdfdfd; }
        .banner { background-color: #F26522; color: white; padding: 15px 30px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        .grid { padding: 30px; display: flex; flex-wrap: wrap; gap: 20px; justify-content: center; }
        .item { background: white; padding: 10px; box-shadow: 0 0 10px rgba(0,0,0,0.1); border-radius: 10px; text-align: center; max-width: 320px; cursor: pointer; }
        img.render { max-width: 100%; height: auto; border-radius: 6px; transition: transform 0.2s; }
        img.render:hover { transform: scale(1.05); }
        h2 { font-size: 0.9rem; margin: 0.5em 0 0; color: #333; }
        .empty { text-align: center; color: #777; }
        .modal { display: none; position: fixed; z-index: 999; left: 0; top: 0; width: 100%; height: 100%; background-color: rgba(0,0,0,0.8); }
        .modal-content { display: block; margin: 50px auto; max-width: 90%; max-height: 80%; border-radius: 10px; box-shadow: 0 0 10px white; }
        .modal-close { position: absolute; top: 20px; right: 30px; color: white; font-size: 2rem; font-weight: bold; cursor: pointer; }
    </style>
</head>
<body>
    <div class="banner"><strong>ISP Backbone</strong><br>Rendered networks and routes</div>
    <div class="grid">
"#;

const PAGE_TAIL: &str = r#"    </div>
    <div id="modal" class="modal" onclick="hideModal()">
        <span class="modal-close">&times;</span>
        <img id="modal-img" class="modal-content">
    </div>
    <script>
        function showModal(src) {
            document.getElementById("modal").style.display = "block";
            document.getElementById("modal-img").src = "/img/" + encodeURIComponent(src);
        }
        function hideModal() {
            document.getElementById("modal").style.display = "none";
        }
    </script>
</body>
</html>
"#;

/// Renders the gallery page for `images`.
pub fn index_page(images: &[String]) -> String {
    let mut page = String::from(PAGE_HEAD);
    if images.is_empty() {
        page.push_str("        <p class=\"empty\">No images rendered yet.</p>\n");
    }
    for image in images {
        let name = escape_html(image);
        let url = utf8_percent_encode(image, PATH_SEGMENT);
        page.push_str(&format!(
            "        <div class=\"item\" data-src=\"{name}\" onclick=\"showModal(this.dataset.src)\">\n            <img class=\"render\" src=\"/img/{url}\" alt=\"{name}\">\n            <h2>{name}</h2>\n        </div>\n"
        ));
    }
    page.push_str(PAGE_TAIL);
    page
}

fn listing_error(err: std::io::Error) -> Response {
    error!("Failed to list images: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}

async fn index(State(state): State<Arc<GalleryState>>) -> Response {
    match list_images(&state.dir) {
        Ok(images) => Html(index_page(&images)).into_response(),
        Err(err) => listing_error(err),
    }
}

async fn images(State(state): State<Arc<GalleryState>>) -> Response {
    match list_images(&state.dir) {
        Ok(images) => Json(images).into_response(),
        Err(err) => listing_error(err),
    }
}

/// Builds the gallery application for `dir`.
pub fn app(dir: PathBuf) -> Router {
    let serve_dir = ServeDir::new(&dir);
    Router::new()
        .route("/", get(index))
        .route("/api/images", get(images))
        .nest_service("/img", serve_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(GalleryState { dir }))
}

/// Serves the gallery on `addr` until the process stops.
///
/// `dir` is created if missing.
pub async fn serve(dir: PathBuf, addr: SocketAddr) -> Result<()> {
    std::fs::create_dir_all(&dir)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Gallery serving {} on http://{}",
        dir.display(),
        listener.local_addr()?
    );
    axum::serve(listener, app(dir)).await?;
    Ok(())
}

#[cfg(test)]
mod gallery_tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("network_latency.png"), b"\x89PNG").unwrap();
        std::fs::write(dir.path().join("a<b>.svg"), "<svg/>").unwrap();
        std::fs::write(dir.path().join("network_latency.dot"), "graph {}").unwrap();
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();
        dir
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[test]
    fn test_list_images_filters_and_sorts() {
        let dir = fixture();
        assert_eq!(
            list_images(dir.path()).unwrap(),
            vec!["a<b>.svg".to_string(), "network_latency.png".to_string()]
        );
    }

    #[test]
    fn test_index_page_escapes_names() {
        let page = index_page(&["a<b>.svg".to_string()]);
        assert!(page.contains("a&lt;b&gt;.svg"));
        assert!(!page.contains("a<b>.svg"));
        assert!(index_page(&[]).contains("No images rendered yet."));
    }

    #[test]
    fn test_index_page_encodes_urls() {
        let page = index_page(&["route_A#1_B.png".to_string(), "50% ñ.png".to_string()]);
        assert!(page.contains("src=\"/img/route_A%231_B.png\""));
        assert!(page.contains("src=\"/img/50%25%20%C3%B1.png\""));
        assert!(page.contains("data-src=\"route_A#1_B.png\""));
        assert!(page.contains("encodeURIComponent(src)"));
    }

    #[tokio::test]
    async fn test_encoded_names_resolve() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("route_A#1_B.png"), b"route").unwrap();
        std::fs::write(dir.path().join("50%.png"), b"half").unwrap();

        let (status, body) =
            get_body(app(dir.path().to_path_buf()), "/img/route_A%231_B.png").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"route");

        let (status, body) = get_body(app(dir.path().to_path_buf()), "/img/50%25.png").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"half");
    }

    #[tokio::test]
    async fn test_index_route() {
        let dir = fixture();
        let (status, body) = get_body(app(dir.path().to_path_buf()), "/").await;
        assert_eq!(status, StatusCode::OK);
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("src=\"/img/network_latency.png\""));
        assert!(!body.contains("network_latency.dot"));
    }

    #[tokio::test]
    async fn test_api_images_route() {
        let dir = fixture();
        let (status, body) = get_body(app(dir.path().to_path_buf()), "/api/images").await;
        assert_eq!(status, StatusCode::OK);
        let images: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(images, vec!["a<b>.svg", "network_latency.png"]);
    }

    #[tokio::test]
    async fn test_image_route() {
        let dir = fixture();
        let (status, body) =
            get_body(app(dir.path().to_path_buf()), "/img/network_latency.png").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"\x89PNG");

        let (status, _) = get_body(app(dir.path().to_path_buf()), "/img/missing.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = get_body(app(dir.path().join("gone")), "/api/images").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
