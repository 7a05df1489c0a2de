//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `static_dir` - Directory served under `/static`
pub(crate) fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::site::index))
        .route(
            "/site/{*name}",
            get(handlers::site::get_page).post(handlers::site::post_page),
        )
        .route("/content/{*path}", get(handlers::content::get_content))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use loom_content::Cms;
    use loom_templates::Templates;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    fn site() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "templates/__layout.tmpl.html", "<main>{{ Slot(ctx) }}</main>");
        write(root, "templates/index.tmpl.html", "{{ ContentHTML('home.md') }}");
        write(root, "templates/broken.tmpl.html", "{{ ContentData('home.md') }}");
        write(root, "content/home.md", "# Welcome");
        write(root, "static/app.css", "body {}");

        let cms = Arc::new(Cms::new(root.join("content")).unwrap());
        let templates = Arc::new(Templates::new(root.join("templates"), Arc::clone(&cms)).unwrap());
        let state = Arc::new(AppState { cms, templates });
        let router = create_router(state, &root.join("static"));
        (dir, router)
    }

    async fn send(router: &Router, request: Request<Body>) -> Response {
        router.clone().oneshot(request).await.unwrap()
    }

    async fn get_uri(router: &Router, uri: &str) -> Response {
        send(router, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_to_index() {
        let (_dir, router) = site();

        let response = get_uri(&router, "/").await;

        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/site/index");
    }

    #[tokio::test]
    async fn test_site_renders_page_in_layout() {
        let (_dir, router) = site();

        let response = get_uri(&router, "/site/index").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        assert_eq!(
            body_string(response).await,
            "<main><h1>Welcome</h1>\n</main>"
        );
    }

    #[tokio::test]
    async fn test_site_unknown_template_is_404() {
        let (_dir, router) = site();

        let response = get_uri(&router, "/site/missing").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_site_render_failure_is_500() {
        let (_dir, router) = site();

        let response = get_uri(&router, "/site/broken").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_post_redirects_to_referer() {
        let (_dir, router) = site();
        let request = Request::post("/site/contact")
            .header(header::REFERER, "/site/index")
            .body(Body::empty())
            .unwrap();

        let response = send(&router, request).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/site/index");
    }

    #[tokio::test]
    async fn test_post_without_referer_redirects_to_page() {
        let (_dir, router) = site();
        let request = Request::post("/site/contact").body(Body::empty()).unwrap();

        let response = send(&router, request).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/site/contact");
    }

    #[tokio::test]
    async fn test_content_served_with_type() {
        let (_dir, router) = site();

        let response = get_uri(&router, "/content/home.md").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/markdown");
        assert_eq!(body_string(response).await, "# Welcome");
    }

    #[tokio::test]
    async fn test_missing_content_is_404() {
        let (_dir, router) = site();

        let response = get_uri(&router, "/content/nope.png").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_files() {
        let (_dir, router) = site();

        let response = get_uri(&router, "/static/app.css").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "body {}");
    }
}
