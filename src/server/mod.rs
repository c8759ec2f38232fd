//! HTTP server: pages, the signup API and static assets

use anyhow::Result;
use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{ContentItem, ContentLoader, ContentType};
use crate::signup::{RequestMeta, SignupError, SignupService, INTERNAL_ERROR_MESSAGE};
use crate::store::SignupStore;
use crate::templates::TemplateRenderer;
use crate::Site;

/// Server state
pub struct AppState {
    loader: ContentLoader,
    signups: SignupService,
    templates: TemplateRenderer,
    static_dir: PathBuf,
}

impl AppState {
    pub fn new(site: &Site, store: Arc<dyn SignupStore>) -> Result<Self> {
        Ok(Self {
            loader: site.content_loader(),
            signups: site.signup_service_with(store),
            templates: TemplateRenderer::new(&site.config)?,
            static_dir: site.static_dir.clone(),
        })
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/blog", get(blog_index_handler))
        .route("/blog/:slug", get(blog_post_handler))
        .route("/compare/:slug", get(comparison_handler))
        .route("/faq/:slug", get(faq_handler))
        .route("/api/signup", get(count_handler).post(signup_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let store = crate::store::connect(&site.config.store)?;
    let state = Arc::new(AppState::new(site, store)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(State(state): State<Arc<AppState>>) -> Response {
    html_page(StatusCode::OK, state.templates.render_home())
}

async fn blog_index_handler(State(state): State<Arc<AppState>>) -> Response {
    let loader = state.loader.clone();
    match tokio::task::spawn_blocking(move || loader.list_posts(ContentType::BlogPost)).await {
        Ok(posts) => html_page(
            StatusCode::OK,
            state.templates.render_listing(ContentType::BlogPost, &posts),
        ),
        Err(e) => {
            tracing::error!("Content task failed: {}", e);
            internal_error_page()
        }
    }
}

async fn blog_post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    article_page(state, ContentType::BlogPost, slug).await
}

async fn comparison_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    article_page(state, ContentType::Comparison, slug).await
}

async fn faq_handler(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    article_page(state, ContentType::Faq, slug).await
}

/// Render one content item, or the 404 page when it is absent
async fn article_page(state: Arc<AppState>, content_type: ContentType, slug: String) -> Response {
    let loader = state.loader.clone();
    let item: Option<ContentItem> =
        match tokio::task::spawn_blocking(move || loader.get_post(content_type, &slug)).await {
            Ok(item) => item,
            Err(e) => {
                tracing::error!("Content task failed: {}", e);
                return internal_error_page();
            }
        };

    match item {
        Some(item) => html_page(StatusCode::OK, state.templates.render_article(&item)),
        None => not_found_page(&state),
    }
}

/// `POST /api/signup`
async fn signup_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Signup error: unreadable request body: {}", e);
            return signup_error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE);
        }
    };

    let email = match payload.get("email") {
        None | Some(Value::Null) => None,
        Some(Value::String(email)) => Some(email.as_str()),
        Some(_) => {
            let err = SignupError::InvalidEmail;
            return signup_error_response(StatusCode::BAD_REQUEST, &err.public_message());
        }
    };

    let meta = request_meta(&headers);

    match state.signups.signup(email, &meta).await {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(err) => {
            let status = if err.is_validation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            signup_error_response(status, &err.public_message())
        }
    }
}

/// `GET /api/signup`
async fn count_handler(State(state): State<Arc<AppState>>) -> Response {
    Json(json!({ "count": state.signups.count().await })).into_response()
}

/// Serve static files, falling back to the 404 page
async fn fallback_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let mut service = ServeDir::new(&state.static_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => not_found_page(&state),
        Err(e) => {
            tracing::error!("Static file error: {}", e);
            internal_error_page()
        }
    }
}

/// Pull the headers the signup record keeps
fn request_meta(headers: &HeaderMap) -> RequestMeta {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    RequestMeta {
        forwarded_for: header_value("x-forwarded-for"),
        user_agent: header_value(header::USER_AGENT.as_str()),
    }
}

fn signup_error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn html_page(status: StatusCode, rendered: Result<String>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:#}", e);
            internal_error_page()
        }
    }
}

fn not_found_page(state: &AppState) -> Response {
    match state.templates.render_not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:#}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

fn internal_error_page() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
