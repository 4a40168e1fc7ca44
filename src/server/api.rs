use crate::agent::PerfumeAdvisor;
use crate::cli::Args;
use crate::models::recommendation::{ HealthResponse, RecommendationRequest, RecommendationResponse };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::State,
    response::{ IntoResponse, Response },
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error };
use uuid::Uuid;

#[derive(Clone)]
struct AppState {
    advisor: Arc<PerfumeAdvisor>,
}

pub fn router(advisor: Arc<PerfumeAdvisor>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/get-recommendation", post(recommendation_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(AppState { advisor })
}

pub async fn start_http_server(
    addr: &str,
    advisor: Arc<PerfumeAdvisor>,
    args: &Args
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    let app = router(advisor);

    if args.enable_tls {
        let (cert_path, key_path) = match (&args.tls_cert_path, &args.tls_key_path) {
            (Some(cert), Some(key)) => (cert, key),
            _ => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                return Err("Missing TLS certificate or key path".into());
            }
        };
        info!("TLS enabled. Loading certificate from '{}' and key from '{}'", cert_path, key_path);
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("HTTPS server listening on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            e
        })?;
        info!("HTTP server listening on: http://{}", addr);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

async fn recommendation_handler(
    State(state): State<AppState>,
    Json(req): Json<RecommendationRequest>
) -> Response {
    let request_id = Uuid::new_v4();
    info!(
        "[{}] Recommendation request from '{}' (context supplied: {})",
        request_id,
        req.username,
        req.reusable_context().is_some()
    );

    // Detached so a dropped connection cannot cut the handler off before
    // the conversation log write.
    let advisor = Arc::clone(&state.advisor);
    let task = tokio::spawn(async move { advisor.handle(&req).await });

    match task.await {
        Ok(resp) => {
            info!("[{}] Responded with {} chars", request_id, resp.recommendation.chars().count());
            Json(resp).into_response()
        }
        Err(e) => {
            error!("[{}] Recommendation task failed: {}", request_id, e);
            let messages = &state.advisor.prompt_config().messages;
            let body = RecommendationResponse {
                recommendation: messages.upstream_error(&e),
                context: String::new(),
            };
            Json(body).into_response()
        }
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".to_string() })
}
