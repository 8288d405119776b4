use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use peermatch_core::Profile;
use peermatch_match::MatchEngine;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Deserialize)]
struct MatchParams {
    top_n: Option<usize>,
}

const DEFAULT_TOP_N: usize = 5;

pub struct RestApi;

impl RestApi {
    /// Serve the fitted engine over HTTP
    ///
    /// The engine is read-only after fit, so one `Arc` is shared across all
    /// workers without locking.
    pub async fn start(engine: Arc<MatchEngine>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(engine.clone()))
                .route("/health", web::get().to(health))
                .route("/match", web::post().to(find_matches))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn health(engine: web::Data<Arc<MatchEngine>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "population": engine.population_len(),
    })))
}

async fn find_matches(
    engine: web::Data<Arc<MatchEngine>>,
    params: web::Query<MatchParams>,
    query: web::Json<Profile>,
) -> ActixResult<HttpResponse> {
    let top_n = params.top_n.unwrap_or(DEFAULT_TOP_N);

    match engine.find_matches(&query, top_n) {
        Ok(matches) => Ok(HttpResponse::Ok().json(matches)),
        Err(e) => {
            // A bad query fails that request only; the engine stays up
            warn!(error = %e, "match query rejected");
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string(),
            })))
        }
    }
}
