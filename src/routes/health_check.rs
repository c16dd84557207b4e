use actix_web::HttpResponse;

/// Liveness check for the load balancer; never touches the database.
#[tracing::instrument(name = "Health check")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
