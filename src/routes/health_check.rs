use actix_web::{HttpResponse, Responder};

pub async fn health_check() -> impl Responder {
    "OK"
}

pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({}))
}
