use actix_web::{HttpResponse, Responder, get, http::header::ContentType, web};
use awesome_api::{AwesomeAPI, CurrencyPair};
use log::{debug, error, warn};
use quote_store::QuoteStore;

/// Serves the latest USD/BRL quote and then records it.
///
/// The response is fully built before the store is touched, so a slow or
/// failing insert can never change what the caller receives. The insert is
/// awaited before the response is handed back, which delays it by at most
/// the store deadline (10ms).
#[get("/cotacao")]
async fn get_cotacao(
    api: web::Data<AwesomeAPI>,
    store: web::Data<dyn QuoteStore>,
) -> HttpResponse {
    let quote = match api.get_quote(CurrencyPair::USD_BRL).await {
        Ok(quote) => quote,
        Err(e) => {
            error!("get_cotacao | fetch failed | {}", e);
            return HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body(e.to_string());
        }
    };

    let response = match serde_json::to_string(&quote) {
        Ok(body) => HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(body),
        Err(e) => {
            error!("get_cotacao | encode failed | {}", e);
            return HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body(e.to_string());
        }
    };

    match store.save(&quote).await {
        Ok(id) => debug!("get_cotacao | stored | id: {}", id),
        Err(e) if e.is_timeout() => warn!("Failed to store data: {}", e),
        Err(e) => error!("Failed to store data: {}", e),
    }

    response
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound()
        .content_type(ContentType::plaintext())
        .body("not found")
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(get_cotacao);
}
