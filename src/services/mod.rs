use actix_multipart::form::text::TextConfig;
use actix_web::{get, web, HttpResponse, Responder};

pub mod db_models;
pub mod db_utils;
pub mod insertable;
pub mod messages;
pub mod sqlite_handling;

const INDEX_PAGE: &str = include_str!("../../templates/index.html");

#[get("/")]
pub async fn home_page() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_PAGE)
}

#[get("/healthcheck")]
pub async fn healthcheck() -> impl Responder {
    HttpResponse::Ok().body("I'm alive!")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // browsers send multipart text parts without a content type
    cfg.app_data(TextConfig::default().validate_content_type(false))
        .service(home_page)
        .service(healthcheck)
        .service(cafes_route::random_cafe)
        .service(cafes_route::all_cafes)
        .service(cafes_route::find_cafes)
        .service(cafes_route::add_cafe)
        .service(cafes_route::update_cafe)
        .service(cafes_route::update_price)
        .service(cafes_route::delete_cafe);
}

pub mod cafes_route {
    use actix_multipart::form::MultipartForm;
    use actix_web::web::{Data, Form, Path, Query};
    use actix_web::{get, post, route, Either, HttpResponse};
    use serde_json::json;

    use crate::services::db_utils::AppState;
    use crate::services::insertable::{CafeForm, CafeMultipart};
    use crate::services::messages::{
        AddCafe, DeleteCafe, FetchCafes, FetchRandomCafe, FindCafesByLocation, UpdateCafe,
        UpdateCafePrice,
    };
    use crate::types::{
        ServiceError, CAFE_ADDED, CAFE_DELETED, CAFE_NOT_FOUND, CAFE_UPDATED, DELETE_REJECTED,
        LOCATION_NOT_FOUND, NO_CAFES,
    };

    #[get("/random")]
    pub async fn random_cafe(state: Data<AppState>) -> Result<HttpResponse, ServiceError> {
        match state.db.send(FetchRandomCafe).await?? {
            Some(cafe) => Ok(HttpResponse::Ok().json(json!({ "cafe": cafe }))),
            None => Ok(HttpResponse::NotFound().json(json!({ "error": NO_CAFES }))),
        }
    }

    #[get("/all")]
    pub async fn all_cafes(state: Data<AppState>) -> Result<HttpResponse, ServiceError> {
        let cafes = state.db.send(FetchCafes).await??;

        Ok(HttpResponse::Ok().json(cafes))
    }

    /// Query strings and urlencoded bodies as ordered pairs, so repeated keys never fail extraction.
    pub type Pairs = Vec<(String, String)>;

    /// Urlencoded or multipart body. Anything else reads as an empty form.
    pub type CafeBody = Option<Either<Form<Pairs>, MultipartForm<CafeMultipart>>>;

    /// First value of `key`, later repeats are ignored.
    pub fn first_param(pairs: Pairs, key: &str) -> Option<String> {
        pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn into_form(body: CafeBody) -> CafeForm {
        match body {
            Some(Either::Left(pairs)) => CafeForm::from_pairs(pairs.into_inner()),
            Some(Either::Right(parts)) => parts.0.into(),
            None => CafeForm::default(),
        }
    }

    /// Misses are reported in the body with a 200, never as a 404.
    #[get("/find")]
    pub async fn find_cafes(
        state: Data<AppState>,
        query: Query<Pairs>,
    ) -> Result<HttpResponse, ServiceError> {
        let cafes = match first_param(query.into_inner(), "loc") {
            Some(loc) => state.db.send(FindCafesByLocation(loc)).await??,
            None => Vec::new(),
        };

        if cafes.is_empty() {
            return Ok(HttpResponse::Ok().json(json!({ "error": LOCATION_NOT_FOUND })));
        }

        Ok(HttpResponse::Ok().json(cafes))
    }

    #[post("/add")]
    pub async fn add_cafe(
        state: Data<AppState>,
        body: CafeBody,
    ) -> Result<HttpResponse, ServiceError> {
        let form = into_form(body);
        let name = form.name.clone().unwrap_or_default();

        state.db.send(AddCafe(form)).await??;
        tracing::info!(%name, "cafe added");

        Ok(HttpResponse::Ok().json(json!({ "response": { "success": CAFE_ADDED } })))
    }

    #[route("/update-cafe/{id}", method = "PUT", method = "PATCH")]
    pub async fn update_cafe(
        state: Data<AppState>,
        path: Path<i32>,
        body: CafeBody,
    ) -> Result<HttpResponse, ServiceError> {
        let id = path.into_inner();
        let form = into_form(body);

        match state.db.send(UpdateCafe { id, form }).await?? {
            Some(cafe) => {
                tracing::info!(id, "cafe updated");
                Ok(HttpResponse::Ok().json(json!([{ "result": CAFE_UPDATED }, cafe])))
            }
            None => Ok(HttpResponse::Ok().json(json!({ "error": CAFE_NOT_FOUND }))),
        }
    }

    /// Unlike `/update-cafe`, a missing cafe here is a 400.
    #[route("/update-price/{id}", method = "GET", method = "PATCH")]
    pub async fn update_price(
        state: Data<AppState>,
        path: Path<i32>,
        query: Query<Pairs>,
    ) -> Result<HttpResponse, ServiceError> {
        let id = path.into_inner();
        let coffee_price = first_param(query.into_inner(), "coffee_price");

        if state.db.send(UpdateCafePrice { id, coffee_price }).await?? {
            tracing::info!(id, "coffee price updated");
            Ok(HttpResponse::Ok().json(json!({ "result": CAFE_UPDATED })))
        } else {
            Ok(HttpResponse::BadRequest().json(json!({ "error": CAFE_NOT_FOUND })))
        }
    }

    /// A bad key and an unknown id produce the same 400 body.
    #[route("/delete-cafe/{id}", method = "GET", method = "DELETE")]
    pub async fn delete_cafe(
        state: Data<AppState>,
        path: Path<i32>,
        query: Query<Pairs>,
    ) -> Result<HttpResponse, ServiceError> {
        let id = path.into_inner();
        let api_key = first_param(query.into_inner(), "api-key").unwrap_or_default();

        let Some(client) = state.api_keys.client_for(&api_key) else {
            tracing::warn!(id, "delete rejected: unknown api key");
            return Ok(HttpResponse::BadRequest().json(json!({ "error": DELETE_REJECTED })));
        };

        if state.db.send(DeleteCafe(id)).await?? {
            tracing::info!(id, client, "cafe deleted");
            return Ok(HttpResponse::Ok().json(json!({ "success": CAFE_DELETED })));
        }

        tracing::warn!(id, client, "delete rejected: no such cafe");
        Ok(HttpResponse::BadRequest().json(json!({ "error": DELETE_REJECTED })))
    }
}
