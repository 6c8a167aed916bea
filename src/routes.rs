use actix_files::{Files, NamedFile};
use actix_web::{
    get,
    http::{Method, StatusCode},
    web::{self, Data},
    Either, HttpResponse, Responder,
};
use serde::Deserialize;
use serde_json::json;
use tera::Context;

use crate::{db, errors::AppError, seed, AppState, TEMPLATES};

/// Revenue bars are drawn at a fixed height regardless of the amount.
const REVENUE_BAR_HEIGHT: u32 = 100;
const CHART_HEIGHT: u32 = 350;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(Files::new("/static", "static"))
        .service(db_test_handler)
        .service(query_handler)
        .service(seed_handler)
        .service(index_handler)
        .service(dashboard_handler)
        .service(invoices_handler)
        .service(edit_invoice_handler)
        .service(customers_handler);
}

fn render(template: &str, context: &Context) -> Result<HttpResponse, AppError> {
    let rendered = TEMPLATES.render(template, context).map_err(|e| {
        log::error!("Failed to render template {}: {}", template, e);
        AppError::TemplateError(e)
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(rendered))
}

/// Liveness check against the pool.
#[get("/api/db-test")]
pub async fn db_test_handler(state: Data<AppState>) -> impl Responder {
    match db::ping(&state).await {
        Ok(rows) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Database connection successful!",
            "data": rows,
        })),
        Err(e) => {
            log::error!("Database connection failed: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": e.to_string(),
            }))
        }
    }
}

#[get("/query")]
pub async fn query_handler(state: Data<AppState>) -> Result<impl Responder, AppError> {
    let invoices = db::list_invoices_666(&state).await?;
    Ok(HttpResponse::Ok().json(invoices))
}

#[get("/seed")]
pub async fn seed_handler(state: Data<AppState>) -> Result<impl Responder, AppError> {
    seed::seed_database(&state).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Database seeded successfully" })))
}

#[get("/")]
pub async fn index_handler() -> impl Responder {
    HttpResponse::SeeOther()
        .append_header(("Location", "/dashboard"))
        .finish()
}

#[get("/dashboard")]
pub async fn dashboard_handler(state: Data<AppState>) -> Result<impl Responder, AppError> {
    let (cards, revenue, latest_invoices) = futures::try_join!(
        db::fetch_card_data(&state),
        db::fetch_revenue(&state),
        db::fetch_latest_invoices(&state),
    )?;

    let mut context = Context::new();
    context.insert("title", "Dashboard");
    context.insert("cards", &cards);
    context.insert("revenue", &revenue);
    context.insert("chart_height", &CHART_HEIGHT);
    context.insert("bar_height", &REVENUE_BAR_HEIGHT);
    context.insert("latest_invoices", &latest_invoices);
    context.insert("version", env!("CARGO_PKG_VERSION"));

    render("dashboard.html", &context)
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    query: Option<String>,
    page: Option<i64>,
}

#[get("/dashboard/invoices")]
pub async fn invoices_handler(
    state: Data<AppState>,
    params: web::Query<SearchParams>,
) -> Result<impl Responder, AppError> {
    let query = params.query.clone().unwrap_or_default();
    let current_page = params.page.unwrap_or(1).max(1);

    let (invoices, total_pages) = futures::try_join!(
        db::fetch_filtered_invoices(&state, &query, current_page),
        db::fetch_invoices_pages(&state, &query),
    )?;
    let pages: Vec<i64> = (1..=total_pages).collect();

    let mut context = Context::new();
    context.insert("title", "Invoices");
    context.insert("query", &query);
    context.insert("invoices", &invoices);
    context.insert("current_page", &current_page);
    context.insert("pages", &pages);

    render("invoices.html", &context)
}

#[get("/dashboard/invoices/{id}/edit")]
pub async fn edit_invoice_handler(
    state: Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();

    let (invoice, customers) = futures::try_join!(
        db::fetch_invoice_by_id(&state, &id),
        db::fetch_customers(&state),
    )?;
    let invoice = invoice.ok_or(AppError::NotFound)?;

    let mut context = Context::new();
    context.insert("title", "Edit Invoice");
    context.insert("invoice", &invoice);
    context.insert("customers", &customers);

    render("edit_invoice.html", &context)
}

#[get("/dashboard/customers")]
pub async fn customers_handler(
    state: Data<AppState>,
    params: web::Query<SearchParams>,
) -> Result<impl Responder, AppError> {
    let query = params.query.clone().unwrap_or_default();
    let customers = db::fetch_filtered_customers(&state, &query).await?;

    let mut context = Context::new();
    context.insert("title", "Customers");
    context.insert("query", &query);
    context.insert("customers", &customers);

    render("customers.html", &context)
}

pub async fn default_handler(req_method: Method) -> Result<impl Responder, std::io::Error> {
    match req_method {
        Method::GET => {
            let file = NamedFile::open("static/404.html")?
                .customize()
                .with_status(StatusCode::NOT_FOUND);
            Ok(Either::Left(file))
        }
        _ => Ok(Either::Right(HttpResponse::MethodNotAllowed().finish())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::Value;

    use crate::{
        db::{seeded_state, test_state},
        placeholder,
        seed::{create_schema, invoice_id},
    };

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(Data::new($state))
                    .configure(configure)
                    .default_service(web::to(default_handler)),
            )
            .await
        };
    }

    macro_rules! get_text {
        ($app:expr, $uri:expr) => {{
            let req = test::TestRequest::get().uri($uri).to_request();
            let resp = test::call_service(&$app, req).await;
            let status = resp.status();
            let body = test::read_body(resp).await;
            (status, String::from_utf8(body.to_vec()).unwrap())
        }};
    }

    #[actix_web::test]
    async fn db_test_reports_success() {
        let app = app!(test_state().await);
        let req = test::TestRequest::get().uri("/api/db-test").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"], json!([{ "1": 1 }]));
    }

    #[actix_web::test]
    async fn db_test_reports_failure_as_500() {
        let state = test_state().await;
        state.db_pool.close().await;
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/db-test").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[actix_web::test]
    async fn query_returns_empty_array_without_matches() {
        let state = test_state().await;
        create_schema(&state).await.unwrap();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/query").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn query_failure_is_json_500() {
        let app = app!(test_state().await);
        let req = test::TestRequest::get().uri("/query").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Failed to fetch invoices." }));
    }

    #[actix_web::test]
    async fn seed_route_is_repeatable() {
        let state = test_state().await;
        let app = app!(state.clone());

        for _ in 0..2 {
            let req = test::TestRequest::get().uri("/seed").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "message": "Database seeded successfully" }));
        }

        let invoices: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&state.db_pool)
            .await
            .unwrap();
        assert_eq!(invoices, placeholder::INVOICES.len() as i64);

        let req = test::TestRequest::get().uri("/query").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([{ "amount": 666, "name": "Evil Rabbit" }]));
    }

    #[actix_web::test]
    async fn index_redirects_to_dashboard() {
        let app = app!(test_state().await);
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get("Location").unwrap(), "/dashboard");
    }

    #[actix_web::test]
    async fn dashboard_renders_cards_chart_and_latest() {
        let app = app!(seeded_state().await);
        let (status, html) = get_text!(app, "/dashboard");
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Recent Revenue"));
        assert!(html.contains("height: 100px"));
        assert!(html.contains("Dec"));
        assert!(html.contains("Michael Novotny"));
        assert!(html.contains("$448.00"));
        assert!(!html.contains("No data available."));
    }

    #[actix_web::test]
    async fn dashboard_without_revenue_says_so() {
        let state = test_state().await;
        create_schema(&state).await.unwrap();
        let app = app!(state);
        let (status, html) = get_text!(app, "/dashboard");
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("No data available."));
        assert!(html.contains("$0.00"));
    }

    #[actix_web::test]
    async fn invoices_page_filters_and_paginates() {
        let app = app!(seeded_state().await);

        let (status, html) = get_text!(app, "/dashboard/invoices?query=lee");
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Lee Robinson"));
        assert!(!html.contains("Evil Rabbit"));
        assert!(html.contains("$542.46"));

        let (_, html) = get_text!(app, "/dashboard/invoices?page=3");
        assert!(html.contains("Jun 5, 2022"));
        assert!(html.contains("page=3"));
        assert!(!html.contains("page=4"));
    }

    #[actix_web::test]
    async fn huge_page_number_renders_empty_table() {
        let app = app!(seeded_state().await);
        let (status, html) = get_text!(app, "/dashboard/invoices?page=9223372036854775807");
        assert_eq!(status, StatusCode::OK);
        assert!(!html.contains("/edit\""));
        assert!(!html.contains("Evil Rabbit"));
        assert!(html.contains("page=3"));
    }

    #[actix_web::test]
    async fn edit_invoice_shows_dollar_amount() {
        let app = app!(seeded_state().await);
        let id = invoice_id(&placeholder::INVOICES[3]);

        let (status, html) = get_text!(app, &format!("/dashboard/invoices/{id}/edit"));
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("value=\"448"));
        assert!(html.contains("Balazs Orban"));

        let (status, _) = get_text!(app, "/dashboard/invoices/unknown/edit");
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn customers_page_lists_aggregates() {
        let app = app!(seeded_state().await);
        let (status, html) = get_text!(app, "/dashboard/customers?query=AMY");
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Amy Burns"));
        assert!(html.contains("$42.90"));
        assert!(!html.contains("Lee Robinson"));
    }

    #[actix_web::test]
    async fn unknown_routes_fall_through() {
        let app = app!(test_state().await);
        let (status, _) = get_text!(app, "/nope");
        assert_eq!(status, StatusCode::NOT_FOUND);

        let req = test::TestRequest::post().uri("/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
