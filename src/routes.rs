//! HTTP surface for the template resource.
//!
//! Handlers validate request shape (path ids, body rules) before the
//! service is invoked, so malformed input never reaches persistence, then
//! map service results onto responses.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use hyper::HeaderMap;
use std::collections::HashMap;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{CountResponse, Template, TemplateCreate, TemplateUpdate};
use crate::pagination::{calculate_content_range, Paginated};
use crate::service::TemplateService;
use crate::validation::{parse_template_id, Violation};

/// Mount all template endpoints, sharing one service instance.
pub fn router(service: TemplateService) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_templates))
        .routes(routes!(count_templates))
        .routes(routes!(get_template))
        .routes(routes!(create_template))
        .routes(routes!(update_template))
        .routes(routes!(delete_template))
        .with_state(service)
}

fn template_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_template_id(raw).map_err(|violation| ApiError::validation_failed(vec![violation]))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::validation_failed(vec![Violation::new(
            rejection.body_text(),
            "BODY_INVALID",
        )])),
    }
}

#[utoipa::path(
    get,
    path = "/",
    params(
        ("filter" = Option<String>, Query, description = "JSON-encoded filter, e.g. {\"name\": \"example\"} or {\"q\": \"search text\"}"),
        ("sort" = Option<String>, Query, description = "JSON array of [\"column\", \"ASC\"|\"DESC\"]"),
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("per_page" = Option<u64>, Query, description = "Page size, up to the declared maximum"),
    ),
    responses(
        (status = 200, description = "One page of templates", body = Paginated<Template>),
        (status = 400, description = "Query translation failed")
    )
)]
pub async fn list_templates(
    Query(params): Query<HashMap<String, String>>,
    State(service): State<TemplateService>,
) -> Result<(HeaderMap, Json<Paginated<Template>>), ApiError> {
    let page = service.list(&params).await?;
    let headers = calculate_content_range(page.offset(), page.per_page, page.total, "templates");
    Ok((headers, Json(page)))
}

#[utoipa::path(
    get,
    path = "/count",
    responses(
        (status = 200, description = "Total number of templates", body = CountResponse)
    )
)]
pub async fn count_templates(
    State(service): State<TemplateService>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = service.count().await?;
    Ok(Json(CountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = String, Path, description = "Template id (UUID v4)")),
    responses(
        (status = 200, description = "The requested template", body = Template),
        (status = 400, description = "Malformed template id"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn get_template(
    State(service): State<TemplateService>,
    Path(id): Path<String>,
) -> Result<Json<Template>, ApiError> {
    let id = template_id(&id)?;
    Ok(Json(service.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = TemplateCreate,
    responses(
        (status = 201, description = "Template created", body = Template),
        (status = 400, description = "Request validation failed"),
        (status = 409, description = "A template with this email already exists")
    )
)]
pub async fn create_template(
    State(service): State<TemplateService>,
    payload: Result<Json<TemplateCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Template>), ApiError> {
    let input = body(payload)?;
    input.validate().map_err(ApiError::validation_failed)?;
    let template = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    params(("id" = String, Path, description = "Template id (UUID v4)")),
    request_body = TemplateUpdate,
    responses(
        (status = 200, description = "Template updated", body = Template),
        (status = 400, description = "Request validation failed"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn update_template(
    State(service): State<TemplateService>,
    Path(id): Path<String>,
    payload: Result<Json<TemplateUpdate>, JsonRejection>,
) -> Result<Json<Template>, ApiError> {
    let id = template_id(&id)?;
    let input = body(payload)?;
    input.validate().map_err(ApiError::validation_failed)?;
    Ok(Json(service.update(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    params(("id" = String, Path, description = "Template id (UUID v4)")),
    responses(
        (status = 200, description = "The deleted template", body = Template),
        (status = 400, description = "Malformed template id"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn delete_template(
    State(service): State<TemplateService>,
    Path(id): Path<String>,
) -> Result<Json<Template>, ApiError> {
    let id = template_id(&id)?;
    Ok(Json(service.delete(id).await?))
}
