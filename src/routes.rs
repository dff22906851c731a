//! HTTP surface.
//!
//! Routes follow `/{Controller}/{Action}/{id?}`, with `/` falling through to
//! `Home/Index`. Views are rendered as `{"view": "Controller/Action", "model":
//! ...}` documents, redirects as `303 See Other`.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    binding::BoundForm,
    config::Environment,
    controller::{ActionResult, HomeController, PersonController, ViewResult},
    error::{ErrorDetail, Result},
    view_models::PersonViewModel,
};

#[derive(Clone)]
pub struct AppState {
    pub people: Arc<PersonController>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(people: PersonController, environment: Environment) -> Self {
        Self {
            people: Arc::new(people),
            environment,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_index))
        .route("/Home", get(home_index))
        .route("/Home/Index", get(home_index))
        .route("/Home/Error", get(home_error))
        .route("/Person", get(person_index))
        .route("/Person/Index", get(person_index))
        .route("/Person/Details/{id}", get(person_details))
        .route("/Person/Create", get(person_create_form).post(person_create))
        .route("/Person/Edit/{id}", get(person_edit_form).post(person_edit))
        .route(
            "/Person/Delete/{id}",
            get(person_delete_form).post(person_delete),
        )
        .layer(middleware::from_fn_with_state(
            state.environment,
            error_pages,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default();
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

/// Turns an action result into a response on behalf of `controller`.
fn render(controller: &'static str, result: ActionResult) -> Response {
    match result {
        ActionResult::View(ViewResult { view_name, model }) => Json(json!({
            "view": format!("{controller}/{view_name}"),
            "model": model,
        }))
        .into_response(),
        ActionResult::RedirectToAction(redirect) => {
            let target = redirect.controller_name.unwrap_or(controller);
            Redirect::to(&format!("/{target}/{}", redirect.action_name)).into_response()
        }
        ActionResult::NotFound => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn home_index() -> Response {
    render(HomeController::NAME, HomeController.index())
}

async fn home_error(request: Request) -> Response {
    let request_id = request_id(&request);
    render(HomeController::NAME, HomeController.error(request_id))
}

async fn person_index(State(state): State<AppState>) -> Result<Response> {
    let result = state.people.index().await?;
    Ok(render(PersonController::NAME, result))
}

async fn person_details(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response> {
    let result = state.people.details(id).await?;
    Ok(render(PersonController::NAME, result))
}

async fn person_create_form(State(state): State<AppState>) -> Response {
    render(PersonController::NAME, state.people.create_form())
}

async fn person_create(
    State(state): State<AppState>,
    form: BoundForm<PersonViewModel>,
) -> Result<Response> {
    let result = state.people.create(form).await?;
    Ok(render(PersonController::NAME, result))
}

async fn person_edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response> {
    let result = state.people.edit_form(id).await?;
    Ok(render(PersonController::NAME, result))
}

async fn person_edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    form: BoundForm<PersonViewModel>,
) -> Result<Response> {
    let result = state.people.edit(id, form).await?;
    Ok(render(PersonController::NAME, result))
}

async fn person_delete_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let result = state.people.delete_form(id).await?;
    Ok(render(PersonController::NAME, result))
}

async fn person_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response> {
    let result = state.people.delete(id).await?;
    Ok(render(PersonController::NAME, result))
}

/// Replaces the bare 500 produced by a failed action with an error page.
///
/// Development shows the underlying message; production shows the generic
/// `Home/Error` view with only the request id.
async fn error_pages(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request_id(&request);
    let response = next.run(request).await;

    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };
    let status = response.status();

    if environment.is_development() {
        let body = json!({
            "error": {
                "status": status.as_u16(),
                "message": detail,
                "request_id": request_id,
            }
        });
        (status, Json(body)).into_response()
    } else {
        let page = render(HomeController::NAME, HomeController.error(request_id));
        (status, page).into_response()
    }
}

fn request_id<B>(request: &axum::http::Request<B>) -> Option<String> {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(str::to_string)
}

/// Time-ordered request ids so log lines sort with the requests they belong to.
#[derive(Clone, Copy, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{Call, StubPersonService};
    use axum::http::header;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(service: Arc<StubPersonService>, environment: Environment) -> Router {
        router(AppState::new(PersonController::new(service), environment))
    }

    fn stub_app() -> (Router, Arc<StubPersonService>) {
        let service = Arc::new(StubPersonService::default());
        (app(service.clone(), Environment::Production), service)
    }

    fn get_request(uri: &str) -> Request {
        axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_request(uri: &str, body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_renders_home_index() {
        let (app, _) = stub_app();
        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["view"], "Home/Index");
        assert!(body["model"].is_null());
    }

    #[tokio::test]
    async fn test_person_index_lists_people() {
        let (app, _) = stub_app();
        let response = app.oneshot(get_request("/Person/Index")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["view"], "Person/Index");
        assert_eq!(body["model"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_person_details_renders_model() {
        let (app, _) = stub_app();
        let response = app.oneshot(get_request("/Person/Details/1")).await.unwrap();

        let body = json_body(response).await;
        assert_eq!(body["view"], "Person/Details");
        assert_eq!(body["model"]["name"], "Machado de Assis");
        assert_eq!(body["model"]["postal_code"], 64019700);
    }

    #[tokio::test]
    async fn test_unknown_person_is_404() {
        let (app, _) = stub_app();
        let response = app.oneshot(get_request("/Person/Edit/9")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_redirects_to_index() {
        let (app, service) = stub_app();
        let response = app
            .oneshot(form_request(
                "/Person/Create",
                "name=Ian+Sommerville&postal_code=69316002",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/Person/Index");
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_create_redirects_without_insert() {
        let (app, service) = stub_app();
        let response = app
            .oneshot(form_request("/Person/Create", "name=&postal_code=69316002"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/Person/Index");
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unconvertible_postal_code_redirects_without_insert() {
        let (app, service) = stub_app();
        let response = app
            .oneshot(form_request(
                "/Person/Create",
                "name=Ian+Sommerville&postal_code=abc",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/Person/Index");
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_post_uses_route_id() {
        let (app, service) = stub_app();
        let response = app
            .oneshot(form_request(
                "/Person/Edit/2",
                "id=99&name=Machado+de+Assis&postal_code=64019700",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/Person/Index");
        match service.calls().as_slice() {
            [Call::Edit(person)] => {
                assert_eq!(person.id, 2);
                assert_eq!(person.name, "Machado de Assis");
                assert_eq!(person.postal_code, 64019700);
            }
            calls => panic!("unexpected calls: {calls:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_get_renders_confirmation() {
        let (app, service) = stub_app();
        let response = app.oneshot(get_request("/Person/Delete/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["view"], "Person/Delete");
        assert_eq!(body["model"]["name"], "Machado de Assis");
        assert_eq!(body["model"]["postal_code"], 64019700);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_post_removes_and_redirects() {
        let (app, service) = stub_app();
        let response = app
            .oneshot(form_request("/Person/Delete/2", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(service.calls(), [Call::Remove(2)]);
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let (app, _) = stub_app();
        let response = app.oneshot(get_request("/Person")).await.unwrap();
        let id = response.headers().get("x-request-id").unwrap();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_failure_in_development_shows_detail() {
        let app = app(
            Arc::new(StubPersonService::failing()),
            Environment::Development,
        );
        let response = app.oneshot(get_request("/Person/Index")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("Database error"));
        assert!(body["error"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_failure_in_production_shows_generic_page() {
        let app = app(
            Arc::new(StubPersonService::failing()),
            Environment::Production,
        );
        let response = app.oneshot(get_request("/Person/Index")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert_eq!(body["view"], "Home/Error");
        assert!(body["model"]["request_id"].is_string());
        assert!(body.get("error").is_none());
    }
}
