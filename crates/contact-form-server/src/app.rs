// File: src/app.rs
// Purpose: Shared form session, router and request handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use contact_form::render::{self, page};
use contact_form::{
    CountryLookup, Field, FormController, FormSnapshot, SubmitError, SubmitHandler,
    SuggestionProvider, ValidationSchema,
};
use maud::{html, Markup};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

const PAGE_TITLE: &str = "Contact";

/// Application state shared across handlers
///
/// The process serves a single form session.
#[derive(Clone)]
pub struct AppState {
    form: Arc<RwLock<FormController>>,
    suggestions: Arc<SuggestionProvider>,
    submit: Arc<dyn SubmitHandler>,
}

impl AppState {
    pub fn new(
        schema: ValidationSchema,
        lookup: Arc<dyn CountryLookup>,
        max_suggestions: usize,
        submit: Arc<dyn SubmitHandler>,
    ) -> Self {
        Self {
            form: Arc::new(RwLock::new(FormController::new(schema))),
            suggestions: Arc::new(SuggestionProvider::new(lookup, max_suggestions)),
            submit,
        }
    }

    /// Current form partial
    ///
    /// Locks are always taken form first, then suggestions, so the display
    /// value is read under the same form lock that a submit resets it under.
    async fn render_form(&self) -> Markup {
        let form = self.form.read().await;
        let display_value = self.suggestions.display_value().await;
        let suggestions = self.suggestions.suggestions().await;
        render::contact_form(&form, &display_value, &suggestions)
    }

    /// Feedback region of one field, for HTMX field events
    async fn render_feedback(&self, field: Field) -> Response {
        let state = self.form.read().await.field_state(field);
        let invalid = if state.is_invalid() { "true" } else { "false" };
        (
            [(render::FIELD_INVALID_HEADER, invalid)],
            Html(render::field_feedback(field, &state).into_string()),
        )
            .into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/form", get(form_handler))
        .route("/fields/:field", post(change_handler))
        .route("/fields/:field/blur", post(blur_handler))
        .route("/submit", post(submit_handler))
        .route("/countries", get(countries_handler))
        .route("/countries/select", post(select_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}

/// htmx only swaps 2xx responses, so its requests get rejections as 200
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "true")
        .unwrap_or(false)
}

fn parse_field(name: &str) -> Result<Field, Response> {
    name.parse::<Field>()
        .map_err(|e| error_response(StatusCode::NOT_FOUND, "Unknown Field", &e.to_string()))
}

async fn index_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if accepts_json(&headers) {
        let form = state.form.read().await;
        return Json(FormSnapshot::from(&*form)).into_response();
    }

    let body = html! {
        h1 { (PAGE_TITLE) }
        (state.render_form().await)
    };
    Html(page(PAGE_TITLE, body).into_string()).into_response()
}

async fn form_handler(State(state): State<AppState>) -> Response {
    Html(state.render_form().await.into_string()).into_response()
}

async fn change_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(field): Path<String>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let field = match parse_field(&field) {
        Ok(field) => field,
        Err(response) => return response,
    };
    let value = params.get(field.as_str()).cloned().unwrap_or_default();

    state.form.write().await.handle_change(field, value);
    field_response(state, &headers, field).await
}

async fn blur_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(field): Path<String>,
) -> Response {
    let field = match parse_field(&field) {
        Ok(field) => field,
        Err(response) => return response,
    };

    state.form.write().await.handle_blur(field);
    field_response(state, &headers, field).await
}

/// HTMX field events get only the feedback region; the input keeps its text
async fn field_response(state: AppState, headers: &HeaderMap, field: Field) -> Response {
    if is_htmx(headers) {
        state.render_feedback(field).await
    } else {
        form_handler(State(state)).await
    }
}

async fn submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let begun = {
        let mut form = state.form.write().await;
        // A plain form post carries every typed value; country only changes on selection
        for field in [Field::Name, Field::Email] {
            if let Some(value) = params.get(field.as_str()) {
                if value != form.values().get(field) {
                    form.handle_change(field, value.as_str());
                }
            }
        }
        form.begin_submit()
    };

    let status = match begun {
        Ok(values) => {
            info!("Submit accepted");
            let background = state.clone();
            tokio::spawn(async move {
                let outcome = background.submit.submit(values).await;
                // The country text is cleared under the same lock as the form
                let mut form = background.form.write().await;
                if outcome.is_ok() {
                    background.suggestions.reset().await;
                }
                // Failure is logged by the controller
                let _ = form.finish_submit(outcome);
            });
            StatusCode::ACCEPTED
        }
        Err(SubmitError::Invalid(errors)) => {
            debug!(invalid = errors.len(), "Submit rejected");
            StatusCode::UNPROCESSABLE_ENTITY
        }
        Err(SubmitError::InProgress) => StatusCode::CONFLICT,
        Err(e @ SubmitError::Handler(_)) => {
            warn!(error = %e, "Unexpected submit state");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let status = if status.is_client_error() && is_htmx(&headers) {
        StatusCode::OK
    } else {
        status
    };

    (status, Html(state.render_form().await.into_string())).into_response()
}

async fn countries_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = params.get(Field::Country.as_str()).map(String::as_str).unwrap_or("");
    let outcome = state.suggestions.update(query).await;
    debug!(?outcome, "Suggestions updated");

    let suggestions = state.suggestions.suggestions().await;
    Html(render::suggestion_list(&suggestions).into_string()).into_response()
}

async fn select_handler(
    State(state): State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let Some(name) = params.get("name").filter(|n| !n.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Bad Request", "missing country name");
    };

    {
        let mut form = state.form.write().await;
        state.suggestions.select(name, &mut form).await;
    }
    form_handler(State(state)).await
}

fn error_response(status: StatusCode, title: &str, message: &str) -> Response {
    let markup = page(
        title,
        html! {
            h1 { (status.as_u16()) " " (title) }
            p { (message) }
            a href="/" { "Go Home" }
        },
    );
    (status, Html(markup.into_string())).into_response()
}
