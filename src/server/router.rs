//! HTTP routes for the employee pages
//!
//! Every request mounts a fresh page on its own document, so controllers are
//! never shared between requests.

use crate::containers::bills::PROOF_WIDTH;
use crate::containers::{SubmitEvent, SubmitOutcome};
use crate::core::error::{BilledError, BilledResult, RequestError};
use crate::core::validation::{FormField, NewBillForm, SelectedFile};
use crate::core::validation::form::FILE_TEST_ID;
use crate::router::{App, Page, Route};
use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// State shared by the page handlers
#[derive(Clone)]
pub struct AppState {
    pub app: App,
}

/// Query of the proof preview fragment
#[derive(Debug, Deserialize)]
pub struct ProofQuery {
    pub url: Option<String>,
}

/// Build the page routes
///
/// - GET / - Redirect to the bills page
/// - GET /health, /healthz - Liveness
/// - GET /employee/bills - Bills page
/// - GET /employee/bill/new - Creation form
/// - POST /employee/bill/new - Submit the creation form (multipart)
/// - GET /employee/bills/justificatif?url= - Proof preview fragment
pub fn build_page_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route(Route::Bills.url(), get(bills_page))
        .route(
            Route::NewBill.url(),
            get(new_bill_page).post(submit_new_bill),
        )
        .route("/employee/bills/justificatif", get(proof_preview))
        .with_state(state)
}

async fn index() -> Redirect {
    Redirect::to(Route::Bills.url())
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "billed"
    }))
}

async fn bills_page(State(state): State<AppState>) -> Result<Html<String>, BilledError> {
    let page = state.app.fork().on_navigate(Route::Bills).await?;
    Ok(Html(page.document().html()))
}

async fn new_bill_page(State(state): State<AppState>) -> Result<Html<String>, BilledError> {
    let page = state.app.fork().on_navigate(Route::NewBill).await?;
    Ok(Html(page.document().html()))
}

async fn submit_new_bill(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, BilledError> {
    let app = state.app.fork();
    let mut form = read_form(multipart).await?;

    let Page::NewBill(mut controller) = app.on_navigate(Route::NewBill).await? else {
        return Err(BilledError::Internal("new bill page not mounted".to_string()));
    };

    let change = controller.handle_change_file(form.file_mut());
    tracing::debug!(?change, "attachment received");

    let mut event = SubmitEvent::new(form);
    match controller.handle_submit(&mut event).await? {
        SubmitOutcome::Created(bill) => {
            tracing::info!(bill_id = %bill.id, "bill submitted over HTTP");
            Ok(Redirect::to(Route::Bills.url()).into_response())
        }
        SubmitOutcome::Blocked { invalid_fields } => {
            let markup = app
                .renderer()
                .new_bill_form(&event.form, &invalid_fields)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(markup)).into_response())
        }
    }
}

async fn proof_preview(
    State(state): State<AppState>,
    Query(query): Query<ProofQuery>,
) -> Result<Html<String>, BilledError> {
    let url = query
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| RequestError::MissingParameter {
            name: "url".to_string(),
        })?;
    Ok(Html(state.app.renderer().modal(&url, PROOF_WIDTH)?))
}

/// Fill a form from multipart parts named after the controls' test ids
async fn read_form(mut multipart: Multipart) -> BilledResult<NewBillForm> {
    let mut form = NewBillForm::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == FILE_TEST_ID {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await?;
            if !file_name.is_empty() {
                form.file_mut()
                    .select(SelectedFile::new(file_name, content_type, bytes.to_vec()));
            }
            continue;
        }

        match FormField::from_test_id(&name) {
            Some(control) => {
                let value = field.text().await?;
                form.change(control, value);
            }
            None => tracing::debug!(part = %name, "ignoring unknown form part"),
        }
    }

    Ok(form)
}
