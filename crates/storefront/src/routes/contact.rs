//! Contact form and the shared inquiry submission flow.
//!
//! General inquiries are filed against the "General Inquiry" product, which
//! is fetched right before each submission.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use granite_world_client::ClientError;
use granite_world_core::{CustomerQueryInput, ProductId};

use crate::filters;
use crate::state::AppState;

pub const NOT_READY_MESSAGE: &str = "Contact form is not ready. Please try again later.";
pub const SUCCESS_MESSAGE: &str = "Thank you! We'll be in touch shortly.";
const FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Inquiry form fields, shared by the contact and product pages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InquiryForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl InquiryForm {
    fn to_input(&self, product_id: ProductId) -> CustomerQueryInput {
        CustomerQueryInput {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            message: self.message.clone(),
            product_id: Some(product_id),
        }
    }
}

/// Inline status line above a form.
#[derive(Debug, Clone)]
pub struct Notice {
    pub success: bool,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Submit `form` against `product_id`.
///
/// Returns the notice to show and the form to re-render: cleared on
/// success, kept populated on failure.
pub async fn submit_inquiry(
    state: &AppState,
    product_id: ProductId,
    form: InquiryForm,
) -> (Notice, InquiryForm) {
    match state.api().submit_query(&form.to_input(product_id)).await {
        Ok(query) => {
            tracing::info!(query_id = %query.id, product_id = %product_id, "Customer query submitted");
            (Notice::success(SUCCESS_MESSAGE), InquiryForm::default())
        }
        Err(ClientError::Validation(message)) => (Notice::error(message), form),
        Err(e) => {
            tracing::error!(error = %e, product_id = %product_id, "Customer query submission failed");
            (Notice::error(FAILURE_MESSAGE), form)
        }
    }
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub form: InquiryForm,
    pub notice: Option<Notice>,
    pub ready: bool,
}

/// Look up the sentinel product the contact form files against.
async fn general_product_id(state: &AppState) -> Option<ProductId> {
    match state.api().general_product().await {
        Ok(product) => Some(product.id),
        Err(e) => {
            tracing::warn!(error = %e, "General Inquiry product unavailable");
            None
        }
    }
}

/// Display the contact form.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let ready = general_product_id(&state).await.is_some();
    ContactTemplate {
        form: InquiryForm::default(),
        notice: (!ready).then(|| Notice::error(NOT_READY_MESSAGE)),
        ready,
    }
}

/// Submit the contact form.
#[instrument(skip_all)]
pub async fn submit(State(state): State<AppState>, Form(form): Form<InquiryForm>) -> impl IntoResponse {
    let Some(product_id) = general_product_id(&state).await else {
        return ContactTemplate {
            form,
            notice: Some(Notice::error(NOT_READY_MESSAGE)),
            ready: false,
        };
    };

    let (notice, form) = submit_inquiry(&state, product_id, form).await;
    ContactTemplate {
        form,
        notice: Some(notice),
        ready: true,
    }
}
