use axum::{
    extract::{Form, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;

use crate::analyzer::{self, Registration};
use crate::app::AppState;
use crate::db;
use crate::error::AppError;
use crate::flash::{Flash, PendingFlash};

#[derive(Debug, Deserialize)]
pub struct UrlForm {
    #[serde(default)]
    url: String,
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    PendingFlash(flash): PendingFlash,
) -> Response {
    let mut context = Context::new();
    context.insert("value", "");
    context.insert("invalid", &false);
    render(&state, StatusCode::OK, "index.html", context, flash)
}

pub async fn create_url(
    State(state): State<Arc<AppState>>,
    Form(form): Form<UrlForm>,
) -> Response {
    match analyzer::register_url(&state, &form.url).await {
        Ok(registration) => {
            let flash = match registration {
                Registration::Created(_) => Flash::success("Page successfully added"),
                Registration::Existing(_) => Flash::info("Page already exists"),
            };
            redirect_with_flash(&format!("/urls/{}", registration.url().id), flash)
        }
        Err(AppError::InvalidUrl(reason)) => {
            tracing::warn!(input = %form.url, %reason, "rejected url");
            let mut context = Context::new();
            context.insert("value", &form.url);
            context.insert("invalid", &true);
            render(
                &state,
                StatusCode::UNPROCESSABLE_ENTITY,
                "index.html",
                context,
                Some(Flash::danger("Invalid URL")),
            )
        }
        Err(e) => error_page(&state, e),
    }
}

pub async fn list_urls(
    State(state): State<Arc<AppState>>,
    PendingFlash(flash): PendingFlash,
) -> Response {
    match db::list_url_summaries(&state.db).await {
        Ok(summaries) => {
            let mut context = Context::new();
            context.insert("summaries", &summaries);
            render(&state, StatusCode::OK, "urls.html", context, flash)
        }
        Err(e) => error_page(&state, e.into()),
    }
}

pub async fn show_url(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    PendingFlash(flash): PendingFlash,
) -> Response {
    let url = match super::find_url(&state, &id).await {
        Ok(url) => url,
        Err(e) => return error_page(&state, e),
    };

    match db::find_checks_by_url(&state.db, url.id).await {
        Ok(checks) => {
            let mut context = Context::new();
            context.insert("url", &url);
            context.insert("checks", &checks);
            render(&state, StatusCode::OK, "url.html", context, flash)
        }
        Err(e) => error_page(&state, e.into()),
    }
}

pub async fn check_url(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let url = match super::find_url(&state, &id).await {
        Ok(url) => url,
        Err(e) => return error_page(&state, e),
    };

    let location = format!("/urls/{}", url.id);
    match analyzer::run_check(&state, &url).await {
        Ok(check) if check.is_failed() => {
            redirect_with_flash(&location, Flash::danger("Could not check the page"))
        }
        Ok(_) => redirect_with_flash(&location, Flash::success("Page successfully checked")),
        Err(e) => error_page(&state, e),
    }
}

pub async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    error_page(&state, AppError::NotFound("Page".to_string()))
}

fn render(
    state: &AppState,
    status: StatusCode,
    template: &str,
    mut context: Context,
    flash: Option<Flash>,
) -> Response {
    let consumed = flash.is_some();
    context.insert("flash", &flash);

    match state.views.render(template, &context) {
        Ok(body) => {
            let mut response = (status, Html(body)).into_response();
            if consumed {
                response.headers_mut().append(
                    header::SET_COOKIE,
                    HeaderValue::from_static(Flash::clear_cookie()),
                );
            }
            response
        }
        Err(e) => error_page(state, e),
    }
}

fn error_page(state: &AppState, err: AppError) -> Response {
    if err.is_internal() {
        tracing::error!("{}", err);
    }
    let status = err.status();
    let message = err.public_message();

    let mut context = Context::new();
    context.insert("status", &status.as_u16());
    context.insert("message", &message);
    context.insert("flash", &None::<Flash>);

    match state.views.render("error.html", &context) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, message).into_response()
        }
    }
}

/// 302 to `location`, leaving `flash` for the page rendered there.
fn redirect_with_flash(location: &str, flash: Flash) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, flash.set_cookie()),
        ],
    )
        .into_response()
}
