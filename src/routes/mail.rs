use axum::{extract::State, response::Html, routing::get, Router};

use crate::{
    error::AppError,
    state::AppState,
    validation::{schemas::MessageParams, ValidPath},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/mail/:messageId", get(preview))
}

/// Body of a message kept by the development preview mailbox.
async fn preview(
    State(state): State<AppState>,
    ValidPath(message_id): ValidPath<MessageParams>,
) -> Result<Html<String>, AppError> {
    let mail = state
        .notifier
        .transport()
        .preview(message_id)
        .await
        .ok_or_else(|| AppError::not_found("Message not found"))?;
    Ok(Html(mail.html))
}
