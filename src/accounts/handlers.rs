use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::dto::{AccountRequest, AccountResponse};
use super::errors::AccountError;
use crate::state::AppState;

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, (StatusCode, String)> {
    let redact = state.config.redact_credentials;
    let accounts = state.accounts.list().await.map_err(reject)?;
    Ok(Json(
        accounts
            .into_iter()
            .map(|a| AccountResponse::from_account(a, redact))
            .collect(),
    ))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, (StatusCode, String)> {
    let id = parse_id(&id).map_err(reject)?;
    let account = state.accounts.get(id).await.map_err(reject)?;
    Ok(Json(AccountResponse::from_account(
        account,
        state.config.redact_credentials,
    )))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, (StatusCode, String)> {
    let Json(body) = payload.map_err(bad_body)?;
    let account = state.accounts.create(body.into()).await.map_err(reject)?;
    Ok(Json(AccountResponse::from_account(
        account,
        state.config.redact_credentials,
    )))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, (StatusCode, String)> {
    let id = parse_id(&id).map_err(reject)?;
    let Json(body) = payload.map_err(bad_body)?;
    let account = state.accounts.update(id, body.into()).await.map_err(reject)?;
    Ok(Json(AccountResponse::from_account(
        account,
        state.config.redact_credentials,
    )))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let id = parse_id(&id).map_err(reject)?;
    state.accounts.delete(id).await.map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<i64, AccountError> {
    raw.parse::<i64>()
        .map_err(|_| AccountError::validation("invalid id"))
}

fn bad_body(rejection: JsonRejection) -> (StatusCode, String) {
    warn!(error = %rejection, "invalid request body");
    (StatusCode::BAD_REQUEST, "invalid request body".into())
}

fn reject(err: AccountError) -> (StatusCode, String) {
    match &err {
        AccountError::Store(msg) => error!(error = %msg, "store failure"),
        other => warn!(error = %other, "request rejected"),
    }
    err.into()
}
