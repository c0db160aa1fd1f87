use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),

    #[error("user not found")]
    NotFound,

    #[error("store error: {0}")]
    Store(String),
}

impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        AccountError::Store(err.to_string())
    }
}

impl AccountError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AccountError::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AccountError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountError::NotFound => StatusCode::NOT_FOUND,
            AccountError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AccountError> for (StatusCode, String) {
    fn from(err: AccountError) -> Self {
        (err.status(), err.to_string())
    }
}
