use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(thiserror::Error, Debug)]
pub enum ProxyError {
    #[error("Tipo de API inválido")]
    InvalidApi,

    #[error("ID não fornecido")]
    MissingId,

    #[error("Rota não encontrada")]
    RouteNotFound,

    #[error("Erro interno do servidor")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ProxyError::InvalidApi | ProxyError::MissingId => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            ProxyError::RouteNotFound => {
                (StatusCode::NOT_FOUND, json!({ "error": self.to_string() }))
            }
            ProxyError::Internal(err) => {
                error!("Function error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string(), "details": format!("{err:#}") }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;
