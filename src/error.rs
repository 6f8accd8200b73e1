use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WheelError {
    #[error("Recipe already in wheel: {0}")]
    DuplicateItem(String),

    #[error("Custom recipe already exists: {0}")]
    DuplicateCustomRecipe(String),

    #[error("Wheel can only have a maximum of {} recipes", crate::wheel::MAX_ITEMS)]
    WheelFull,

    #[error("Wheel has no recipes to spin")]
    EmptyWheel,

    #[error("Wheel is already spinning")]
    AlreadySpinning,

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Corrupt storage document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WheelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        WheelError::Validation(msg.into())
    }
}

impl IntoResponse for WheelError {
    fn into_response(self) -> Response {
        let status = match self {
            WheelError::DuplicateItem(_)
            | WheelError::DuplicateCustomRecipe(_)
            | WheelError::WheelFull
            | WheelError::EmptyWheel
            | WheelError::Validation(_) => StatusCode::BAD_REQUEST,
            WheelError::AlreadySpinning => StatusCode::CONFLICT,
            WheelError::Storage(_) | WheelError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (WheelError::DuplicateItem("Pizza".into()), StatusCode::BAD_REQUEST),
            (WheelError::WheelFull, StatusCode::BAD_REQUEST),
            (WheelError::EmptyWheel, StatusCode::BAD_REQUEST),
            (WheelError::validation("User ID required"), StatusCode::BAD_REQUEST),
            (WheelError::AlreadySpinning, StatusCode::CONFLICT),
            (
                WheelError::Storage(std::io::Error::other("disk gone")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn full_message_names_capacity() {
        assert_eq!(
            WheelError::WheelFull.to_string(),
            "Wheel can only have a maximum of 12 recipes"
        );
    }
}
