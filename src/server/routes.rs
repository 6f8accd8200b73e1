use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::WheelError;
use crate::render::svg::{self, ButtonState};
use crate::selection::SpinOutcome;
use crate::store::{CustomRecipe, PopularRecipe};
use crate::wheel::{SourceType, WheelItem};

use super::state::AppState;

type Shared = State<Arc<AppState>>;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoveQuery {
    pub user_id: Option<String>,
    pub recipe_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCustom {
    pub user_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddItem {
    pub user_id: Option<String>,
    pub recipe_name: Option<String>,
    pub source_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResponse {
    #[serde(flatten)]
    pub outcome: SpinOutcome,
    pub duration_ms: u64,
}

/// Trimmed, non-empty field or a validation error naming it.
fn required(value: Option<String>, what: &str) -> Result<String, WheelError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(WheelError::validation(format!("{what} required"))),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn user_handler(State(state): Shared) -> Result<impl IntoResponse, WheelError> {
    let user_id = state.store().resolve_user()?;
    Ok(Json(json!({ "userId": user_id })))
}

pub async fn popular_handler(State(state): Shared) -> Json<Vec<PopularRecipe>> {
    Json(state.store().popular_recipes())
}

pub async fn custom_list_handler(
    State(state): Shared,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<CustomRecipe>>, WheelError> {
    let user_id = required(query.user_id, "User ID")?;
    Ok(Json(state.fresh_store()?.custom_recipes(&user_id)))
}

pub async fn custom_create_handler(
    State(state): Shared,
    Json(payload): Json<CreateCustom>,
) -> Result<impl IntoResponse, WheelError> {
    let user_id = required(payload.user_id, "User ID")?;
    let name = required(payload.name, "Recipe name")?;
    state.store().create_custom_recipe(&user_id, &name)?;
    Ok(Json(json!({ "success": true })))
}

pub async fn wheel_list_handler(
    State(state): Shared,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<WheelItem>>, WheelError> {
    let user_id = required(query.user_id, "User ID")?;
    Ok(Json(state.fresh_store()?.wheel_items(&user_id)))
}

pub async fn wheel_add_handler(
    State(state): Shared,
    Json(payload): Json<AddItem>,
) -> Result<impl IntoResponse, WheelError> {
    let user_id = required(payload.user_id, "User ID")?;
    let name = required(payload.recipe_name, "Recipe name")?;
    let source_type: SourceType = required(payload.source_type, "Source type")?.parse()?;
    let item = state.store().add_wheel_item(&user_id, &name, source_type)?;
    Ok(Json(json!({ "success": true, "item": item })))
}

pub async fn wheel_remove_handler(
    State(state): Shared,
    Query(query): Query<RemoveQuery>,
) -> Result<impl IntoResponse, WheelError> {
    let user_id = required(query.user_id, "User ID")?;
    let name = required(query.recipe_name, "Recipe name")?;
    state.store().remove_wheel_item(&user_id, &name)?;
    Ok(Json(json!({ "success": true })))
}

pub async fn spin_handler(
    State(state): Shared,
    Json(payload): Json<UserQuery>,
) -> Result<Json<SpinResponse>, WheelError> {
    let user_id = required(payload.user_id, "User ID")?;
    let outcome = state.spin(&user_id, Instant::now())?;
    info!(target: "server", user_id, recipe = %outcome.chosen.recipe_name, "Spin requested");
    Ok(Json(SpinResponse {
        outcome,
        duration_ms: state.config.wheel.spin_duration_ms,
    }))
}

pub async fn svg_handler(
    State(state): Shared,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, WheelError> {
    let user_id = required(query.user_id, "User ID")?;
    let items = state.fresh_store()?.wheel_items(&user_id);
    let (rotation, spinning) = state.pose(&user_id, Instant::now());
    let button = if spinning {
        ButtonState::Spinning
    } else {
        ButtonState::Ready
    };
    let body = svg::render(&items, state.config.wheel.size, rotation, button);
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required(Some("  Pizza ".into()), "Recipe name").unwrap(), "Pizza");
        let err = required(Some("   ".into()), "Recipe name").unwrap_err();
        assert_eq!(err.to_string(), "Recipe name required");
        assert!(required(None, "User ID").is_err());
    }

    #[test]
    fn spin_response_shape() {
        let wheel = crate::selection::tests::wheel_of(2);
        let outcome = SpinOutcome {
            chosen: wheel.list()[1].clone(),
            index: 1,
            target_rotation: 1890.0,
        };
        let value = serde_json::to_value(SpinResponse {
            outcome,
            duration_ms: 4000,
        })
        .unwrap();
        assert_eq!(value["index"], 1);
        assert_eq!(value["targetRotation"], 1890.0);
        assert_eq!(value["durationMs"], 4000);
        assert_eq!(value["chosen"]["recipe_name"], "Dish 1");
    }
}
