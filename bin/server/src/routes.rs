//! HTTP handlers for the training API.

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use medtrain_conversation::ScenarioSummary;
use medtrain_training::{
    DialogHistory, DialogOverview, Exchange, SendMessage, StartTraining, StartedDialog,
    TrainingError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Query parameters for dialog history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    dialog_id: Option<String>,
}

/// Query parameters for a user's dialog listing.
#[derive(Debug, Deserialize)]
pub struct DialogsQuery {
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScenarioList {
    scenarios: Vec<ScenarioSummary>,
}

#[derive(Debug, Serialize)]
pub struct DialogList {
    dialogs: Vec<DialogOverview>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| {
            ApiError::from(TrainingError::InvalidArgument {
                reason: rejection.body_text(),
            })
        })
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_scenarios(State(state): State<AppState>) -> Result<Json<ScenarioList>, ApiError> {
    let scenarios = state.training.list_scenarios().await?;
    Ok(Json(ScenarioList { scenarios }))
}

pub async fn start_training(
    State(state): State<AppState>,
    payload: Result<Json<StartTraining>, JsonRejection>,
) -> Result<Json<StartedDialog>, ApiError> {
    let started = state.training.start_training(body(payload)?).await?;
    Ok(Json(started))
}

pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessage>, JsonRejection>,
) -> Result<Json<Exchange>, ApiError> {
    let exchange = state.training.send_message(body(payload)?).await?;
    Ok(Json(exchange))
}

pub async fn dialog_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<DialogHistory>, ApiError> {
    let history = state
        .training
        .dialog_history(query.dialog_id.as_deref())
        .await?;
    Ok(Json(history))
}

pub async fn list_dialogs(
    State(state): State<AppState>,
    Query(query): Query<DialogsQuery>,
) -> Result<Json<DialogList>, ApiError> {
    let dialogs = state.training.list_dialogs(query.user_id.as_deref()).await?;
    Ok(Json(DialogList { dialogs }))
}
