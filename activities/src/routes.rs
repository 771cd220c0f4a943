//! HTTP route handlers for the activity signup API

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    response::{Json, Redirect},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{directory::Activity, AppResult, AppState};

/// `?email=` query parameter shared by signup and unregister
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Confirmation body for successful roster changes
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET / - Redirect to the bundled front-end
pub async fn root() -> Redirect {
    Redirect::temporary("/static/index.html")
}

/// GET /activities - List all activities with their rosters
pub async fn list_activities(State(state): State<AppState>) -> Json<BTreeMap<String, Activity>> {
    debug!("Handling GET /activities");
    Json(state.directory.list().await)
}

/// POST /activities/:activity_name/signup?email=... - Sign up for an activity
pub async fn signup(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> AppResult<Json<MessageResponse>> {
    debug!("Handling POST /activities/{}/signup", activity_name);

    match state.directory.sign_up(&activity_name, &query.email).await {
        Ok(message) => Ok(Json(MessageResponse { message })),
        Err(e) => {
            warn!(
                "Rejected signup of {} for {}: {}",
                query.email, activity_name, e
            );
            Err(e.into())
        }
    }
}

/// DELETE /activities/:activity_name/participants?email=... - Unregister from an activity
pub async fn unregister(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> AppResult<Json<MessageResponse>> {
    debug!("Handling DELETE /activities/{}/participants", activity_name);

    match state.directory.unregister(&activity_name, &query.email).await {
        Ok(message) => Ok(Json(MessageResponse { message })),
        Err(e) => {
            warn!(
                "Rejected removal of {} from {}: {}",
                query.email, activity_name, e
            );
            Err(e.into())
        }
    }
}
