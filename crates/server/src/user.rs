//! Account registration, the only endpoint open to anonymous clients.

use api_types::user::{UserRegister, UserView};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::RegisterCmd;

use crate::{ServerError, server::ServerState};

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<UserRegister>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let Json(payload) = payload?;
    let cmd = RegisterCmd {
        username: payload.username,
        email: payload.email,
        password: payload.password,
    };
    let user = state.engine.register(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserView {
            username: user.username,
            email: user.email,
        }),
    ))
}
