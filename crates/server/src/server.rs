use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{
    ServerError, budgets,
    items::{self, Expenses, Incomes},
    user,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Prefix of the `url` field in item representations, without a
    /// trailing slash.
    pub public_url: Arc<str>,
}

impl ServerState {
    pub fn new(engine: Engine, public_url: &str) -> Self {
        Self {
            engine: Arc::new(engine),
            public_url: Arc::from(public_url.trim_end_matches('/')),
        }
    }
}

/// HTTP Basic authentication against the stored password hashes. The
/// authenticated [`engine::User`] is handed to handlers as an extension.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(credentials)) = auth_header else {
        return Err(ServerError::Unauthorized);
    };
    if credentials.username().is_empty() || credentials.password().is_empty() {
        return Err(ServerError::Unauthorized);
    }

    let user = state
        .engine
        .authenticate(credentials.username(), credentials.password())
        .await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let authenticated = Router::new()
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            get(budgets::get)
                .patch(budgets::rename)
                .delete(budgets::delete),
        )
        .route("/budgets/{id}/share", post(budgets::share))
        .route(
            "/incomes",
            get(items::list::<Incomes>).post(items::create::<Incomes>),
        )
        .route(
            "/incomes/{id}",
            get(items::get::<Incomes>)
                .patch(items::update::<Incomes>)
                .delete(items::delete::<Incomes>),
        )
        .route(
            "/expenses",
            get(items::list::<Expenses>).post(items::create::<Expenses>),
        )
        .route(
            "/expenses/{id}",
            get(items::get::<Expenses>)
                .patch(items::update::<Expenses>)
                .delete(items::delete::<Expenses>),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/register", post(user::register))
        .merge(authenticated)
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    public_url: &str,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, public_url);

    axum::serve(listener, router(state)).await
}
