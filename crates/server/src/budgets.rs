//! Budget endpoints

use api_types::{
    ListResponse,
    budget::{BudgetNew, BudgetShare, BudgetUpdate, BudgetView},
    item::{AmountInput, ItemFields},
};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{Budget, BudgetNewCmd, ItemDraft, User};

use crate::{ServerError, items::item_view, required, server::ServerState};

fn budget_view(budget: Budget, public_url: &str) -> BudgetView {
    BudgetView {
        revenue: budget.revenue().to_string(),
        id: budget.id,
        name: budget.name,
        owner: budget.owner,
        shared_with: budget.shared_with,
        incomes: budget
            .incomes
            .into_iter()
            .map(|item| item_view(item, public_url))
            .collect(),
        expenses: budget
            .expenses
            .into_iter()
            .map(|item| item_view(item, public_url))
            .collect(),
    }
}

fn item_draft(fields: ItemFields) -> ItemDraft {
    ItemDraft {
        amount: fields.amount.map(AmountInput::into_text),
        category: fields.category,
    }
}

/// Handle requests for listing the budgets visible to the user
pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<ListResponse<BudgetView>>, ServerError> {
    let budgets = state
        .engine
        .list_budgets(&user.username)
        .await?
        .into_iter()
        .map(|budget| budget_view(budget, &state.public_url))
        .collect::<Vec<_>>();

    Ok(Json(budgets.into()))
}

/// Handle requests for creating a budget with nested incomes and expenses
pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    payload: Result<Json<BudgetNew>, JsonRejection>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let Json(payload) = payload?;
    let cmd = BudgetNewCmd {
        name: payload.name,
        incomes: payload.incomes.into_iter().map(item_draft).collect(),
        expenses: payload.expenses.into_iter().map(item_draft).collect(),
        user_id: user.username,
    };

    let budget = state.engine.create_budget(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(budget_view(budget, &state.public_url)),
    ))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.budget(id, &user.username).await?;
    Ok(Json(budget_view(budget, &state.public_url)))
}

pub async fn rename(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<BudgetUpdate>, JsonRejection>,
) -> Result<Json<BudgetView>, ServerError> {
    let Json(payload) = payload?;
    let name = required(payload.name, "name")?;
    let budget = state
        .engine
        .rename_budget(id, &name, &user.username)
        .await?;
    Ok(Json(budget_view(budget, &state.public_url)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Owner-only: add a user to the budget's shared-with set
pub async fn share(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<BudgetShare>, JsonRejection>,
) -> Result<StatusCode, ServerError> {
    let Json(payload) = payload?;
    let member = required(payload.user, "user")?;
    state
        .engine
        .share_budget(id, &member, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
