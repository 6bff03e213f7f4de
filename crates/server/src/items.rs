//! Income and expense endpoints.
//!
//! Both collections behave the same; the handlers are generic over a
//! [`Collection`] marker that fixes the [`ItemKind`].

use api_types::{
    ListResponse,
    item::{AmountInput, ItemListQuery, ItemNew, ItemUpdate, ItemView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{Item, ItemDraft, ItemFilter, ItemKind, ItemNewCmd, ItemPatch, User};

use crate::{ServerError, required, server::ServerState};

pub trait Collection {
    const KIND: ItemKind;
}

pub struct Incomes;

pub struct Expenses;

impl Collection for Incomes {
    const KIND: ItemKind = ItemKind::Income;
}

impl Collection for Expenses {
    const KIND: ItemKind = ItemKind::Expense;
}

pub(crate) fn item_view(item: Item, public_url: &str) -> ItemView {
    ItemView {
        url: format!("{public_url}/{}/{}", item.kind.plural(), item.id),
        id: item.id,
        amount: item.amount.to_string(),
        category: item.category.label().to_string(),
        budget: item.budget,
    }
}

pub async fn list<C: Collection>(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<ListResponse<ItemView>>, ServerError> {
    let filter = ItemFilter {
        budget_id: query.budget,
        category: query.category,
    };
    let items = state
        .engine
        .list_items(C::KIND, &filter, &user.username)
        .await?
        .into_iter()
        .map(|item| item_view(item, &state.public_url))
        .collect::<Vec<_>>();

    Ok(Json(items.into()))
}

pub async fn create<C: Collection>(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    payload: Result<Json<ItemNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemView>), ServerError> {
    let Json(payload) = payload?;
    let budget_id = required(payload.budget, "budget")?;
    let draft = ItemDraft {
        amount: payload.amount.map(AmountInput::into_text),
        category: payload.category,
    };
    let item = state
        .engine
        .create_item(ItemNewCmd::new(C::KIND, budget_id, draft, user.username))
        .await?;

    Ok((StatusCode::CREATED, Json(item_view(item, &state.public_url))))
}

pub async fn get<C: Collection>(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemView>, ServerError> {
    let item = state.engine.item(C::KIND, id, &user.username).await?;
    Ok(Json(item_view(item, &state.public_url)))
}

pub async fn update<C: Collection>(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<ItemUpdate>, JsonRejection>,
) -> Result<Json<ItemView>, ServerError> {
    let Json(payload) = payload?;
    let patch = ItemPatch {
        amount: payload.amount.map(AmountInput::into_text),
        category: payload.category,
    };
    let item = state
        .engine
        .update_item(C::KIND, id, patch, &user.username)
        .await?;
    Ok(Json(item_view(item, &state.public_url)))
}

pub async fn delete<C: Collection>(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_item(C::KIND, id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
