//! Row-level authorization: a principal may read and contribute to a budget
//! it owns or that has been shared with it.
//!
//! Collections are scoped with [`scope_to_principal`] and silently omit
//! inaccessible rows. Single-resource lookups go through the `require_*`
//! helpers, which distinguish a missing resource from a forbidden one.

use sea_orm::{
    Condition, DatabaseTransaction, QueryFilter, Select, TransactionTrait, prelude::*,
    sea_query::Query,
};

use crate::{EngineError, ResultEngine, budget_shares, budgets, users};

use super::{Engine, with_tx};

/// Restricts `select` to rows whose `budget_col` references a budget owned by
/// or shared with `username`.
///
/// Works for the budgets table itself (`budgets::Column::Id`) and for any
/// child table holding a budget foreign key.
pub(crate) fn scope_to_principal<E, C>(select: Select<E>, budget_col: C, username: &str) -> Select<E>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    let owned = Query::select()
        .column(budgets::Column::Id)
        .from(budgets::Entity)
        .and_where(budgets::Column::Owner.eq(username))
        .to_owned();
    let shared = Query::select()
        .column(budget_shares::Column::BudgetId)
        .from(budget_shares::Entity)
        .and_where(budget_shares::Column::Username.eq(username))
        .to_owned();

    select.filter(
        Condition::any()
            .add(budget_col.in_subquery(owned))
            .add(budget_col.in_subquery(shared)),
    )
}

impl Engine {
    /// Whether `user_id` owns `budget_id` or has it shared.
    pub async fn can_access(&self, budget_id: i32, user_id: &str) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let budget = self.find_budget(&db_tx, budget_id).await?;
            self.has_budget_access(&db_tx, &budget, user_id).await
        })
    }

    pub(super) async fn find_budget(
        &self,
        db: &DatabaseTransaction,
        budget_id: i32,
    ) -> ResultEngine<budgets::Model> {
        budgets::Entity::find_by_id(budget_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))
    }

    pub(super) async fn is_shared_with(
        &self,
        db: &DatabaseTransaction,
        budget_id: i32,
        username: &str,
    ) -> ResultEngine<bool> {
        Ok(
            budget_shares::Entity::find_by_id((budget_id, username.to_string()))
                .one(db)
                .await?
                .is_some(),
        )
    }

    pub(super) async fn has_budget_access(
        &self,
        db: &DatabaseTransaction,
        budget: &budgets::Model,
        user_id: &str,
    ) -> ResultEngine<bool> {
        if budget.owner == user_id {
            return Ok(true);
        }
        self.is_shared_with(db, budget.id, user_id).await
    }

    /// Loads a budget the principal may read or contribute to.
    pub(super) async fn require_budget_access(
        &self,
        db: &DatabaseTransaction,
        budget_id: i32,
        user_id: &str,
    ) -> ResultEngine<budgets::Model> {
        let budget = self.find_budget(db, budget_id).await?;
        if !self.has_budget_access(db, &budget, user_id).await? {
            tracing::warn!(budget_id, user = user_id, "budget access denied");
            return Err(EngineError::Forbidden(
                "budget is not owned by or shared with you".to_string(),
            ));
        }
        Ok(budget)
    }

    /// Loads a budget for an owner-only action (rename, delete, share).
    pub(super) async fn require_budget_owner(
        &self,
        db: &DatabaseTransaction,
        budget_id: i32,
        user_id: &str,
    ) -> ResultEngine<budgets::Model> {
        let budget = self.find_budget(db, budget_id).await?;
        if budget.owner != user_id {
            tracing::warn!(budget_id, user = user_id, "owner-only budget action denied");
            return Err(EngineError::Forbidden(
                "only the budget owner can do this".to_string(),
            ));
        }
        Ok(budget)
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }
}
