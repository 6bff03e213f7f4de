use sea_orm::{ActiveValue, TransactionTrait, prelude::*, sea_query::OnConflict};

use crate::{ResultEngine, budget_shares};

use super::{Engine, with_tx};

impl Engine {
    /// Grants `member` access to a budget owned by `user_id`.
    ///
    /// Sharing twice with the same user, or with the owner, leaves the
    /// budget unchanged.
    pub async fn share_budget(
        &self,
        budget_id: i32,
        member: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let budget = self.find_budget(&db_tx, budget_id).await?;
            let member = self.require_user_exists(&db_tx, member).await?;
            let budget = self
                .require_budget_owner(&db_tx, budget.id, user_id)
                .await?;

            if member.username == budget.owner {
                return Ok(());
            }

            budget_shares::Entity::insert(budget_shares::ActiveModel {
                budget_id: ActiveValue::Set(budget.id),
                username: ActiveValue::Set(member.username.clone()),
            })
            .on_conflict(
                OnConflict::columns([
                    budget_shares::Column::BudgetId,
                    budget_shares::Column::Username,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&db_tx)
            .await?;

            tracing::info!(budget_id = budget.id, member = %member.username, "budget shared");
            Ok(())
        })
    }
}
