use std::collections::HashMap;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    Budget, BudgetNewCmd, EngineError, Item, ItemKind, ResultEngine, budget_shares, budgets,
    item::ItemRow, repo, validation,
};

use super::{Engine, scope_to_principal, with_tx};

impl Engine {
    /// Creates a budget owned by `cmd.user_id` together with its incomes and
    /// expenses. Either everything is stored or nothing is.
    pub async fn create_budget(&self, cmd: BudgetNewCmd) -> ResultEngine<Budget> {
        let valid = validation::budget(&cmd)?;
        let user_id = cmd.user_id;

        let budget = with_tx!(self, |db_tx| {
            let model = budgets::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(valid.name.clone()),
                owner: ActiveValue::Set(user_id.clone()),
            }
            .insert(&db_tx)
            .await?;

            let mut incomes = Vec::with_capacity(valid.incomes.len());
            for income in &valid.incomes {
                incomes.push(
                    repo::incomes::insert(&db_tx, model.id, income.amount, income.category)
                        .await?,
                );
            }
            let mut expenses = Vec::with_capacity(valid.expenses.len());
            for expense in &valid.expenses {
                expenses.push(
                    repo::expenses::insert(&db_tx, model.id, expense.amount, expense.category)
                        .await?,
                );
            }

            let label = model.label();
            Ok(Budget {
                incomes: rows_into_items(incomes, ItemKind::Income, &label)?,
                expenses: rows_into_items(expenses, ItemKind::Expense, &label)?,
                id: model.id,
                name: model.name,
                owner: model.owner,
                shared_with: Vec::new(),
            })
        })?;

        tracing::info!(
            budget_id = budget.id,
            owner = %budget.owner,
            incomes = budget.incomes.len(),
            expenses = budget.expenses.len(),
            "budget created"
        );
        Ok(budget)
    }

    /// Return a budget the principal owns or that is shared with it.
    pub async fn budget(&self, budget_id: i32, user_id: &str) -> ResultEngine<Budget> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_budget_access(&db_tx, budget_id, user_id)
                .await?;
            let mut budgets = self.assemble_budgets(&db_tx, vec![model]).await?;
            budgets
                .pop()
                .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))
        })
    }

    /// Budgets the principal owns or that are shared with it, by ascending id.
    pub async fn list_budgets(&self, user_id: &str) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |db_tx| {
            let models = scope_to_principal(budgets::Entity::find(), budgets::Column::Id, user_id)
                .order_by_asc(budgets::Column::Id)
                .all(&db_tx)
                .await?;
            self.assemble_budgets(&db_tx, models).await
        })
    }

    /// Renames a budget (owner-only).
    pub async fn rename_budget(
        &self,
        budget_id: i32,
        name: &str,
        user_id: &str,
    ) -> ResultEngine<Budget> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_budget_owner(&db_tx, budget_id, user_id)
                .await?;
            let name = validation::budget_name(name)?;

            let mut active: budgets::ActiveModel = model.into();
            active.name = ActiveValue::Set(name);
            let model = active.update(&db_tx).await?;

            let mut budgets = self.assemble_budgets(&db_tx, vec![model]).await?;
            budgets
                .pop()
                .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))
        })
    }

    /// Deletes a budget with its items and shares (owner-only).
    pub async fn delete_budget(&self, budget_id: i32, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_budget_owner(&db_tx, budget_id, user_id)
                .await?;

            // Explicit cascade so the outcome does not depend on the
            // connection having foreign keys enabled.
            repo::incomes::delete_for_budget(&db_tx, model.id).await?;
            repo::expenses::delete_for_budget(&db_tx, model.id).await?;
            budget_shares::Entity::delete_many()
                .filter(budget_shares::Column::BudgetId.eq(model.id))
                .exec(&db_tx)
                .await?;
            budgets::Entity::delete_by_id(model.id).exec(&db_tx).await?;

            tracing::info!(budget_id = model.id, "budget deleted");
            Ok(())
        })
    }

    /// Labels of the given budgets keyed by id.
    pub(super) async fn budget_labels(
        &self,
        db: &DatabaseTransaction,
        budget_ids: impl IntoIterator<Item = i32>,
    ) -> ResultEngine<HashMap<i32, String>> {
        let ids: Vec<i32> = budget_ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let models = budgets::Entity::find()
            .filter(budgets::Column::Id.is_in(ids))
            .all(db)
            .await?;
        Ok(models.into_iter().map(|m| (m.id, m.label())).collect())
    }

    /// Loads children and shares for each budget, keeping the input order.
    async fn assemble_budgets(
        &self,
        db: &DatabaseTransaction,
        models: Vec<budgets::Model>,
    ) -> ResultEngine<Vec<Budget>> {
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

        let mut incomes = group_by_budget(repo::incomes::for_budgets(db, &ids).await?);
        let mut expenses = group_by_budget(repo::expenses::for_budgets(db, &ids).await?);

        let mut shares: HashMap<i32, Vec<String>> = HashMap::new();
        if !ids.is_empty() {
            let rows = budget_shares::Entity::find()
                .filter(budget_shares::Column::BudgetId.is_in(ids.iter().copied()))
                .order_by_asc(budget_shares::Column::Username)
                .all(db)
                .await?;
            for row in rows {
                shares.entry(row.budget_id).or_default().push(row.username);
            }
        }

        models
            .into_iter()
            .map(|model| -> ResultEngine<Budget> {
                let label = model.label();
                Ok(Budget {
                    incomes: rows_into_items(
                        incomes.remove(&model.id).unwrap_or_default(),
                        ItemKind::Income,
                        &label,
                    )?,
                    expenses: rows_into_items(
                        expenses.remove(&model.id).unwrap_or_default(),
                        ItemKind::Expense,
                        &label,
                    )?,
                    shared_with: shares.remove(&model.id).unwrap_or_default(),
                    id: model.id,
                    name: model.name,
                    owner: model.owner,
                })
            })
            .collect()
    }
}

fn group_by_budget(rows: Vec<ItemRow>) -> HashMap<i32, Vec<ItemRow>> {
    let mut grouped: HashMap<i32, Vec<ItemRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.budget_id).or_default().push(row);
    }
    grouped
}

fn rows_into_items(rows: Vec<ItemRow>, kind: ItemKind, label: &str) -> ResultEngine<Vec<Item>> {
    rows.into_iter()
        .map(|row| row.into_item(kind, label.to_string()))
        .collect()
}
