use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{
    EngineError, Item, ItemFilter, ItemKind, ItemNewCmd, ItemPatch, ResultEngine, item::ItemRow,
    repo::with_item_repo, validation,
};

use super::{Engine, with_tx};

impl Engine {
    /// Adds an income or expense to a budget the principal may access.
    ///
    /// A missing budget is reported before a forbidden one, and both before
    /// any field error.
    pub async fn create_item(&self, cmd: ItemNewCmd) -> ResultEngine<Item> {
        let item = with_tx!(self, |db_tx| {
            let budget = self
                .require_budget_access(&db_tx, cmd.budget_id, &cmd.user_id)
                .await?;
            let valid = validation::item(&cmd.draft)?;
            let row = with_item_repo!(cmd.kind, items => {
                items::insert(&db_tx, budget.id, valid.amount, valid.category).await?
            });
            row.into_item(cmd.kind, budget.label())
        })?;

        tracing::info!(
            kind = item.kind.as_str(),
            item_id = item.id,
            budget_id = item.budget_id,
            "item created"
        );
        Ok(item)
    }

    pub async fn item(&self, kind: ItemKind, item_id: i32, user_id: &str) -> ResultEngine<Item> {
        with_tx!(self, |db_tx| {
            let (row, label) = self.require_item(&db_tx, kind, item_id, user_id).await?;
            row.into_item(kind, label)
        })
    }

    /// Items of `kind` in every budget the principal may access, by ascending
    /// id. Rows of other budgets are left out, never reported as errors.
    pub async fn list_items(
        &self,
        kind: ItemKind,
        filter: &ItemFilter,
        user_id: &str,
    ) -> ResultEngine<Vec<Item>> {
        // An empty `?category=` means no filter.
        let category = match filter.category.as_deref() {
            None | Some("") => None,
            Some(code) => Some(validation::category(Some(code))?),
        };

        with_tx!(self, |db_tx| {
            let rows = with_item_repo!(kind, items => {
                items::list_accessible(&db_tx, user_id, filter.budget_id, category).await?
            });
            let labels = self
                .budget_labels(&db_tx, rows.iter().map(|row| row.budget_id))
                .await?;
            rows.into_iter()
                .map(|row| {
                    let label = labels.get(&row.budget_id).cloned().unwrap_or_default();
                    row.into_item(kind, label)
                })
                .collect::<ResultEngine<Vec<Item>>>()
        })
    }

    /// Changes the amount and/or category of an item. The owning budget never
    /// changes.
    pub async fn update_item(
        &self,
        kind: ItemKind,
        item_id: i32,
        patch: ItemPatch,
        user_id: &str,
    ) -> ResultEngine<Item> {
        with_tx!(self, |db_tx| {
            let (_, label) = self.require_item(&db_tx, kind, item_id, user_id).await?;
            let (amount, category) = validation::item_patch(&patch)?;
            let row = with_item_repo!(kind, items => {
                items::update(&db_tx, item_id, amount, category).await?
            });
            tracing::debug!(kind = kind.as_str(), item_id, "item updated");
            row.into_item(kind, label)
        })
    }

    pub async fn delete_item(&self, kind: ItemKind, item_id: i32, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_item(&db_tx, kind, item_id, user_id).await?;
            with_item_repo!(kind, items => items::delete(&db_tx, item_id).await?);
            tracing::info!(kind = kind.as_str(), item_id, "item deleted");
            Ok(())
        })
    }

    /// Loads an item whose budget the principal may access, with that
    /// budget's label.
    async fn require_item(
        &self,
        db: &DatabaseTransaction,
        kind: ItemKind,
        item_id: i32,
        user_id: &str,
    ) -> ResultEngine<(ItemRow, String)> {
        let row = with_item_repo!(kind, items => items::find(db, item_id).await?)
            .ok_or_else(|| EngineError::KeyNotFound(format!("{} not exists", kind.as_str())))?;
        let budget = self
            .require_budget_access(db, row.budget_id, user_id)
            .await?;
        Ok((row, budget.label()))
    }
}
