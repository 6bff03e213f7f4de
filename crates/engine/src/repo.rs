//! Data access for the two item tables.
//!
//! `incomes` and `expenses` have the same columns, so one macro generates a
//! module per table and [`with_item_repo`] picks the module for an
//! [`ItemKind`](crate::ItemKind).

/// Generates `find`, `insert`, `update`, `delete` and listing helpers for an
/// item table. Every helper returns [`ItemRow`](crate::item::ItemRow) so both
/// tables can be handled by the same caller.
macro_rules! item_repository {
    ($name:ident, $table:ident) => {
        pub(crate) mod $name {
            use sea_orm::{
                ActiveValue, Condition, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*,
            };

            use crate::{$table as table, Amount, Category, ResultEngine, item::ItemRow, ops};

            pub(crate) async fn find(
                db: &DatabaseTransaction,
                id: i32,
            ) -> ResultEngine<Option<ItemRow>> {
                Ok(table::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .map(ItemRow::from))
            }

            pub(crate) async fn insert(
                db: &DatabaseTransaction,
                budget_id: i32,
                amount: Amount,
                category: Category,
            ) -> ResultEngine<ItemRow> {
                let model = table::ActiveModel {
                    id: ActiveValue::NotSet,
                    amount_minor: ActiveValue::Set(amount.cents()),
                    category: ActiveValue::Set(category.as_str().to_string()),
                    budget_id: ActiveValue::Set(budget_id),
                }
                .insert(db)
                .await?;
                Ok(model.into())
            }

            pub(crate) async fn update(
                db: &DatabaseTransaction,
                id: i32,
                amount: Option<Amount>,
                category: Option<Category>,
            ) -> ResultEngine<ItemRow> {
                let mut active = table::ActiveModel {
                    id: ActiveValue::Unchanged(id),
                    ..Default::default()
                };
                if let Some(amount) = amount {
                    active.amount_minor = ActiveValue::Set(amount.cents());
                }
                if let Some(category) = category {
                    active.category = ActiveValue::Set(category.as_str().to_string());
                }
                Ok(active.update(db).await?.into())
            }

            pub(crate) async fn delete(db: &DatabaseTransaction, id: i32) -> ResultEngine<()> {
                table::Entity::delete_by_id(id).exec(db).await?;
                Ok(())
            }

            pub(crate) async fn delete_for_budget(
                db: &DatabaseTransaction,
                budget_id: i32,
            ) -> ResultEngine<()> {
                table::Entity::delete_many()
                    .filter(table::Column::BudgetId.eq(budget_id))
                    .exec(db)
                    .await?;
                Ok(())
            }

            /// Rows of the given budgets, by ascending id.
            pub(crate) async fn for_budgets(
                db: &DatabaseTransaction,
                budget_ids: &[i32],
            ) -> ResultEngine<Vec<ItemRow>> {
                if budget_ids.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(table::Entity::find()
                    .filter(table::Column::BudgetId.is_in(budget_ids.iter().copied()))
                    .order_by_asc(table::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(ItemRow::from)
                    .collect())
            }

            /// Rows of every budget `username` may access, narrowed by the
            /// optional filters, by ascending id.
            pub(crate) async fn list_accessible(
                db: &DatabaseTransaction,
                username: &str,
                budget_id: Option<i32>,
                category: Option<Category>,
            ) -> ResultEngine<Vec<ItemRow>> {
                let mut narrow = Condition::all();
                if let Some(budget_id) = budget_id {
                    narrow = narrow.add(table::Column::BudgetId.eq(budget_id));
                }
                if let Some(category) = category {
                    narrow = narrow.add(table::Column::Category.eq(category.as_str()));
                }
                let select = ops::scope_to_principal(
                    table::Entity::find(),
                    table::Column::BudgetId,
                    username,
                );
                Ok(select
                    .filter(narrow)
                    .order_by_asc(table::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(ItemRow::from)
                    .collect())
            }
        }
    };
}

item_repository!(incomes, incomes);
item_repository!(expenses, expenses);

/// Runs `$body` with `$repo` bound to the repository module of `$kind`.
macro_rules! with_item_repo {
    ($kind:expr, $repo:ident => $body:expr) => {
        match $kind {
            $crate::ItemKind::Income => {
                use $crate::repo::incomes as $repo;
                $body
            }
            $crate::ItemKind::Expense => {
                use $crate::repo::expenses as $repo;
                $body
            }
        }
    };
}

pub(crate) use with_item_repo;
