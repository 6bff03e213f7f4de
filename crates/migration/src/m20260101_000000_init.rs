//! Initial schema.
//!
//! - `users`: accounts, keyed by username
//! - `budgets`: named budgets owned by a user
//! - `budget_shares`: users a budget is shared with
//! - `incomes` / `expenses`: items of a budget, amounts in cents

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Email,
    Password,
    DateJoined,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    Name,
    Owner,
}

#[derive(Iden)]
enum BudgetShares {
    Table,
    BudgetId,
    Username,
}

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    AmountMinor,
    Category,
    BudgetId,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    AmountMinor,
    Category,
    BudgetId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(150)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::DateJoined)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Budgets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Budgets::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Budgets::Owner).string_len(150).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-owner")
                            .from(Budgets::Table, Budgets::Owner)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-owner")
                    .table(Budgets::Table)
                    .col(Budgets::Owner)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BudgetShares::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BudgetShares::BudgetId).integer().not_null())
                    .col(
                        ColumnDef::new(BudgetShares::Username)
                            .string_len(150)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(BudgetShares::BudgetId)
                            .col(BudgetShares::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budget_shares-budget_id")
                            .from(BudgetShares::Table, BudgetShares::BudgetId)
                            .to(Budgets::Table, Budgets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budget_shares-username")
                            .from(BudgetShares::Table, BudgetShares::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budget_shares-username")
                    .table(BudgetShares::Table)
                    .col(BudgetShares::Username)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incomes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incomes::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Incomes::Category)
                            .string()
                            .not_null()
                            .default("OTHER"),
                    )
                    .col(ColumnDef::new(Incomes::BudgetId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-incomes-budget_id")
                            .from(Incomes::Table, Incomes::BudgetId)
                            .to(Budgets::Table, Budgets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-budget_id")
                    .table(Incomes::Table)
                    .col(Incomes::BudgetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenses::Category)
                            .string()
                            .not_null()
                            .default("OTHER"),
                    )
                    .col(ColumnDef::new(Expenses::BudgetId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-budget_id")
                            .from(Expenses::Table, Expenses::BudgetId)
                            .to(Budgets::Table, Budgets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-budget_id")
                    .table(Expenses::Table)
                    .col(Expenses::BudgetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetShares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
