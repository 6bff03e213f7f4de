//! The `Budget` groups incomes and expenses of one owner, optionally shared
//! with other users.

use sea_orm::entity::prelude::*;

use crate::{Amount, Item};

/// A budget with its children, as seen by a principal allowed to read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Budget {
    pub id: i32,
    pub name: String,
    pub owner: String,
    /// Usernames the budget has been shared with, sorted.
    pub shared_with: Vec<String>,
    /// Incomes in insertion order.
    pub incomes: Vec<Item>,
    /// Expenses in insertion order.
    pub expenses: Vec<Item>,
}

impl Budget {
    /// Sum of incomes minus sum of expenses. Never stored.
    pub fn revenue(&self) -> Amount {
        let incomes: Amount = self.incomes.iter().map(|i| i.amount).sum();
        let expenses: Amount = self.expenses.iter().map(|e| e.amount).sum();
        incomes - expenses
    }

    /// Owner or shared-with.
    pub fn is_accessible_by(&self, username: &str) -> bool {
        self.owner == username || self.shared_with.iter().any(|u| u == username)
    }

    pub fn label(&self) -> String {
        label(self.id, &self.name)
    }
}

/// Textual rendering of a budget used by item representations.
pub(crate) fn label(id: i32, name: &str) -> String {
    format!("{name} (#{id})")
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub owner: String,
}

impl Model {
    pub(crate) fn label(&self) -> String {
        label(self.id, &self.name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Owner",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::incomes::Entity")]
    Incomes,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::budget_shares::Entity")]
    Shares,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::incomes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incomes.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::budget_shares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, ItemKind};

    fn item(kind: ItemKind, id: i32, cents: i64) -> Item {
        Item {
            id,
            kind,
            amount: Amount::from_cents(cents),
            category: Category::Other,
            budget_id: 1,
            budget: label(1, "Home"),
        }
    }

    fn budget() -> Budget {
        Budget {
            id: 1,
            name: "Home".to_string(),
            owner: "alice".to_string(),
            shared_with: vec!["bob".to_string()],
            incomes: Vec::new(),
            expenses: Vec::new(),
        }
    }

    #[test]
    fn empty_budget_has_zero_revenue() {
        assert_eq!(budget().revenue(), Amount::ZERO);
    }

    #[test]
    fn revenue_is_incomes_minus_expenses() {
        let mut budget = budget();
        budget.incomes = vec![
            item(ItemKind::Income, 1, 10_000),
            item(ItemKind::Income, 2, 1_000),
        ];
        budget.expenses = vec![item(ItemKind::Expense, 1, 100)];
        assert_eq!(budget.revenue(), Amount::from_cents(10_900));

        budget.expenses.push(item(ItemKind::Expense, 2, 20_000));
        assert_eq!(budget.revenue().to_string(), "-90.00");
    }

    #[test]
    fn owner_and_shared_users_have_access() {
        let budget = budget();
        assert!(budget.is_accessible_by("alice"));
        assert!(budget.is_accessible_by("bob"));
        assert!(!budget.is_accessible_by("carol"));
    }

    #[test]
    fn label_includes_name_and_id() {
        assert_eq!(budget().label(), "Home (#1)");
    }
}
