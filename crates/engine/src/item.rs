//! Incomes and expenses share one shape; `ItemKind` tells them apart.

use serde::{Deserialize, Serialize};

use crate::{Amount, Category, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Income,
    Expense,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Collection name, also the route segment (`incomes`, `expenses`).
    pub fn plural(self) -> &'static str {
        match self {
            Self::Income => "incomes",
            Self::Expense => "expenses",
        }
    }
}

/// An income or an expense, attached to exactly one budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: i32,
    pub kind: ItemKind,
    pub amount: Amount,
    pub category: Category,
    pub budget_id: i32,
    /// Textual rendering of the owning budget.
    pub budget: String,
}

/// Unvalidated item fields as received from a client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemDraft {
    /// `None` when the client left the amount out.
    pub amount: Option<String>,
    /// `None` falls back to [`Category::Other`].
    pub category: Option<String>,
}

impl ItemDraft {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: Some(amount.into()),
            category: None,
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Partial update of an item. At least one field must be present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub amount: Option<String>,
    pub category: Option<String>,
}

/// Optional narrowing of an item listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub budget_id: Option<i32>,
    /// Category code, validated like any other input.
    pub category: Option<String>,
}

/// Storage row shared by both item tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ItemRow {
    pub id: i32,
    pub amount_minor: i64,
    pub category: String,
    pub budget_id: i32,
}

impl ItemRow {
    pub(crate) fn into_item(self, kind: ItemKind, budget: String) -> ResultEngine<Item> {
        let category = self.category.parse::<Category>().map_err(|_| {
            EngineError::InvalidData(format!(
                "{} {} has category {}",
                kind.as_str(),
                self.id,
                self.category
            ))
        })?;
        Ok(Item {
            id: self.id,
            kind,
            amount: Amount::from_cents(self.amount_minor),
            category,
            budget_id: self.budget_id,
            budget,
        })
    }
}
