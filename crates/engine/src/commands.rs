//! Command structs for engine write operations.
//!
//! These types group parameters for creations, keeping call sites readable
//! and avoiding long argument lists.

use crate::{ItemDraft, ItemKind};

/// Create a budget together with its incomes and expenses.
#[derive(Clone, Debug)]
pub struct BudgetNewCmd {
    /// `None` when the client left the name out.
    pub name: Option<String>,
    pub incomes: Vec<ItemDraft>,
    pub expenses: Vec<ItemDraft>,
    pub user_id: String,
}

impl BudgetNewCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            incomes: Vec::new(),
            expenses: Vec::new(),
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn income(mut self, draft: ItemDraft) -> Self {
        self.incomes.push(draft);
        self
    }

    #[must_use]
    pub fn expense(mut self, draft: ItemDraft) -> Self {
        self.expenses.push(draft);
        self
    }
}

/// Create a single income or expense in an existing budget.
#[derive(Clone, Debug)]
pub struct ItemNewCmd {
    pub kind: ItemKind,
    pub budget_id: i32,
    pub draft: ItemDraft,
    pub user_id: String,
}

impl ItemNewCmd {
    #[must_use]
    pub fn new(
        kind: ItemKind,
        budget_id: i32,
        draft: ItemDraft,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            budget_id,
            draft,
            user_id: user_id.into(),
        }
    }
}

/// Register a new user.
#[derive(Clone, Debug)]
pub struct RegisterCmd {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RegisterCmd {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            email: None,
            password: Some(password.into()),
        }
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
