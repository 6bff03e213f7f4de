//! Household budgets shared between users.
//!
//! The [`Engine`] owns the database handle and exposes every operation:
//! budget aggregate creation, income/expense items, sharing, registration
//! and authentication. Each call runs in its own database transaction.

pub use amount::{Amount, AmountError};
pub use budgets::Budget;
pub use category::{Category, UnknownCategory};
pub use commands::{BudgetNewCmd, ItemNewCmd, RegisterCmd};
pub use error::{EngineError, ValidationErrors};
pub use item::{Item, ItemDraft, ItemFilter, ItemKind, ItemPatch};
pub use ops::{Engine, EngineBuilder};
pub use users::User;

mod amount;
mod category;
mod commands;
mod error;
mod item;
mod ops;
mod password;
mod repo;
mod validation;

pub mod budget_shares;
pub mod budgets;
pub mod expenses;
pub mod incomes;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
