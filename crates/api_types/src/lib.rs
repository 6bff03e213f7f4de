use serde::{Deserialize, Serialize};

/// Collection envelope used by every list endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub count: usize,
    pub results: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(results: Vec<T>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

pub mod item {
    use super::*;

    /// A decimal amount as sent by clients: `"12.50"` or `12.5`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum AmountInput {
        Text(String),
        Number(serde_json::Number),
    }

    impl AmountInput {
        /// Decimal text handed to the engine parser.
        pub fn into_text(self) -> String {
            match self {
                Self::Text(text) => text,
                Self::Number(number) => number.to_string(),
            }
        }
    }

    /// Income or expense nested in a budget creation.
    ///
    /// Required fields are optional here so that a missing one is reported
    /// per field by the engine instead of failing deserialization.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ItemFields {
        #[serde(default)]
        pub amount: Option<AmountInput>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        #[serde(default)]
        pub amount: Option<AmountInput>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(default)]
        pub budget: Option<i32>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ItemUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<AmountInput>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
    }

    /// Query string of the item listings: `?budget=3&category=FOOD`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ItemListQuery {
        pub budget: Option<i32>,
        pub category: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: i32,
        /// Two-decimal text, e.g. `"12.50"`.
        pub amount: String,
        /// Human label of the category, e.g. `"Medical & Healthcare"`.
        pub category: String,
        /// Rendering of the owning budget, `"<name> (#<id>)"`.
        pub budget: String,
        pub url: String,
    }
}

pub mod budget {
    use super::*;
    use crate::item::{ItemFields, ItemView};

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub incomes: Vec<ItemFields>,
        #[serde(default)]
        pub expenses: Vec<ItemFields>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        #[serde(default)]
        pub name: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetShare {
        /// Username to share the budget with.
        #[serde(default)]
        pub user: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: i32,
        pub name: String,
        pub owner: String,
        pub shared_with: Vec<String>,
        /// Sum of incomes minus sum of expenses, two-decimal text.
        pub revenue: String,
        pub incomes: Vec<ItemView>,
        pub expenses: Vec<ItemView>,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct UserRegister {
        #[serde(default)]
        pub username: Option<String>,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub password: Option<String>,
    }

    /// Registration answer. The password is never echoed.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub email: String,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        budget::BudgetNew,
        item::{AmountInput, ItemNew},
    };

    #[test]
    fn amount_accepts_text_and_numbers() {
        let text: ItemNew =
            serde_json::from_str(r#"{"amount": "12.50", "budget": 1}"#).unwrap();
        assert_eq!(text.amount.map(AmountInput::into_text).as_deref(), Some("12.50"));
        assert_eq!(text.category, None);

        let number: ItemNew =
            serde_json::from_str(r#"{"amount": 7.5, "category": "FOOD", "budget": 1}"#).unwrap();
        assert_eq!(number.amount.map(AmountInput::into_text).as_deref(), Some("7.5"));

        let integer: ItemNew = serde_json::from_str(r#"{"amount": 100, "budget": 1}"#).unwrap();
        assert_eq!(integer.amount, Some(AmountInput::Number(100.into())));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let item: ItemNew = serde_json::from_str(r#"{"category": "FOOD"}"#).unwrap();
        assert_eq!(item.amount, None);
        assert_eq!(item.budget, None);

        let budget: BudgetNew = serde_json::from_str(r#"{"incomes": [{}]}"#).unwrap();
        assert_eq!(budget.name, None);
        assert_eq!(budget.incomes[0].amount, None);
        assert!(budget.expenses.is_empty());
    }
}
