//! Input validation per entity shape.
//!
//! Every function returns the normalized value or a [`ValidationErrors`]
//! keyed by field name; callers nest them under a path when composing
//! (`incomes[0].amount`).

use crate::{
    Amount, BudgetNewCmd, Category, ItemDraft, ItemPatch, RegisterCmd, ValidationErrors,
    error::REQUIRED,
};

const BLANK: &str = "This field may not be blank.";
const BUDGET_NAME_MAX_LEN: usize = 100;
const USERNAME_MAX_LEN: usize = 150;

/// Item fields after validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ValidItem {
    pub amount: Amount,
    pub category: Category,
}

/// Budget aggregate after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ValidBudget {
    pub name: String,
    pub incomes: Vec<ValidItem>,
    pub expenses: Vec<ValidItem>,
}

pub(crate) fn amount(raw: &str) -> Result<Amount, ValidationErrors> {
    raw.parse::<Amount>()
        .map_err(|err| ValidationErrors::single("amount", err.to_string()))
}

pub(crate) fn category(raw: Option<&str>) -> Result<Category, ValidationErrors> {
    match raw {
        None => Ok(Category::default()),
        Some(code) => code
            .parse::<Category>()
            .map_err(|err| ValidationErrors::single("category", err.to_string())),
    }
}

pub(crate) fn item(draft: &ItemDraft) -> Result<ValidItem, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let amount = match draft.amount.as_deref() {
        Some(raw) => amount(raw).map_err(|e| errors.merge(e)).ok(),
        None => {
            errors.add("amount", REQUIRED);
            None
        }
    };
    let category = category(draft.category.as_deref())
        .map_err(|e| errors.merge(e))
        .ok();
    match (amount, category) {
        (Some(amount), Some(category)) => Ok(ValidItem { amount, category }),
        _ => Err(errors),
    }
}

pub(crate) fn item_patch(
    patch: &ItemPatch,
) -> Result<(Option<Amount>, Option<Category>), ValidationErrors> {
    if patch.amount.is_none() && patch.category.is_none() {
        return Err(ValidationErrors::single(
            "non_field_errors",
            "Provide at least one of amount or category.",
        ));
    }
    let mut errors = ValidationErrors::new();
    let amount = match patch.amount.as_deref().map(amount).transpose() {
        Ok(value) => value,
        Err(e) => {
            errors.merge(e);
            None
        }
    };
    let category = match patch.category.as_deref() {
        Some(code) => match category(Some(code)) {
            Ok(value) => Some(value),
            Err(e) => {
                errors.merge(e);
                None
            }
        },
        None => None,
    };
    if errors.is_empty() {
        Ok((amount, category))
    } else {
        Err(errors)
    }
}

pub(crate) fn budget_name(raw: &str) -> Result<String, ValidationErrors> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationErrors::single("name", BLANK));
    }
    if trimmed.chars().count() > BUDGET_NAME_MAX_LEN {
        return Err(ValidationErrors::single(
            "name",
            format!("Ensure this field has no more than {BUDGET_NAME_MAX_LEN} characters."),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validates the whole aggregate, reporting every failing child.
pub(crate) fn budget(cmd: &BudgetNewCmd) -> Result<ValidBudget, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = match cmd.name.as_deref() {
        Some(raw) => budget_name(raw).map_err(|e| errors.merge(e)).ok(),
        None => {
            errors.add("name", REQUIRED);
            None
        }
    };

    let mut children = |label: &str, drafts: &[ItemDraft]| -> Vec<ValidItem> {
        let mut valid = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts.iter().enumerate() {
            match item(draft) {
                Ok(item) => valid.push(item),
                Err(e) => errors.nest(&format!("{label}[{index}]"), e),
            }
        }
        valid
    };
    let incomes = children("incomes", &cmd.incomes);
    let expenses = children("expenses", &cmd.expenses);

    match name {
        Some(name) if errors.is_empty() => Ok(ValidBudget {
            name,
            incomes,
            expenses,
        }),
        _ => Err(errors),
    }
}

/// Registration fields after validation. The password stays in clear form
/// only until it is hashed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ValidRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub(crate) fn registration(cmd: &RegisterCmd) -> Result<ValidRegistration, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let username = cmd.username.as_deref().map(str::trim).unwrap_or_default();
    if cmd.username.is_none() {
        errors.add("username", REQUIRED);
    } else if username.is_empty() {
        errors.add("username", BLANK);
    } else if username.chars().count() > USERNAME_MAX_LEN {
        errors.add(
            "username",
            format!("Ensure this field has no more than {USERNAME_MAX_LEN} characters."),
        );
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    let email = cmd.email.as_deref().map(str::trim).unwrap_or_default();
    if !email.is_empty() && !looks_like_email(email) {
        errors.add("email", "Enter a valid email address.");
    }

    let password = cmd.password.as_deref().unwrap_or_default();
    match cmd.password.as_deref() {
        None => errors.add("password", REQUIRED),
        Some("") => errors.add("password", BLANK),
        Some(_) => {}
    }

    if errors.is_empty() {
        Ok(ValidRegistration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    } else {
        Err(errors)
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !value.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_defaults_category_to_other() {
        let valid = item(&ItemDraft::new("12.50")).unwrap();
        assert_eq!(valid.category, Category::Other);
        assert_eq!(valid.amount, Amount::from_cents(1_250));
    }

    #[test]
    fn missing_fields_are_required() {
        let cmd = BudgetNewCmd {
            name: None,
            incomes: vec![ItemDraft::default().category("WORK")],
            expenses: Vec::new(),
            user_id: "alice".to_string(),
        };
        let errors = budget(&cmd).unwrap_err();
        assert_eq!(errors.fields()["name"], vec![REQUIRED.to_string()]);
        assert_eq!(
            errors.fields()["incomes[0].amount"],
            vec![REQUIRED.to_string()]
        );

        let errors = registration(&RegisterCmd {
            username: None,
            email: None,
            password: None,
        })
        .unwrap_err();
        assert!(errors.contains("username"));
        assert!(errors.contains("password"));
    }

    #[test]
    fn item_reports_both_fields() {
        let errors = item(&ItemDraft::new("abc").category("RENT")).unwrap_err();
        assert!(errors.contains("amount"));
        assert!(errors.contains("category"));
    }

    #[test]
    fn budget_errors_carry_child_paths() {
        let cmd = BudgetNewCmd::new("Groceries", "alice")
            .income(ItemDraft::new("100.00").category("WORK"))
            .expense(ItemDraft::new("1.00").category("FOOD"))
            .expense(ItemDraft::new("2.00").category("CANDY"));
        let errors = budget(&cmd).unwrap_err();
        assert!(errors.contains("expenses[1].category"));
        assert!(!errors.contains("expenses[0].category"));
        assert_eq!(errors.fields().len(), 1);
    }

    #[test]
    fn budget_name_is_trimmed_and_required() {
        assert_eq!(budget_name("  Home "), Ok("Home".to_string()));
        assert!(budget_name("   ").unwrap_err().contains("name"));
        assert!(budget_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn valid_budget_keeps_child_order() {
        let cmd = BudgetNewCmd::new("Groceries", "alice")
            .income(ItemDraft::new("1").category("WORK"))
            .income(ItemDraft::new("2").category("OTHER"));
        let valid = budget(&cmd).unwrap();
        let amounts: Vec<i64> = valid.incomes.iter().map(|i| i.amount.cents()).collect();
        assert_eq!(amounts, vec![100, 200]);
        assert!(valid.expenses.is_empty());
    }

    #[test]
    fn patch_requires_a_field() {
        assert!(item_patch(&ItemPatch::default())
            .unwrap_err()
            .contains("non_field_errors"));
        let (amount, category) = item_patch(&ItemPatch {
            amount: None,
            category: Some("FOOD".to_string()),
        })
        .unwrap();
        assert_eq!(amount, None);
        assert_eq!(category, Some(Category::Food));
    }

    #[test]
    fn registration_rules() {
        assert!(registration(&RegisterCmd::new("alice", "secret")).is_ok());
        assert!(registration(&RegisterCmd::new("alice", ""))
            .unwrap_err()
            .contains("password"));
        assert!(registration(&RegisterCmd::new("al ice", "x"))
            .unwrap_err()
            .contains("username"));
        assert!(registration(&RegisterCmd::new("alice", "x").email("nope"))
            .unwrap_err()
            .contains("email"));
        let valid = registration(&RegisterCmd::new("bob", "x").email("bob@example.com")).unwrap();
        assert_eq!(valid.email, "bob@example.com");
    }
}
