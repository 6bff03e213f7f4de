//! Fixed classification for incomes and expenses.
//!
//! Categories are stored and accepted by their code (`FOOD`), and always
//! rendered with their human label (`Food`).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Housing,
    Transportation,
    Food,
    MedicalAndHealthcare,
    Utilities,
    SavingAndDebtPayments,
    Insurance,
    Work,
    #[default]
    Other,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("\"{0}\" is not a valid choice.")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Housing,
        Self::Transportation,
        Self::Food,
        Self::MedicalAndHealthcare,
        Self::Utilities,
        Self::SavingAndDebtPayments,
        Self::Insurance,
        Self::Work,
        Self::Other,
    ];

    /// Stable code used in storage and request bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Housing => "HOUSING",
            Self::Transportation => "TRANSPORTATION",
            Self::Food => "FOOD",
            Self::MedicalAndHealthcare => "MEDICAL_AND_HEALTHCARE",
            Self::Utilities => "UTILITIES",
            Self::SavingAndDebtPayments => "SAVING_AND_DEBT_PAYMENTS",
            Self::Insurance => "INSURANCE",
            Self::Work => "WORK",
            Self::Other => "OTHER",
        }
    }

    /// Human readable label, the only form handed to clients.
    pub fn label(self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Transportation => "Transportation",
            Self::Food => "Food",
            Self::MedicalAndHealthcare => "Medical & Healthcare",
            Self::Utilities => "Utilities",
            Self::SavingAndDebtPayments => "Saving & Debt Payments",
            Self::Insurance => "Insurance",
            Self::Work => "Work",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
