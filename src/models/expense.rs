//! This file defines the type `Expense`, a single spending entry within a monthly budget, along
//! with the fixed set of categories an expense can belong to.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, models::DatabaseID};

/// The category of spending an expense belongs to.
///
/// Categories are a fixed set, they cannot be defined by users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    /// Getting around, e.g. bus fares and fuel.
    Transportation,
    /// Food and household supplies.
    Grocery,
    /// Tuition, fees, and school supplies.
    School,
    /// Vehicle purchase, maintenance, and insurance.
    Car,
    /// Rent, mortgage payments, and home maintenance.
    House,
    /// Trips and holidays.
    Travel,
    /// Personal care and discretionary spending.
    Personal,
    /// Childcare and children's activities.
    Kids,
    /// Anything that does not fit the other categories.
    Miscellaneous,
}

impl ExpenseCategory {
    /// The category as the string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Transportation => "TRANSPORTATION",
            ExpenseCategory::Grocery => "GROCERY",
            ExpenseCategory::School => "SCHOOL",
            ExpenseCategory::Car => "CAR",
            ExpenseCategory::House => "HOUSE",
            ExpenseCategory::Travel => "TRAVEL",
            ExpenseCategory::Personal => "PERSONAL",
            ExpenseCategory::Kids => "KIDS",
            ExpenseCategory::Miscellaneous => "MISCELLANEOUS",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRANSPORTATION" => Ok(ExpenseCategory::Transportation),
            "GROCERY" => Ok(ExpenseCategory::Grocery),
            "SCHOOL" => Ok(ExpenseCategory::School),
            "CAR" => Ok(ExpenseCategory::Car),
            "HOUSE" => Ok(ExpenseCategory::House),
            "TRAVEL" => Ok(ExpenseCategory::Travel),
            "PERSONAL" => Ok(ExpenseCategory::Personal),
            "KIDS" => Ok(ExpenseCategory::Kids),
            "MISCELLANEOUS" => Ok(ExpenseCategory::Miscellaneous),
            _ => Err(Error::InvalidCategory(s.to_string())),
        }
    }
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The data needed to create a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    description: String,
    category: ExpenseCategory,
    amount: f64,
    date: OffsetDateTime,
    monthly_expense_id: DatabaseID,
}

impl NewExpense {
    /// Create the data for a new expense.
    ///
    /// # Errors
    ///
    /// This function will return an error if `amount` is zero or negative.
    pub fn new(
        description: String,
        category: ExpenseCategory,
        amount: f64,
        date: OffsetDateTime,
        monthly_expense_id: DatabaseID,
    ) -> Result<Self, Error> {
        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount(amount));
        }

        Ok(Self {
            description,
            category,
            amount,
            date,
            monthly_expense_id,
        })
    }

    /// Create the data for a new expense without any validation.
    ///
    /// The caller should ensure that `amount` is greater than zero.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the amount invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(
        description: String,
        category: ExpenseCategory,
        amount: f64,
        date: OffsetDateTime,
        monthly_expense_id: DatabaseID,
    ) -> Self {
        Self {
            description,
            category,
            amount,
            date,
            monthly_expense_id,
        }
    }

    /// A text description of what the expense was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The category of spending the expense belongs to.
    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    /// The amount of money spent.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// When the expense happened.
    pub fn date(&self) -> OffsetDateTime {
        self.date
    }

    /// The ID of the monthly expense budget the expense belongs to.
    pub fn monthly_expense_id(&self) -> DatabaseID {
        self.monthly_expense_id
    }
}

/// A partial update to an expense.
///
/// Fields that are `None` are left unchanged by
/// [ExpenseStore::update](crate::stores::ExpenseStore::update).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseUpdate {
    description: Option<String>,
    category: Option<ExpenseCategory>,
    amount: Option<f64>,
    date: Option<OffsetDateTime>,
    monthly_expense_id: Option<DatabaseID>,
}

impl ExpenseUpdate {
    /// Create a partial update to an expense.
    ///
    /// # Errors
    ///
    /// This function will return an error if `amount` is present and zero or negative.
    pub fn new(
        description: Option<String>,
        category: Option<ExpenseCategory>,
        amount: Option<f64>,
        date: Option<OffsetDateTime>,
        monthly_expense_id: Option<DatabaseID>,
    ) -> Result<Self, Error> {
        if let Some(amount) = amount {
            if amount <= 0.0 {
                return Err(Error::NonPositiveAmount(amount));
            }
        }

        Ok(Self {
            description,
            category,
            amount,
            date,
            monthly_expense_id,
        })
    }

    /// The new description, if one was supplied.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The new category, if one was supplied.
    pub fn category(&self) -> Option<ExpenseCategory> {
        self.category
    }

    /// The new amount, if one was supplied.
    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    /// The new date, if one was supplied.
    pub fn date(&self) -> Option<OffsetDateTime> {
        self.date
    }

    /// The new monthly expense budget ID, if one was supplied.
    pub fn monthly_expense_id(&self) -> Option<DatabaseID> {
        self.monthly_expense_id
    }
}

/// A single spending entry within a monthly budget.
///
/// You should not need to create this type directly, most code will get an `Expense` from an
/// [ExpenseStore](crate::stores::ExpenseStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    id: DatabaseID,
    description: String,
    category: ExpenseCategory,
    amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
    monthly_expense_id: DatabaseID,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    deleted_at: Option<OffsetDateTime>,
}

impl Expense {
    /// Create a new expense.
    ///
    /// This function does not add the expense to any database.
    pub fn new(
        id: DatabaseID,
        data: NewExpense,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
        deleted_at: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            id,
            description: data.description,
            category: data.category,
            amount: data.amount,
            date: data.date,
            monthly_expense_id: data.monthly_expense_id,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// The ID of the expense in the database.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// A text description of what the expense was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The category of spending the expense belongs to.
    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    /// The amount of money spent.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// When the expense happened.
    pub fn date(&self) -> OffsetDateTime {
        self.date
    }

    /// The ID of the monthly expense budget the expense belongs to.
    pub fn monthly_expense_id(&self) -> DatabaseID {
        self.monthly_expense_id
    }

    /// When the expense was created.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// When the expense was last updated.
    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    /// When the expense was soft-deleted, if it has been.
    pub fn deleted_at(&self) -> Option<OffsetDateTime> {
        self.deleted_at
    }
}


#[cfg(test)]
mod new_expense_tests {
    use time::OffsetDateTime;

    use crate::{
        Error,
        models::{ExpenseCategory, NewExpense},
    };

    #[test]
    fn new_fails_on_zero_amount() {
        let result = NewExpense::new(
            "Bus fare".to_string(),
            ExpenseCategory::Transportation,
            0.0,
            OffsetDateTime::now_utc(),
            1,
        );

        assert_eq!(result, Err(Error::NonPositiveAmount(0.0)));
    }

    #[test]
    fn new_fails_on_negative_amount() {
        let result = NewExpense::new(
            "Bus fare".to_string(),
            ExpenseCategory::Transportation,
            -2.5,
            OffsetDateTime::now_utc(),
            1,
        );

        assert_eq!(result, Err(Error::NonPositiveAmount(-2.5)));
    }

    #[test]
    fn new_succeeds_on_positive_amount() {
        let result = NewExpense::new(
            "Bus fare".to_string(),
            ExpenseCategory::Transportation,
            2.5,
            OffsetDateTime::now_utc(),
            1,
        );

        assert!(result.is_ok());
    }
}

#[cfg(test)]
mod expense_update_tests {
    use crate::{Error, models::ExpenseUpdate};

    #[test]
    fn new_fails_on_non_positive_amount() {
        let result = ExpenseUpdate::new(None, None, Some(-10.0), None, None);

        assert_eq!(result, Err(Error::NonPositiveAmount(-10.0)));
    }

    #[test]
    fn new_succeeds_with_no_fields() {
        let result = ExpenseUpdate::new(None, None, None, None, None);

        assert_eq!(result, Ok(ExpenseUpdate::default()));
    }

    #[test]
    fn new_succeeds_with_positive_amount() {
        let result = ExpenseUpdate::new(Some("Train fare".to_string()), None, Some(4.0), None, None);

        assert!(result.is_ok());
    }
}
