// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub registration_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Shared reference data, not owned by any user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub car_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub odometer_km: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Names joined onto an expense at query time. Either side is `None` when
/// the referenced row could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLabels {
    pub category: Option<String>,
    pub car: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseWithLabels {
    #[serde(flatten)]
    pub expense: Expense,
    pub labels: ResolvedLabels,
}

/// Validated car fields, ready to insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarDraft {
    pub name: String,
    pub registration_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
}

/// Validated expense fields, ready to insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub car_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub odometer_km: Option<i64>,
}
