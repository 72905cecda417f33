// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Form input rejected before anything reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Choose a car")]
    MissingCar,
    #[error("Choose a category")]
    MissingCategory,
    #[error("Enter a valid amount (got '{0}')")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Enter a date")]
    MissingDate,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Odometer must be a whole number of km (got '{0}')")]
    InvalidOdometer(String),
    #[error("Enter a name for the car")]
    MissingCarName,
    #[error("Invalid model year '{0}'")]
    InvalidYear(String),
    #[error("Enter an e-mail address")]
    MissingEmail,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Car {0} does not exist or belongs to another user")]
    UnknownCar(i64),
    #[error("Category {0} does not exist")]
    UnknownCategory(i64),
    #[error("No user with e-mail '{0}'")]
    UnknownUser(String),
    #[error("Expense {id} has an invalid amount '{raw}'")]
    InvalidAmount { id: i64, raw: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
