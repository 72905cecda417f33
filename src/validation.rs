// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Raw form input and the checks that turn it into drafts.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::{Car, CarDraft, Expense, ExpenseDraft};
use crate::utils::parse_decimal;

const MIN_MODEL_YEAR: i32 = 1886;
const MAX_MODEL_YEAR: i32 = 2100;

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

#[derive(Debug, Clone, Default)]
pub struct CarForm {
    pub name: String,
    pub registration_number: String,
    pub brand: String,
    pub model: String,
    pub year: String,
}

impl CarForm {
    /// Prefills the form from a stored car, as the edit screen does.
    pub fn from_car(car: &Car) -> Self {
        CarForm {
            name: car.name.clone(),
            registration_number: car.registration_number.clone().unwrap_or_default(),
            brand: car.brand.clone().unwrap_or_default(),
            model: car.model.clone().unwrap_or_default(),
            year: car.year.map(|y| y.to_string()).unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<CarDraft, ValidationError> {
        let name = non_empty(&self.name).ok_or(ValidationError::MissingCarName)?;
        let year = match non_empty(&self.year) {
            None => None,
            Some(y) => {
                let parsed: i32 = y
                    .parse()
                    .map_err(|_| ValidationError::InvalidYear(y.clone()))?;
                if !(MIN_MODEL_YEAR..=MAX_MODEL_YEAR).contains(&parsed) {
                    return Err(ValidationError::InvalidYear(y));
                }
                Some(parsed)
            }
        };
        Ok(CarDraft {
            name,
            registration_number: non_empty(&self.registration_number),
            brand: non_empty(&self.brand),
            model: non_empty(&self.model),
            year,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseForm {
    pub car_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: String,
    pub date: String,
    pub note: String,
    pub odometer_km: String,
}

impl ExpenseForm {
    /// Blank form dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        ExpenseForm {
            date: today.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    pub fn from_expense(e: &Expense) -> Self {
        ExpenseForm {
            car_id: Some(e.car_id),
            category_id: Some(e.category_id),
            amount: e.amount.to_string(),
            date: e.date.format("%Y-%m-%d").to_string(),
            note: e.note.clone().unwrap_or_default(),
            odometer_km: e.odometer_km.map(|k| k.to_string()).unwrap_or_default(),
        }
    }

    /// Checks car, category, amount, date, then odometer; the first
    /// failure wins.
    pub fn validate(&self) -> Result<ExpenseDraft, ValidationError> {
        let car_id = self.car_id.ok_or(ValidationError::MissingCar)?;
        let category_id = self.category_id.ok_or(ValidationError::MissingCategory)?;
        let amount = parse_decimal(&self.amount)
            .ok_or_else(|| ValidationError::InvalidAmount(self.amount.trim().to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        let date_s = self.date.trim();
        if date_s.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        let date = NaiveDate::parse_from_str(date_s, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date_s.to_string()))?;
        let odometer_km = match non_empty(&self.odometer_km) {
            None => None,
            Some(k) => Some(
                k.parse::<u32>()
                    .map(i64::from)
                    .map_err(|_| ValidationError::InvalidOdometer(k.clone()))?,
            ),
        };
        Ok(ExpenseDraft {
            car_id,
            category_id,
            amount,
            date,
            note: non_empty(&self.note),
            odometer_km,
        })
    }
}
