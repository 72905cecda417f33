// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending overview: grand total plus per-category and per-car subtotals.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::ExpenseWithLabels;

pub const UNKNOWN_CATEGORY: &str = "unknown category";
pub const UNKNOWN_CAR: &str = "unknown car";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSum {
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub by_category: Vec<LabelSum>,
    pub by_car: Vec<LabelSum>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty() && self.by_car.is_empty()
    }
}

/// Sums amounts per label, remembering the order labels were first seen.
#[derive(Default)]
struct Buckets {
    index: HashMap<String, usize>,
    sums: Vec<LabelSum>,
}

impl Buckets {
    fn add(&mut self, label: &str, amount: Decimal) {
        match self.index.get(label) {
            Some(&i) => self.sums[i].total += amount,
            None => {
                self.index.insert(label.to_string(), self.sums.len());
                self.sums.push(LabelSum {
                    label: label.to_string(),
                    total: amount,
                });
            }
        }
    }

    fn into_sorted(mut self) -> Vec<LabelSum> {
        // stable: equal totals keep first-seen order
        self.sums.sort_by(|a, b| b.total.cmp(&a.total));
        self.sums
    }
}

pub fn aggregate<'a, I>(expenses: I) -> Summary
where
    I: IntoIterator<Item = &'a ExpenseWithLabels>,
{
    let mut total = Decimal::ZERO;
    let mut by_category = Buckets::default();
    let mut by_car = Buckets::default();

    for e in expenses {
        let amount = e.expense.amount;
        total += amount;
        let category = match &e.labels.category {
            Some(name) => name.as_str(),
            None => UNKNOWN_CATEGORY,
        };
        let car = match &e.labels.car {
            Some(name) => name.as_str(),
            None => UNKNOWN_CAR,
        };
        by_category.add(category, amount);
        by_car.add(car, amount);
    }

    Summary {
        total,
        by_category: by_category.into_sorted(),
        by_car: by_car.into_sorted(),
    }
}
