// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record store: the query surface the screens and the overview read from.
//!
//! Every user-owned query is filtered by the [`Session`] passed in; callers
//! never filter on their own.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{StoreError, StoreResult};
use crate::models::{
    Car, CarDraft, Expense, ExpenseCategory, ExpenseDraft, ExpenseWithLabels, Profile,
    ResolvedLabels,
};
use crate::session::Session;
use crate::utils::{DEFAULT_CURRENCY, decimal_from_sql};

pub trait RecordStore {
    /// All of the user's expenses with category and car names attached,
    /// in the order they were recorded.
    fn fetch_user_expenses(&self, session: &Session) -> StoreResult<Vec<ExpenseWithLabels>>;

    /// Newest first; optionally only one car.
    fn list_expenses(
        &self,
        session: &Session,
        car_id: Option<i64>,
    ) -> StoreResult<Vec<ExpenseWithLabels>>;
    fn expense(&self, session: &Session, id: i64) -> StoreResult<ExpenseWithLabels>;
    fn insert_expense(&self, session: &Session, draft: &ExpenseDraft) -> StoreResult<i64>;
    fn update_expense(&self, session: &Session, id: i64, draft: &ExpenseDraft)
    -> StoreResult<()>;
    fn delete_expense(&self, session: &Session, id: i64) -> StoreResult<()>;

    fn list_cars(&self, session: &Session) -> StoreResult<Vec<Car>>;
    fn car(&self, session: &Session, id: i64) -> StoreResult<Car>;
    fn car_by_name(&self, session: &Session, name: &str) -> StoreResult<Option<Car>>;
    fn insert_car(&self, session: &Session, draft: &CarDraft) -> StoreResult<i64>;
    fn update_car(&self, session: &Session, id: i64, draft: &CarDraft) -> StoreResult<()>;
    /// Removes the car and, through the schema, all of its expenses.
    fn delete_car(&self, session: &Session, id: i64) -> StoreResult<()>;
    fn count_car_expenses(&self, session: &Session, car_id: i64) -> StoreResult<i64>;

    fn list_categories(&self) -> StoreResult<Vec<ExpenseCategory>>;
    fn category_by_name_or_slug(&self, name: &str) -> StoreResult<Option<ExpenseCategory>>;

    fn insert_profile(&self, email: &str, display_name: Option<&str>) -> StoreResult<i64>;
    fn list_profiles(&self) -> StoreResult<Vec<Profile>>;
    fn profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>>;
}

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

const EXPENSE_SELECT: &str = "SELECT e.id, e.user_id, e.car_id, e.category_id, e.amount, e.currency, e.date, e.note, e.odometer_km, e.created_at, e.updated_at, c.name, k.name
     FROM expenses e
     LEFT JOIN expense_categories c ON e.category_id=c.id
     LEFT JOIN cars k ON e.car_id=k.id";

const CAR_SELECT: &str = "SELECT id, user_id, name, registration_number, brand, model, year, created_at, updated_at FROM cars";

/// An expense row before its amount has been checked.
struct RawExpense {
    id: i64,
    user_id: i64,
    car_id: i64,
    category_id: i64,
    amount: Result<Decimal, String>,
    currency: String,
    date: NaiveDate,
    note: Option<String>,
    odometer_km: Option<i64>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    labels: ResolvedLabels,
}

impl RawExpense {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawExpense {
            id: r.get(0)?,
            user_id: r.get(1)?,
            car_id: r.get(2)?,
            category_id: r.get(3)?,
            amount: decimal_from_sql(r.get_ref(4)?),
            currency: r.get(5)?,
            date: r.get(6)?,
            note: r.get(7)?,
            odometer_km: r.get(8)?,
            created_at: r.get(9)?,
            updated_at: r.get(10)?,
            labels: ResolvedLabels {
                category: r.get(11)?,
                car: r.get(12)?,
            },
        })
    }

    fn check(self) -> StoreResult<ExpenseWithLabels> {
        let amount = match self.amount {
            Ok(a) if a > Decimal::ZERO => a,
            Ok(a) => {
                return Err(StoreError::InvalidAmount {
                    id: self.id,
                    raw: a.to_string(),
                });
            }
            Err(raw) => return Err(StoreError::InvalidAmount { id: self.id, raw }),
        };
        Ok(ExpenseWithLabels {
            expense: Expense {
                id: self.id,
                user_id: self.user_id,
                car_id: self.car_id,
                category_id: self.category_id,
                amount,
                currency: self.currency,
                date: self.date,
                note: self.note,
                odometer_km: self.odometer_km,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            labels: self.labels,
        })
    }
}

fn car_from_row(r: &Row<'_>) -> rusqlite::Result<Car> {
    Ok(Car {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        registration_number: r.get(3)?,
        brand: r.get(4)?,
        model: r.get(5)?,
        year: r.get(6)?,
        created_at: r.get(7)?,
        updated_at: r.get(8)?,
    })
}

fn category_from_row(r: &Row<'_>) -> rusqlite::Result<ExpenseCategory> {
    Ok(ExpenseCategory {
        id: r.get(0)?,
        name: r.get(1)?,
        slug: r.get(2)?,
    })
}

fn profile_from_row(r: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: r.get(0)?,
        email: r.get(1)?,
        display_name: r.get(2)?,
        created_at: r.get(3)?,
        updated_at: r.get(4)?,
    })
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        SqliteStore { conn }
    }

    /// Deployment currency, stamped on new expenses.
    pub fn currency(&self) -> StoreResult<String> {
        let v: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key='currency'",
                [],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
    }

    fn check_refs(&self, session: &Session, draft: &ExpenseDraft) -> StoreResult<()> {
        let car: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM cars WHERE id=?1 AND user_id=?2",
                params![draft.car_id, session.user_id],
                |r| r.get(0),
            )
            .optional()?;
        if car.is_none() {
            return Err(StoreError::UnknownCar(draft.car_id));
        }
        let cat: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM expense_categories WHERE id=?1",
                params![draft.category_id],
                |r| r.get(0),
            )
            .optional()?;
        if cat.is_none() {
            return Err(StoreError::UnknownCategory(draft.category_id));
        }
        Ok(())
    }

    fn select_expenses(
        &self,
        session: &Session,
        car_id: Option<i64>,
        order_by: &str,
    ) -> StoreResult<Vec<ExpenseWithLabels>> {
        let mut sql = format!("{} WHERE e.user_id=?1", EXPENSE_SELECT);
        if car_id.is_some() {
            sql.push_str(" AND e.car_id=?2");
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match car_id {
            Some(car) => stmt
                .query_map(params![session.user_id, car], RawExpense::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map(params![session.user_id], RawExpense::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        let out = rows
            .into_iter()
            .map(RawExpense::check)
            .collect::<StoreResult<Vec<_>>>()?;
        tracing::debug!(user_id = session.user_id, count = out.len(), "fetched expenses");
        Ok(out)
    }
}

impl RecordStore for SqliteStore<'_> {
    fn fetch_user_expenses(&self, session: &Session) -> StoreResult<Vec<ExpenseWithLabels>> {
        self.select_expenses(session, None, "e.id ASC")
    }

    fn list_expenses(
        &self,
        session: &Session,
        car_id: Option<i64>,
    ) -> StoreResult<Vec<ExpenseWithLabels>> {
        self.select_expenses(session, car_id, "e.date DESC, e.id DESC")
    }

    fn expense(&self, session: &Session, id: i64) -> StoreResult<ExpenseWithLabels> {
        let sql = format!("{} WHERE e.id=?1 AND e.user_id=?2", EXPENSE_SELECT);
        let raw = self
            .conn
            .query_row(&sql, params![id, session.user_id], RawExpense::from_row)
            .optional()?
            .ok_or(StoreError::NotFound {
                entity: "Expense",
                id,
            })?;
        raw.check()
    }

    fn insert_expense(&self, session: &Session, draft: &ExpenseDraft) -> StoreResult<i64> {
        self.check_refs(session, draft)?;
        let currency = self.currency()?;
        self.conn.execute(
            "INSERT INTO expenses(user_id, car_id, category_id, amount, currency, date, note, odometer_km)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session.user_id,
                draft.car_id,
                draft.category_id,
                draft.amount.to_string(),
                currency,
                draft.date.to_string(),
                draft.note,
                draft.odometer_km
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(user_id = session.user_id, expense_id = id, "expense recorded");
        Ok(id)
    }

    fn update_expense(
        &self,
        session: &Session,
        id: i64,
        draft: &ExpenseDraft,
    ) -> StoreResult<()> {
        self.check_refs(session, draft)?;
        let n = self.conn.execute(
            "UPDATE expenses SET car_id=?1, category_id=?2, amount=?3, date=?4, note=?5, odometer_km=?6,
             updated_at=datetime('now')
             WHERE id=?7 AND user_id=?8",
            params![
                draft.car_id,
                draft.category_id,
                draft.amount.to_string(),
                draft.date.to_string(),
                draft.note,
                draft.odometer_km,
                id,
                session.user_id
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound {
                entity: "Expense",
                id,
            });
        }
        tracing::info!(user_id = session.user_id, expense_id = id, "expense updated");
        Ok(())
    }

    fn delete_expense(&self, session: &Session, id: i64) -> StoreResult<()> {
        let n = self.conn.execute(
            "DELETE FROM expenses WHERE id=?1 AND user_id=?2",
            params![id, session.user_id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound {
                entity: "Expense",
                id,
            });
        }
        tracing::info!(user_id = session.user_id, expense_id = id, "expense deleted");
        Ok(())
    }

    fn list_cars(&self, session: &Session) -> StoreResult<Vec<Car>> {
        let sql = format!("{} WHERE user_id=?1 ORDER BY created_at DESC, id DESC", CAR_SELECT);
        let mut stmt = self.conn.prepare(&sql)?;
        let cars = stmt
            .query_map(params![session.user_id], car_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cars)
    }

    fn car(&self, session: &Session, id: i64) -> StoreResult<Car> {
        let sql = format!("{} WHERE id=?1 AND user_id=?2", CAR_SELECT);
        self.conn
            .query_row(&sql, params![id, session.user_id], car_from_row)
            .optional()?
            .ok_or(StoreError::NotFound { entity: "Car", id })
    }

    fn car_by_name(&self, session: &Session, name: &str) -> StoreResult<Option<Car>> {
        let sql = format!(
            "{} WHERE user_id=?1 AND name=?2 COLLATE NOCASE ORDER BY id LIMIT 1",
            CAR_SELECT
        );
        Ok(self
            .conn
            .query_row(&sql, params![session.user_id, name.trim()], car_from_row)
            .optional()?)
    }

    fn insert_car(&self, session: &Session, draft: &CarDraft) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO cars(user_id, name, registration_number, brand, model, year)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.user_id,
                draft.name,
                draft.registration_number,
                draft.brand,
                draft.model,
                draft.year
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(user_id = session.user_id, car_id = id, "car added");
        Ok(id)
    }

    fn update_car(&self, session: &Session, id: i64, draft: &CarDraft) -> StoreResult<()> {
        let n = self.conn.execute(
            "UPDATE cars SET name=?1, registration_number=?2, brand=?3, model=?4, year=?5,
             updated_at=datetime('now')
             WHERE id=?6 AND user_id=?7",
            params![
                draft.name,
                draft.registration_number,
                draft.brand,
                draft.model,
                draft.year,
                id,
                session.user_id
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { entity: "Car", id });
        }
        tracing::info!(user_id = session.user_id, car_id = id, "car updated");
        Ok(())
    }

    fn delete_car(&self, session: &Session, id: i64) -> StoreResult<()> {
        let n = self.conn.execute(
            "DELETE FROM cars WHERE id=?1 AND user_id=?2",
            params![id, session.user_id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { entity: "Car", id });
        }
        tracing::info!(user_id = session.user_id, car_id = id, "car deleted");
        Ok(())
    }

    fn count_car_expenses(&self, session: &Session, car_id: i64) -> StoreResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE car_id=?1 AND user_id=?2",
            params![car_id, session.user_id],
            |r| r.get(0),
        )?)
    }

    fn list_categories(&self) -> StoreResult<Vec<ExpenseCategory>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, slug FROM expense_categories ORDER BY name")?;
        let cats = stmt
            .query_map([], category_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cats)
    }

    fn category_by_name_or_slug(&self, name: &str) -> StoreResult<Option<ExpenseCategory>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, slug FROM expense_categories
                 WHERE name=?1 COLLATE NOCASE OR slug=?1 COLLATE NOCASE
                 ORDER BY id LIMIT 1",
                params![name.trim()],
                category_from_row,
            )
            .optional()?)
    }

    fn insert_profile(&self, email: &str, display_name: Option<&str>) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO profiles(email, display_name) VALUES (?1, ?2)",
            params![email.trim(), display_name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, display_name, created_at, updated_at FROM profiles ORDER BY email",
        )?;
        let profiles = stmt
            .query_map([], profile_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(profiles)
    }

    fn profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, email, display_name, created_at, updated_at FROM profiles
                 WHERE email=?1 COLLATE NOCASE",
                params![email.trim()],
                profile_from_row,
            )
            .optional()?)
    }
}
