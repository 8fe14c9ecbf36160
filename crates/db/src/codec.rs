//! Conversions between domain values and stored column values.

use chrono::{DateTime, FixedOffset, Utc};
use hrm_shared::types::money::to_minor_units;
use rust_decimal::Decimal;
use sea_orm::{DbErr, SqlErr};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// A stored row that no longer decodes into its domain type.
#[derive(Debug, thiserror::Error)]
#[error("Corrupt {table} row {id}: {reason}")]
pub struct CorruptRow {
    /// Table name.
    pub table: &'static str,
    /// Row primary key.
    pub id: Uuid,
    /// What failed to decode.
    pub reason: String,
}

/// Decodes the columns of one row, tagging failures with the row identity.
pub(crate) struct RowDecoder {
    table: &'static str,
    id: Uuid,
}

impl RowDecoder {
    pub(crate) const fn new(table: &'static str, id: Uuid) -> Self {
        Self { table, id }
    }

    pub(crate) fn corrupt(&self, reason: impl Into<String>) -> CorruptRow {
        CorruptRow {
            table: self.table,
            id: self.id,
            reason: reason.into(),
        }
    }

    pub(crate) fn json<T: DeserializeOwned>(
        &self,
        field: &str,
        value: serde_json::Value,
    ) -> Result<T, CorruptRow> {
        serde_json::from_value(value).map_err(|e| self.corrupt(format!("{field}: {e}")))
    }

    pub(crate) fn parse<T>(
        &self,
        field: &str,
        value: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, CorruptRow> {
        parse(value).ok_or_else(|| self.corrupt(format!("{field}: unknown value '{value}'")))
    }

    pub(crate) fn decimal(&self, field: &str, value: &str) -> Result<Decimal, CorruptRow> {
        value
            .parse()
            .map_err(|e| self.corrupt(format!("{field}: {e}")))
    }

    pub(crate) fn progress(&self, value: i16) -> Result<u8, CorruptRow> {
        u8::try_from(value)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| self.corrupt(format!("progress: {value} out of range")))
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, DbErr> {
    serde_json::to_value(value).map_err(|e| DbErr::Json(e.to_string()))
}

pub(crate) fn to_minor(amount: Decimal) -> Result<i64, DbErr> {
    to_minor_units(amount).ok_or_else(|| DbErr::Custom(format!("amount {amount} out of range")))
}

pub(crate) fn stamp(time: DateTime<Utc>) -> DateTime<FixedOffset> {
    time.fixed_offset()
}

pub(crate) fn utc(time: DateTime<FixedOffset>) -> DateTime<Utc> {
    time.with_timezone(&Utc)
}

/// Returns true if the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
