use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::{
    DatabaseTransaction, DbBackend, Statement, TransactionTrait, Value, prelude::*,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{BillKind, EngineError, ResultEngine};

use super::{Engine, with_tx};

/// Calendar granularity for bucketed bill statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Day,
    Week,
    Month,
    Year,
}

impl GroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// SQLite `strftime` pattern producing the bucket key.
    fn strftime_format(self) -> &'static str {
        match self {
            Self::Day => "%Y-%m-%d",
            Self::Week => "%Y-W%W",
            Self::Month => "%Y-%m",
            Self::Year => "%Y",
        }
    }
}

impl TryFrom<&str> for GroupBy {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(EngineError::InvalidArgument(format!(
                "invalid group_by: {other}"
            ))),
        }
    }
}

/// One calendar bucket of the grouped breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupBucket {
    pub key: String,
    pub income_minor: i64,
    pub expense_minor: i64,
    pub net_minor: i64,
}

/// Income/expense rollup over an account book's bills.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BillStatistics {
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
    pub net_minor: i64,
    /// Per-(tag, kind) sums keyed `"<name>(income)"` / `"<name>(expense)"`;
    /// the two sides of the same tag are never merged.
    pub tag_stats: HashMap<String, i64>,
    /// Bucketed breakdown, sorted by key; empty when no grouping was
    /// requested.
    pub group_stats: Vec<GroupBucket>,
}

impl Engine {
    /// Computes bill statistics over an optional inclusive date window.
    ///
    /// `group_by` accepts day/week/month/year; an absent or unrecognized
    /// value yields no bucketed breakdown rather than an error.
    pub async fn bill_statistics(
        &self,
        book_id: Uuid,
        user_id: Uuid,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        group_by: Option<&str>,
    ) -> ResultEngine<BillStatistics> {
        let group_by = group_by.and_then(|value| GroupBy::try_from(value).ok());

        with_tx!(self, |db_tx| {
            self.require_account_book_exists(&db_tx, book_id).await?;
            self.require_ledger_access(&db_tx, book_id, user_id).await?;

            let backend = self.database.get_database_backend();

            let total_income_minor = self
                .sum_bills(&db_tx, backend, book_id, BillKind::Income, start_time, end_time)
                .await?;
            let total_expense_minor = self
                .sum_bills(&db_tx, backend, book_id, BillKind::Expense, start_time, end_time)
                .await?;

            let tag_stats = self
                .sum_bills_by_tag(&db_tx, backend, book_id, start_time, end_time)
                .await?;

            let group_stats = match group_by {
                Some(group_by) => {
                    self.bucketed_sums(&db_tx, backend, book_id, group_by, start_time, end_time)
                        .await?
                }
                None => Vec::new(),
            };

            Ok(BillStatistics {
                total_income_minor,
                total_expense_minor,
                net_minor: total_income_minor - total_expense_minor,
                tag_stats,
                group_stats,
            })
        })
    }

    async fn sum_bills(
        &self,
        db: &DatabaseTransaction,
        backend: DbBackend,
        book_id: Uuid,
        kind: BillKind,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> ResultEngine<i64> {
        let mut sql = String::from(
            "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
             FROM bills \
             WHERE account_book_id = ? AND kind = ?",
        );
        let mut values: Vec<Value> = vec![book_id.into(), kind.as_str().into()];
        push_window(&mut sql, &mut values, "occurred_at", start_time, end_time);

        let stmt = Statement::from_sql_and_values(backend, sql, values);
        let row = db.query_one(stmt).await?;
        Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
    }

    async fn sum_bills_by_tag(
        &self,
        db: &DatabaseTransaction,
        backend: DbBackend,
        book_id: Uuid,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> ResultEngine<HashMap<String, i64>> {
        let mut sql = String::from(
            "SELECT tags.name AS name, bills.kind AS kind, \
             COALESCE(SUM(bills.amount_minor), 0) AS sum \
             FROM bills \
             JOIN bill_tags ON bill_tags.bill_id = bills.id \
             JOIN tags ON tags.id = bill_tags.tag_id \
             WHERE bills.account_book_id = ?",
        );
        let mut values: Vec<Value> = vec![book_id.into()];
        push_window(&mut sql, &mut values, "bills.occurred_at", start_time, end_time);
        sql.push_str(" GROUP BY tags.id, tags.name, bills.kind");

        let stmt = Statement::from_sql_and_values(backend, sql, values);
        let rows = db.query_all(stmt).await?;

        let mut out = HashMap::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("", "name")?;
            let kind: String = row.try_get("", "kind")?;
            let sum: i64 = row.try_get("", "sum")?;
            out.insert(format!("{name}({kind})"), sum);
        }
        Ok(out)
    }

    async fn bucketed_sums(
        &self,
        db: &DatabaseTransaction,
        backend: DbBackend,
        book_id: Uuid,
        group_by: GroupBy,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> ResultEngine<Vec<GroupBucket>> {
        let income = self
            .sum_bills_grouped(db, backend, book_id, BillKind::Income, group_by, start_time, end_time)
            .await?;
        let expense = self
            .sum_bills_grouped(db, backend, book_id, BillKind::Expense, group_by, start_time, end_time)
            .await?;

        // Union the bucket keys: a bucket with only one side still reports
        // the other as zero, never omitted.
        let mut buckets: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for (key, amount) in income {
            buckets.entry(key).or_default().0 = amount;
        }
        for (key, amount) in expense {
            buckets.entry(key).or_default().1 = amount;
        }

        Ok(buckets
            .into_iter()
            .map(|(key, (income_minor, expense_minor))| GroupBucket {
                key,
                income_minor,
                expense_minor,
                net_minor: income_minor - expense_minor,
            })
            .collect())
    }

    async fn sum_bills_grouped(
        &self,
        db: &DatabaseTransaction,
        backend: DbBackend,
        book_id: Uuid,
        kind: BillKind,
        group_by: GroupBy,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> ResultEngine<Vec<(String, i64)>> {
        let mut sql = format!(
            "SELECT strftime('{format}', occurred_at) AS group_key, \
             COALESCE(SUM(amount_minor), 0) AS sum \
             FROM bills \
             WHERE account_book_id = ? AND kind = ?",
            format = group_by.strftime_format()
        );
        let mut values: Vec<Value> = vec![book_id.into(), kind.as_str().into()];
        push_window(&mut sql, &mut values, "occurred_at", start_time, end_time);
        sql.push_str(" GROUP BY group_key");

        let stmt = Statement::from_sql_and_values(backend, sql, values);
        let rows = db.query_all(stmt).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("", "group_key")?;
            let sum: i64 = row.try_get("", "sum")?;
            out.push((key, sum));
        }
        Ok(out)
    }
}

fn push_window(
    sql: &mut String,
    values: &mut Vec<Value>,
    column: &str,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
) {
    if let Some(start) = start_time {
        sql.push_str(&format!(" AND {column} >= ?"));
        values.push(start.into());
    }
    if let Some(end) = end_time {
        sql.push_str(&format!(" AND {column} <= ?"));
        values.push(end.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_by_round_trips() {
        for group_by in [GroupBy::Day, GroupBy::Week, GroupBy::Month, GroupBy::Year] {
            assert_eq!(GroupBy::try_from(group_by.as_str()).unwrap(), group_by);
        }
    }

    #[test]
    fn unknown_group_by_is_rejected() {
        assert!(GroupBy::try_from("quarter").is_err());
    }
}
