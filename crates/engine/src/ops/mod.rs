use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod bills;
mod diaries;
mod ledgers;
mod likes;
mod stats;
mod tags;
mod users;

pub use bills::{BillListFilter, BillUpdate, BillWithTags, NewBill};
pub use diaries::{DiaryDetails, DiaryListFilter, DiaryUpdate, NewDiary};
pub use stats::{BillStatistics, GroupBucket, GroupBy};
pub use users::UserProfileUpdate;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

/// Normalizes 1-indexed pagination inputs: page defaults to 1 when unset or
/// non-positive, page size defaults to 10 and is clamped to `[1, 100]`.
fn clamp_pagination(page: Option<i64>, page_size: Option<i64>) -> (u64, u64) {
    let page = match page {
        Some(page) if page > 0 => page as u64,
        _ => 1,
    };
    let page_size = match page_size {
        None => DEFAULT_PAGE_SIZE,
        Some(size) if size < 1 => 1,
        Some(size) if size as u64 > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        Some(size) => size as u64,
    };
    (page, page_size)
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidArgument(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Drops duplicate ids while keeping first-seen order.
fn dedup_ids(ids: &[uuid::Uuid]) -> Vec<uuid::Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        assert_eq!(clamp_pagination(None, None), (1, 10));
    }

    #[test]
    fn pagination_clamps_page() {
        assert_eq!(clamp_pagination(Some(0), None), (1, 10));
        assert_eq!(clamp_pagination(Some(-3), None), (1, 10));
        assert_eq!(clamp_pagination(Some(7), None), (7, 10));
    }

    #[test]
    fn pagination_clamps_page_size() {
        assert_eq!(clamp_pagination(None, Some(0)), (1, 1));
        assert_eq!(clamp_pagination(None, Some(250)), (1, 100));
        assert_eq!(clamp_pagination(None, Some(25)), (1, 25));
    }

    #[test]
    fn required_text_is_trimmed() {
        assert_eq!(
            normalize_required_text("  Groceries ", "tag name").unwrap(),
            "Groceries"
        );
        assert!(normalize_required_text("   ", "tag name").is_err());
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let a = uuid::Uuid::new_v4();
        let b = uuid::Uuid::new_v4();
        assert_eq!(dedup_ids(&[a, b, a, b, a]), vec![a, b]);
    }

    #[test]
    fn optional_text_drops_blanks() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" x ")),
            Some("x".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }
}
