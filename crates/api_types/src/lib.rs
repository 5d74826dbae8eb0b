use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Public profile of a user.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub user_name: String,
        pub avatar: Option<String>,
        pub email: Option<String>,
    }

    /// Request body for updating the caller's profile. `None` fields are
    /// left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub user_name: Option<String>,
        pub avatar: Option<String>,
        pub email: Option<String>,
    }
}

pub mod diary {
    use super::*;

    /// Visibility level of a diary.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PermissionLevel {
        Private,
        Public,
        SharedRead,
        SharedEdit,
    }

    impl PermissionLevel {
        /// Returns the canonical level string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Private => "private",
                Self::Public => "public",
                Self::SharedRead => "shared_read",
                Self::SharedEdit => "shared_edit",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DiaryNew {
        pub title: String,
        pub content: String,
        pub address: Option<String>,
        pub level: PermissionLevel,
        #[serde(default)]
        pub tag_ids: Vec<Uuid>,
        #[serde(default)]
        pub image_urls: Vec<String>,
        #[serde(default)]
        pub video_urls: Vec<String>,
    }

    /// Partial update; omitted fields are left untouched, submitted sets
    /// replace the stored sets.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DiaryUpdate {
        pub title: Option<String>,
        pub content: Option<String>,
        pub address: Option<String>,
        pub level: Option<PermissionLevel>,
        pub tag_ids: Option<Vec<Uuid>>,
        pub image_urls: Option<Vec<String>>,
        pub video_urls: Option<Vec<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DiaryView {
        pub id: Uuid,
        pub title: String,
        pub content: String,
        pub address: Option<String>,
        pub pageview: i64,
        pub like_count: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DiaryDetailsResponse {
        pub diary: DiaryView,
        pub tags: Vec<super::tag::TagView>,
        pub level: PermissionLevel,
        pub image_urls: Vec<String>,
        pub video_urls: Vec<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DiaryList {
        pub page: Option<i64>,
        pub page_size: Option<i64>,
        pub keyword: Option<String>,
        #[serde(default)]
        pub tag_ids: Vec<Uuid>,
        pub level: Option<PermissionLevel>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DiaryListResponse {
        pub diaries: Vec<DiaryView>,
        pub total: u64,
    }

    /// Request body for sharing a diary with another user.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DiaryShare {
        pub user_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LikedResponse {
        pub liked: bool,
    }
}

pub mod tag {
    use super::*;

    /// Partition of the tag namespace; a tag belongs to exactly one.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TagCategory {
        Bill,
        Diary,
    }

    impl TagCategory {
        /// Returns the canonical category string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Bill => "bill",
                Self::Diary => "diary",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagNew {
        pub name: String,
        pub kind: String,
        pub category: TagCategory,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagUpdate {
        pub name: String,
        pub kind: String,
        pub category: TagCategory,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagView {
        pub id: Uuid,
        pub name: String,
        pub kind: String,
        pub category: TagCategory,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TagList {
        pub category: Option<TagCategory>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagsResponse {
        pub tags: Vec<TagView>,
    }
}

pub mod account_book {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountBookNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountBookRename {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountBookView {
        pub id: Uuid,
        pub name: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountBooksResponse {
        pub account_books: Vec<AccountBookView>,
    }

    /// Request body for granting a user access to an account book.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccessGrant {
        pub user_id: Uuid,
    }

    /// Response body for listing a book's users, administrator first.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookUsersResponse {
        pub users: Vec<super::user::UserView>,
    }

    /// Informational response for benign sharing outcomes.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GrantResponse {
        pub granted: bool,
        pub notice: Option<String>,
    }
}

pub mod bill {
    use super::*;

    /// Income or expense; amounts are stored positive with this
    /// discriminator.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BillKind {
        Income,
        Expense,
    }

    impl BillKind {
        /// Returns the canonical kind string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillNew {
        pub amount_minor: i64,
        pub kind: BillKind,
        #[serde(default)]
        pub remark: String,
        pub image_url: Option<String>,
        pub occurred_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub tag_ids: Vec<Uuid>,
    }

    /// Full set of mutable columns; the submitted tag set replaces the
    /// stored one.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillUpdate {
        pub amount_minor: i64,
        pub kind: BillKind,
        #[serde(default)]
        pub remark: String,
        pub image_url: Option<String>,
        pub occurred_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub tag_ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillView {
        pub id: Uuid,
        pub account_book_id: Uuid,
        pub user_id: Uuid,
        pub amount_minor: i64,
        pub kind: BillKind,
        pub remark: String,
        pub image_url: Option<String>,
        pub occurred_at: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillWithTagsView {
        pub bill: BillView,
        pub tags: Vec<super::tag::TagView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BillList {
        pub page: Option<i64>,
        pub page_size: Option<i64>,
        pub kind: Option<BillKind>,
        #[serde(default)]
        pub tag_ids: Vec<Uuid>,
        pub start_time: Option<DateTime<Utc>>,
        pub end_time: Option<DateTime<Utc>>,
        pub min_amount_minor: Option<i64>,
        pub max_amount_minor: Option<i64>,
        pub keyword: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillListResponse {
        pub bills: Vec<BillWithTagsView>,
        pub total: u64,
    }
}

pub mod stats {
    use std::collections::HashMap;

    use super::*;

    /// Query for bill statistics.
    ///
    /// `group_by` stays a free string on the wire: an unrecognized value
    /// yields no bucketed breakdown rather than a binding error.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatisticQuery {
        pub start_time: Option<DateTime<Utc>>,
        pub end_time: Option<DateTime<Utc>>,
        pub group_by: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupBucketView {
        pub key: String,
        pub income_minor: i64,
        pub expense_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub net_minor: i64,
        pub tag_stats: HashMap<String, i64>,
        pub group_stats: Vec<GroupBucketView>,
    }
}
