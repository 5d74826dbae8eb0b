pub use account_books::AccountBook;
pub use bills::{Bill, BillKind};
pub use diaries::Diary;
pub use diary_permissions::PermissionLevel;
pub use error::EngineError;
pub use ops::{
    BillListFilter, BillStatistics, BillUpdate, BillWithTags, DiaryDetails, DiaryListFilter,
    DiaryUpdate, Engine, EngineBuilder, GroupBucket, GroupBy, NewBill, NewDiary,
    UserProfileUpdate,
};
pub use tags::{Tag, TagCategory};
pub use users::User;

mod account_book_users;
mod account_books;
mod bill_tags;
mod bills;
mod diaries;
mod diary_images;
mod diary_likes;
mod diary_permissions;
mod diary_tags;
mod diary_users;
mod diary_videos;
mod error;
mod ops;
mod tags;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
