pub use sea_orm_migration::prelude::*;

mod m20250511_090000_users;
mod m20250511_110000_tags;
mod m20250512_090000_diaries;
mod m20250514_090000_account_books;
mod m20250514_110000_bills;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250511_090000_users::Migration),
            Box::new(m20250511_110000_tags::Migration),
            Box::new(m20250512_090000_diaries::Migration),
            Box::new(m20250514_090000_account_books::Migration),
            Box::new(m20250514_110000_bills::Migration),
        ]
    }
}
