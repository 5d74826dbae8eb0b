use sea_orm_migration::prelude::*;

use crate::m20250511_090000_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum AccountBooks {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AccountBookUsers {
    Table,
    Seq,
    AccountBookId,
    UserId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountBooks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountBooks::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccountBooks::Name).string().not_null())
                    .col(
                        ColumnDef::new(AccountBooks::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountBooks::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountBookUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountBookUsers::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AccountBookUsers::AccountBookId)
                            .blob()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccountBookUsers::UserId).blob().not_null())
                    .col(
                        ColumnDef::new(AccountBookUsers::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-account_book_users-account_book_id")
                            .from(AccountBookUsers::Table, AccountBookUsers::AccountBookId)
                            .to(AccountBooks::Table, AccountBooks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-account_book_users-user_id")
                            .from(AccountBookUsers::Table, AccountBookUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-account_book_users-account_book_id-user_id-unique")
                    .table(AccountBookUsers::Table)
                    .col(AccountBookUsers::AccountBookId)
                    .col(AccountBookUsers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-account_book_users-user_id")
                    .table(AccountBookUsers::Table)
                    .col(AccountBookUsers::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountBookUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountBooks::Table).to_owned())
            .await?;
        Ok(())
    }
}
