use sea_orm_migration::prelude::*;

use crate::{
    m20250511_090000_users::Users, m20250511_110000_tags::Tags,
    m20250514_090000_account_books::AccountBooks,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Bills {
    Table,
    Id,
    AccountBookId,
    UserId,
    AmountMinor,
    Kind,
    Remark,
    ImageUrl,
    OccurredAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BillTags {
    Table,
    BillId,
    TagId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bills::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Bills::AccountBookId).blob().not_null())
                    .col(ColumnDef::new(Bills::UserId).blob().not_null())
                    .col(ColumnDef::new(Bills::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Bills::Kind).string().not_null())
                    .col(ColumnDef::new(Bills::Remark).string().not_null())
                    .col(ColumnDef::new(Bills::ImageUrl).string())
                    .col(ColumnDef::new(Bills::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(Bills::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Bills::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bills-account_book_id")
                            .from(Bills::Table, Bills::AccountBookId)
                            .to(AccountBooks::Table, AccountBooks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bills-user_id")
                            .from(Bills::Table, Bills::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bills-account_book_id-occurred_at")
                    .table(Bills::Table)
                    .col(Bills::AccountBookId)
                    .col(Bills::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BillTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BillTags::BillId).blob().not_null())
                    .col(ColumnDef::new(BillTags::TagId).blob().not_null())
                    .primary_key(Index::create().col(BillTags::BillId).col(BillTags::TagId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bill_tags-bill_id")
                            .from(BillTags::Table, BillTags::BillId)
                            .to(Bills::Table, Bills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bill_tags-tag_id")
                            .from(BillTags::Table, BillTags::TagId)
                            .to(Tags::Table, Tags::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bill_tags-tag_id")
                    .table(BillTags::Table)
                    .col(BillTags::TagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BillTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bills::Table).to_owned())
            .await?;
        Ok(())
    }
}
