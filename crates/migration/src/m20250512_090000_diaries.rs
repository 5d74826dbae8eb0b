//! Diary schema: the entry table plus its dependent rows.
//!
//! - `diaries`: the entries with their denormalized counters
//! - `diary_users`: association rows; the minimum `seq` row is the creator
//! - `diary_permissions`: one visibility level per diary
//! - `diary_tags`: tag links
//! - `diary_images` / `diary_videos`: attached media
//! - `diary_likes`: one row per (diary, user) like

use sea_orm_migration::prelude::*;

use crate::{m20250511_090000_users::Users, m20250511_110000_tags::Tags};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Diaries {
    Table,
    Id,
    Title,
    Content,
    Address,
    Pageview,
    LikeCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DiaryUsers {
    Table,
    Seq,
    DiaryId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum DiaryPermissions {
    Table,
    DiaryId,
    Level,
}

#[derive(Iden)]
enum DiaryTags {
    Table,
    DiaryId,
    TagId,
}

#[derive(Iden)]
enum DiaryImages {
    Table,
    Id,
    DiaryId,
    ImageUrl,
}

#[derive(Iden)]
enum DiaryVideos {
    Table,
    Id,
    DiaryId,
    VideoUrl,
}

#[derive(Iden)]
enum DiaryLikes {
    Table,
    DiaryId,
    UserId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Diaries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Diaries::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Diaries::Title).string().not_null())
                    .col(ColumnDef::new(Diaries::Content).text().not_null())
                    .col(ColumnDef::new(Diaries::Address).string())
                    .col(
                        ColumnDef::new(Diaries::Pageview)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Diaries::LikeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Diaries::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Diaries::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiaryUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiaryUsers::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DiaryUsers::DiaryId).blob().not_null())
                    .col(ColumnDef::new(DiaryUsers::UserId).blob().not_null())
                    .col(ColumnDef::new(DiaryUsers::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diary_users-diary_id")
                            .from(DiaryUsers::Table, DiaryUsers::DiaryId)
                            .to(Diaries::Table, Diaries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diary_users-user_id")
                            .from(DiaryUsers::Table, DiaryUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-diary_users-diary_id-user_id-unique")
                    .table(DiaryUsers::Table)
                    .col(DiaryUsers::DiaryId)
                    .col(DiaryUsers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-diary_users-user_id")
                    .table(DiaryUsers::Table)
                    .col(DiaryUsers::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiaryPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiaryPermissions::DiaryId)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DiaryPermissions::Level).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diary_permissions-diary_id")
                            .from(DiaryPermissions::Table, DiaryPermissions::DiaryId)
                            .to(Diaries::Table, Diaries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiaryTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DiaryTags::DiaryId).blob().not_null())
                    .col(ColumnDef::new(DiaryTags::TagId).blob().not_null())
                    .primary_key(
                        Index::create()
                            .col(DiaryTags::DiaryId)
                            .col(DiaryTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diary_tags-diary_id")
                            .from(DiaryTags::Table, DiaryTags::DiaryId)
                            .to(Diaries::Table, Diaries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diary_tags-tag_id")
                            .from(DiaryTags::Table, DiaryTags::TagId)
                            .to(Tags::Table, Tags::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiaryImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiaryImages::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DiaryImages::DiaryId).blob().not_null())
                    .col(ColumnDef::new(DiaryImages::ImageUrl).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diary_images-diary_id")
                            .from(DiaryImages::Table, DiaryImages::DiaryId)
                            .to(Diaries::Table, Diaries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiaryVideos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiaryVideos::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DiaryVideos::DiaryId).blob().not_null())
                    .col(ColumnDef::new(DiaryVideos::VideoUrl).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diary_videos-diary_id")
                            .from(DiaryVideos::Table, DiaryVideos::DiaryId)
                            .to(Diaries::Table, Diaries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiaryLikes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DiaryLikes::DiaryId).blob().not_null())
                    .col(ColumnDef::new(DiaryLikes::UserId).blob().not_null())
                    .col(ColumnDef::new(DiaryLikes::CreatedAt).timestamp().not_null())
                    .primary_key(
                        Index::create()
                            .col(DiaryLikes::DiaryId)
                            .col(DiaryLikes::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diary_likes-diary_id")
                            .from(DiaryLikes::Table, DiaryLikes::DiaryId)
                            .to(Diaries::Table, Diaries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diary_likes-user_id")
                            .from(DiaryLikes::Table, DiaryLikes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiaryLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiaryVideos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiaryImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiaryTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiaryPermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiaryUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Diaries::Table).to_owned())
            .await?;
        Ok(())
    }
}
