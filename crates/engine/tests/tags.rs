use engine::{EngineError, NewBill, NewDiary, TagCategory};

mod common;

use common::{engine_with_db, login};

#[tokio::test]
async fn names_are_unique_per_category() {
    let engine = engine_with_db().await;

    engine.create_tag("food", "meals", "bill").await.unwrap();

    let err = engine
        .create_tag("food", "restaurants", "bill")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Same name in the other category is a different tag.
    engine.create_tag("food", "meals", "diary").await.unwrap();
}

#[tokio::test]
async fn unknown_categories_are_rejected() {
    let engine = engine_with_db().await;

    let err = engine
        .create_tag("food", "meals", "ledger")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));

    let err = engine.list_tags(Some("ledger")).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn listing_filters_by_category() {
    let engine = engine_with_db().await;

    engine.create_tag("food", "meals", "bill").await.unwrap();
    engine.create_tag("travel", "leisure", "diary").await.unwrap();

    let all = engine.list_tags(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let bill_tags = engine.list_tags(Some("bill")).await.unwrap();
    assert_eq!(bill_tags.len(), 1);
    assert_eq!(bill_tags[0].category, TagCategory::Bill);
}

#[tokio::test]
async fn update_rejects_collisions_with_other_tags() {
    let engine = engine_with_db().await;

    let food = engine.create_tag("food", "meals", "bill").await.unwrap();
    engine.create_tag("rent", "housing", "bill").await.unwrap();

    let err = engine
        .update_tag(food.id, "rent", "meals", "bill")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Re-submitting its own name is not a collision.
    let updated = engine
        .update_tag(food.id, "food", "dining", "bill")
        .await
        .unwrap();
    assert_eq!(updated.kind, "dining");

    let err = engine
        .update_tag(uuid::Uuid::new_v4(), "x", "y", "bill")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn deletion_is_blocked_while_referenced() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let tag = engine.create_tag("food", "meals", "bill").await.unwrap();
    let book = engine.create_account_book(alice, "Home").await.unwrap();
    let bill = engine
        .create_bill(
            book.id,
            alice,
            NewBill {
                amount_minor: 4000,
                kind: "expense".to_string(),
                remark: "dinner".to_string(),
                image_url: None,
                occurred_at: None,
                tag_ids: vec![tag.id],
            },
        )
        .await
        .unwrap();

    let err = engine.delete_tag(tag.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Detach by deleting the referencing bill, then deletion goes through.
    engine.delete_bill(bill.id, alice).await.unwrap();
    engine.delete_tag(tag.id).await.unwrap();

    let err = engine.delete_tag(tag.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn diary_references_also_block_deletion() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let tag = engine.create_tag("travel", "leisure", "diary").await.unwrap();
    engine
        .create_diary(
            alice,
            NewDiary {
                title: "Rome".to_string(),
                content: "Forum".to_string(),
                address: None,
                level: "private".to_string(),
                tag_ids: vec![tag.id],
                image_urls: Vec::new(),
                video_urls: Vec::new(),
            },
        )
        .await
        .unwrap();

    let err = engine.delete_tag(tag.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}
