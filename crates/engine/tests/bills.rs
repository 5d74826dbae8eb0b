use chrono::{TimeZone, Utc};
use engine::{BillKind, BillListFilter, BillUpdate, EngineError, NewBill};
use uuid::Uuid;

mod common;

use common::{engine_with_db, login};

fn expense(amount_minor: i64, remark: &str, tag_ids: Vec<Uuid>) -> NewBill {
    NewBill {
        amount_minor,
        kind: "expense".to_string(),
        remark: remark.to_string(),
        image_url: None,
        occurred_at: None,
        tag_ids,
    }
}

#[tokio::test]
async fn tag_sets_round_trip_and_updates_replace_them() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let t1 = engine.create_tag("food", "meals", "bill").await.unwrap();
    let t2 = engine.create_tag("family", "people", "bill").await.unwrap();
    let t3 = engine.create_tag("rent", "housing", "bill").await.unwrap();

    let book = engine.create_account_book(alice, "Home").await.unwrap();
    let bill = engine
        .create_bill(book.id, alice, expense(2500, "dinner", vec![t1.id, t2.id]))
        .await
        .unwrap();

    let read = engine.bill_with_tags(bill.id, alice).await.unwrap();
    let mut ids: Vec<Uuid> = read.tags.iter().map(|tag| tag.id).collect();
    ids.sort();
    let mut expected = vec![t1.id, t2.id];
    expected.sort();
    assert_eq!(ids, expected);

    // The update's tag set is the source of truth: old links fully detach.
    engine
        .update_bill(
            bill.id,
            alice,
            BillUpdate {
                amount_minor: 90000,
                kind: "expense".to_string(),
                remark: "rent".to_string(),
                image_url: None,
                occurred_at: None,
                tag_ids: vec![t3.id],
            },
        )
        .await
        .unwrap();

    let read = engine.bill_with_tags(bill.id, alice).await.unwrap();
    assert_eq!(read.bill.amount_minor, 90000);
    assert_eq!(read.tags.len(), 1);
    assert_eq!(read.tags[0].id, t3.id);
}

#[tokio::test]
async fn update_never_touches_the_ledger_linkage() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;
    let bob = login(&engine, "bob").await;

    let book = engine.create_account_book(alice, "Home").await.unwrap();
    engine
        .grant_ledger_access(book.id, alice, bob)
        .await
        .unwrap();

    let bill = engine
        .create_bill(book.id, alice, expense(1000, "coffee", Vec::new()))
        .await
        .unwrap();

    let updated = engine
        .update_bill(
            bill.id,
            bob,
            BillUpdate {
                amount_minor: 1200,
                kind: "expense".to_string(),
                remark: "coffee and cake".to_string(),
                image_url: None,
                occurred_at: None,
                tag_ids: Vec::new(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.account_book_id, book.id);
    assert_eq!(updated.user_id, alice);
    assert_eq!(updated.occurred_at, bill.occurred_at);
}

#[tokio::test]
async fn amounts_must_be_positive() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let book = engine.create_account_book(alice, "Home").await.unwrap();

    let err = engine
        .create_bill(book.id, alice, expense(0, "nothing", Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));

    let err = engine
        .create_bill(book.id, alice, expense(-5, "negative", Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn bills_are_gated_on_the_ledger_association() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;
    let bob = login(&engine, "bob").await;

    let book = engine.create_account_book(alice, "Home").await.unwrap();

    let err = engine
        .create_bill(book.id, bob, expense(1000, "sneaky", Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let bill = engine
        .create_bill(book.id, alice, expense(1000, "mine", Vec::new()))
        .await
        .unwrap();

    let err = engine.bill_with_tags(bill.id, bob).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine
        .grant_ledger_access(book.id, alice, bob)
        .await
        .unwrap();
    assert!(engine.bill_with_tags(bill.id, bob).await.is_ok());
}

#[tokio::test]
async fn tag_filter_requires_every_listed_tag() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let t1 = engine.create_tag("food", "meals", "bill").await.unwrap();
    let t2 = engine.create_tag("family", "people", "bill").await.unwrap();

    let book = engine.create_account_book(alice, "Home").await.unwrap();
    let both = engine
        .create_bill(book.id, alice, expense(3000, "family dinner", vec![t1.id, t2.id]))
        .await
        .unwrap();
    engine
        .create_bill(book.id, alice, expense(800, "solo lunch", vec![t1.id]))
        .await
        .unwrap();

    let (bills, total) = engine
        .list_bills(
            book.id,
            alice,
            BillListFilter {
                tag_ids: vec![t1.id, t2.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(bills[0].bill.id, both.id);

    // A single tag matches both bills.
    let (_, total) = engine
        .list_bills(
            book.id,
            alice,
            BillListFilter {
                tag_ids: vec![t1.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn filters_combine_conjunctively() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let book = engine.create_account_book(alice, "Home").await.unwrap();

    let march = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let april = Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();

    engine
        .create_bill(
            book.id,
            alice,
            NewBill {
                occurred_at: Some(march),
                ..expense(5000, "march groceries", Vec::new())
            },
        )
        .await
        .unwrap();
    engine
        .create_bill(
            book.id,
            alice,
            NewBill {
                occurred_at: Some(april),
                ..expense(200, "april snack", Vec::new())
            },
        )
        .await
        .unwrap();
    engine
        .create_bill(
            book.id,
            alice,
            NewBill {
                amount_minor: 300000,
                kind: "income".to_string(),
                remark: "salary".to_string(),
                image_url: None,
                occurred_at: Some(april),
                tag_ids: Vec::new(),
            },
        )
        .await
        .unwrap();

    let (bills, total) = engine
        .list_bills(
            book.id,
            alice,
            BillListFilter {
                kind: Some("expense".to_string()),
                start_time: Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(bills[0].bill.remark, "april snack");

    let (bills, total) = engine
        .list_bills(
            book.id,
            alice,
            BillListFilter {
                keyword: Some("groceries".to_string()),
                min_amount_minor: Some(1000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(bills[0].bill.kind, BillKind::Expense);
    assert_eq!(bills[0].bill.amount_minor, 5000);

    // The window bounds are inclusive.
    let (_, total) = engine
        .list_bills(
            book.id,
            alice,
            BillListFilter {
                start_time: Some(march),
                end_time: Some(march),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(total, 1);

    let err = engine
        .list_bills(
            book.id,
            alice,
            BillListFilter {
                kind: Some("transfer".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn pagination_is_one_indexed_and_clamped() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let book = engine.create_account_book(alice, "Home").await.unwrap();
    for i in 0..12 {
        engine
            .create_bill(book.id, alice, expense(100 + i, &format!("bill {i}"), Vec::new()))
            .await
            .unwrap();
    }

    // Default page size is 10.
    let (bills, total) = engine
        .list_bills(book.id, alice, BillListFilter::default())
        .await
        .unwrap();
    assert_eq!(total, 12);
    assert_eq!(bills.len(), 10);

    let (bills, _) = engine
        .list_bills(
            book.id,
            alice,
            BillListFilter {
                page: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(bills.len(), 2);

    // Page zero falls back to the first page; oversized pages clamp to 100.
    let (bills, _) = engine
        .list_bills(
            book.id,
            alice,
            BillListFilter {
                page: Some(0),
                page_size: Some(1000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(bills.len(), 12);
}
