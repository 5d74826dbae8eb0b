use engine::{DiaryListFilter, DiaryUpdate, EngineError, NewDiary, PermissionLevel};

mod common;

use common::{engine_with_db, login};

fn new_diary(title: &str, level: &str) -> NewDiary {
    NewDiary {
        title: title.to_string(),
        content: format!("{title} content"),
        address: None,
        level: level.to_string(),
        tag_ids: Vec::new(),
        image_urls: Vec::new(),
        video_urls: Vec::new(),
    }
}

#[tokio::test]
async fn create_diary_returns_details_with_media_and_tags() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let tag = engine.create_tag("travel", "leisure", "diary").await.unwrap();

    let diary = engine
        .create_diary(
            alice,
            NewDiary {
                title: "Lisbon".to_string(),
                content: "Tram 28 and pastel de nata".to_string(),
                address: Some("Lisbon".to_string()),
                level: "private".to_string(),
                tag_ids: vec![tag.id],
                image_urls: vec!["https://img.example/1.jpg".to_string()],
                video_urls: vec!["https://vid.example/1.mp4".to_string()],
            },
        )
        .await
        .unwrap();

    let details = engine.diary_details(diary.id, alice).await.unwrap();
    assert_eq!(details.diary.title, "Lisbon");
    assert_eq!(details.level, PermissionLevel::Private);
    assert_eq!(details.tags.len(), 1);
    assert_eq!(details.tags[0].name, "travel");
    assert_eq!(details.image_urls, vec!["https://img.example/1.jpg"]);
    assert_eq!(details.video_urls, vec!["https://vid.example/1.mp4"]);
}

#[tokio::test]
async fn detail_reads_increment_pageview_every_time() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let diary = engine
        .create_diary(alice, new_diary("Views", "private"))
        .await
        .unwrap();
    assert_eq!(diary.pageview, 0);

    let first = engine.diary_details(diary.id, alice).await.unwrap();
    assert_eq!(first.diary.pageview, 1);

    let second = engine.diary_details(diary.id, alice).await.unwrap();
    assert_eq!(second.diary.pageview, 2);
}

#[tokio::test]
async fn public_diaries_are_readable_by_anyone_private_are_not() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;
    let stranger = login(&engine, "stranger").await;

    let open = engine
        .create_diary(alice, new_diary("Open", "public"))
        .await
        .unwrap();
    let hidden = engine
        .create_diary(alice, new_diary("Hidden", "private"))
        .await
        .unwrap();

    assert!(engine.diary_details(open.id, stranger).await.is_ok());

    let err = engine.diary_details(hidden.id, stranger).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn sharing_opens_editing_but_not_deletion() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;
    let bob = login(&engine, "bob").await;
    let carol = login(&engine, "carol").await;

    let diary = engine
        .create_diary(alice, new_diary("Shared", "shared_edit"))
        .await
        .unwrap();

    // Not yet an associate.
    let err = engine
        .update_diary(
            diary.id,
            bob,
            DiaryUpdate {
                title: Some("Hijack".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.share_diary(diary.id, alice, bob).await.unwrap();

    // Any associate may edit...
    engine
        .update_diary(
            diary.id,
            bob,
            DiaryUpdate {
                content: Some("Edited by Bob".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // ...and any associate may share further.
    engine.share_diary(diary.id, bob, carol).await.unwrap();

    let err = engine.share_diary(diary.id, alice, carol).await.unwrap_err();
    assert!(matches!(err, EngineError::AlreadyGranted(_)));

    // Deletion stays creator-only, no matter who edited last.
    let err = engine.delete_diary(diary.id, bob).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.delete_diary(diary.id, alice).await.unwrap();

    let err = engine.diary_details(diary.id, alice).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn sharing_requires_an_association() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;
    let bob = login(&engine, "bob").await;
    let carol = login(&engine, "carol").await;

    let diary = engine
        .create_diary(alice, new_diary("Mine", "private"))
        .await
        .unwrap();

    let err = engine.share_diary(diary.id, bob, carol).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn update_replaces_submitted_tag_and_media_sets() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let t1 = engine.create_tag("food", "meals", "diary").await.unwrap();
    let t2 = engine.create_tag("travel", "leisure", "diary").await.unwrap();

    let diary = engine
        .create_diary(
            alice,
            NewDiary {
                tag_ids: vec![t1.id],
                image_urls: vec!["https://img.example/old.jpg".to_string()],
                ..new_diary("Sets", "private")
            },
        )
        .await
        .unwrap();

    engine
        .update_diary(
            diary.id,
            alice,
            DiaryUpdate {
                tag_ids: Some(vec![t2.id]),
                image_urls: Some(vec!["https://img.example/new.jpg".to_string()]),
                level: Some("public".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let details = engine.diary_details(diary.id, alice).await.unwrap();
    assert_eq!(details.level, PermissionLevel::Public);
    assert_eq!(details.tags.len(), 1);
    assert_eq!(details.tags[0].id, t2.id);
    assert_eq!(details.image_urls, vec!["https://img.example/new.jpg"]);
}

#[tokio::test]
async fn like_unlike_pair_counter_with_rows() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;
    let bob = login(&engine, "bob").await;

    let diary = engine
        .create_diary(alice, new_diary("Likes", "public"))
        .await
        .unwrap();

    assert!(!engine.has_liked(diary.id, bob).await.unwrap());

    engine.like_diary(diary.id, bob).await.unwrap();
    assert!(engine.has_liked(diary.id, bob).await.unwrap());

    let err = engine.like_diary(diary.id, bob).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let details = engine.diary_details(diary.id, alice).await.unwrap();
    assert_eq!(details.diary.like_count, 1);

    engine.unlike_diary(diary.id, bob).await.unwrap();
    assert!(!engine.has_liked(diary.id, bob).await.unwrap());

    let err = engine.unlike_diary(diary.id, bob).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let details = engine.diary_details(diary.id, alice).await.unwrap();
    assert_eq!(details.diary.like_count, 0);
}

#[tokio::test]
async fn like_missing_diary_reports_not_found() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;

    let err = engine
        .like_diary(uuid::Uuid::new_v4(), alice)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn listing_is_scoped_filtered_and_paged() {
    let engine = engine_with_db().await;
    let alice = login(&engine, "alice").await;
    let bob = login(&engine, "bob").await;

    let tag = engine.create_tag("work", "office", "diary").await.unwrap();

    for i in 0..3 {
        engine
            .create_diary(alice, new_diary(&format!("Alice {i}"), "private"))
            .await
            .unwrap();
    }
    engine
        .create_diary(
            alice,
            NewDiary {
                tag_ids: vec![tag.id],
                ..new_diary("Alice tagged", "private")
            },
        )
        .await
        .unwrap();
    engine
        .create_diary(bob, new_diary("Bob only", "private"))
        .await
        .unwrap();

    // Association-scoped: bob's diary never shows up for alice.
    let (diaries, total) = engine
        .list_diaries(alice, DiaryListFilter::default())
        .await
        .unwrap();
    assert_eq!(total, 4);
    assert_eq!(diaries.len(), 4);

    let (page, total) = engine
        .list_diaries(
            alice,
            DiaryListFilter {
                page: Some(2),
                page_size: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(total, 4);
    assert_eq!(page.len(), 1);

    let (found, total) = engine
        .list_diaries(
            alice,
            DiaryListFilter {
                keyword: Some("tagged".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].title, "Alice tagged");

    let (found, total) = engine
        .list_diaries(
            alice,
            DiaryListFilter {
                tag_ids: vec![tag.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].title, "Alice tagged");
}
