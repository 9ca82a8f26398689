use quietpress::db;
use quietpress::pager::{POSTS_ON_PAGE, paginate};
use sqlx::SqlitePool;
use uuid::Uuid;

async fn pool() -> SqlitePool {
    db::connect("sqlite::memory:", 1).await.unwrap()
}

async fn author(pool: &SqlitePool, username: &str) -> Uuid {
    db::get_or_create_author(pool, username).await.unwrap().id
}

async fn write_posts(pool: &SqlitePool, author: Uuid, count: usize) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for n in 0..count {
        ids.push(
            db::create_post(pool, author, None, &format!("post {n}"), None)
                .await
                .unwrap(),
        );
    }
    ids
}

#[tokio::test]
async fn global_feed_paginates_twelve_posts_as_ten_plus_two() {
    let pool = pool().await;
    let alice = author(&pool, "alice").await;
    write_posts(&pool, alice, 12).await;

    let posts = db::all_posts(&pool).await.unwrap();
    assert_eq!(posts.len(), 12);

    let page1 = paginate(db::all_posts(&pool).await.unwrap(), POSTS_ON_PAGE, Some(1));
    assert_eq!(page1.items.len(), 10);
    assert_eq!(page1.total_pages, 2);
    assert_eq!(page1.items[0].body, "post 11");
    assert_eq!(page1.items[9].body, "post 2");

    let page2 = paginate(db::all_posts(&pool).await.unwrap(), POSTS_ON_PAGE, Some(2));
    assert_eq!(page2.items.len(), 2);
    assert_eq!(page2.items[0].body, "post 1");
    assert_eq!(page2.items[1].body, "post 0");
}

#[tokio::test]
async fn following_feed_sees_followed_authors_only() {
    let pool = pool().await;
    let alice = author(&pool, "alice").await;
    let bob = author(&pool, "bob").await;
    let carol = author(&pool, "carol").await;

    write_posts(&pool, alice, 12).await;
    write_posts(&pool, carol, 3).await;
    db::follow(&pool, bob, alice).await.unwrap();

    let followed = db::followed_authors(&pool, bob).await.unwrap();
    assert_eq!(followed, vec![alice]);

    let posts = db::posts_by_authors(&pool, &followed).await.unwrap();
    assert_eq!(posts.len(), 12);
    assert!(posts.iter().all(|p| p.author_id == alice));

    let page1 = paginate(posts, POSTS_ON_PAGE, None);
    assert_eq!(page1.items.len(), 10);
    assert_eq!(page1.items[0].body, "post 11");
}

#[tokio::test]
async fn following_nobody_is_an_empty_feed() {
    let pool = pool().await;
    let bob = author(&pool, "bob").await;

    let followed = db::followed_authors(&pool, bob).await.unwrap();
    let posts = db::posts_by_authors(&pool, &followed).await.unwrap();
    let page = paginate(posts, POSTS_ON_PAGE, None);

    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn group_feed_filters_by_slug() {
    let pool = pool().await;
    let alice = author(&pool, "alice").await;
    let group = db::create_group(&pool, "rust", "Rust", "posts about rust")
        .await
        .unwrap();

    db::create_post(&pool, alice, Some(group.id), "in the group", None)
        .await
        .unwrap();
    db::create_post(&pool, alice, None, "outside the group", None)
        .await
        .unwrap();

    let posts = db::posts_by_group(&pool, group.id).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].body, "in the group");
    assert_eq!(posts[0].group_slug.as_deref(), Some("rust"));
}

#[tokio::test]
async fn deleting_an_author_cascades_into_posts_and_comments() {
    let pool = pool().await;
    let alice = author(&pool, "alice").await;
    let bob = author(&pool, "bob").await;

    let post_ids = write_posts(&pool, alice, 3).await;
    db::create_comment(&pool, post_ids[0], bob, "nice one")
        .await
        .unwrap();

    db::delete_author(&pool, alice).await.unwrap();

    assert!(db::all_posts(&pool).await.unwrap().is_empty());
    assert!(db::post_by_id(&pool, post_ids[0]).await.unwrap().is_none());
    assert!(
        db::comments_for_post(&pool, post_ids[0])
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn deleting_a_group_keeps_its_posts() {
    let pool = pool().await;
    let alice = author(&pool, "alice").await;
    let group = db::create_group(&pool, "rust", "Rust", "description")
        .await
        .unwrap();
    let post_id = db::create_post(&pool, alice, Some(group.id), "survivor", None)
        .await
        .unwrap();

    db::delete_group(&pool, group.id).await.unwrap();

    let post = db::post_by_id(&pool, post_id).await.unwrap().unwrap();
    assert_eq!(post.body, "survivor");
    assert!(post.group_slug.is_none());
}

#[tokio::test]
async fn comments_come_newest_first() {
    let pool = pool().await;
    let alice = author(&pool, "alice").await;
    let post_id = db::create_post(&pool, alice, None, "a post", None)
        .await
        .unwrap();

    for n in 0..3 {
        db::create_comment(&pool, post_id, alice, &format!("comment {n}"))
            .await
            .unwrap();
    }

    let comments = db::comments_for_post(&pool, post_id).await.unwrap();
    let bodies: Vec<&str> = comments.iter().map(|c| c.body.as_str()).collect();
    assert_eq!(bodies, vec!["comment 2", "comment 1", "comment 0"]);
}

#[tokio::test]
async fn author_post_count_tracks_writes() {
    let pool = pool().await;
    let alice = author(&pool, "alice").await;
    write_posts(&pool, alice, 4).await;

    assert_eq!(db::count_posts_by_author(&pool, alice).await.unwrap(), 4);
    assert_eq!(
        db::posts_by_author(&pool, alice).await.unwrap().len(),
        4
    );
}
