//! Schema setup and one explicit repository per entity. All feed queries
//! come pre-ordered: newest first, ties broken by insertion order (rowid),
//! so pagination stays deterministic.

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::AppResult;

pub struct Author {
    pub id: Uuid,
    pub username: String,
}

pub struct Group {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
}

pub struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author: String,
    pub group_slug: Option<String>,
    pub body: String,
    pub image: Option<String>,
    pub created: i64,
}

pub struct CommentRow {
    pub id: Uuid,
    pub author: String,
    pub body: String,
    pub created: i64,
}

/// Opens the pool and creates the tables. Foreign keys are per-connection
/// in sqlite, hence the `after_connect` pragma.
pub async fn connect(url: &str, max_connections: u32) -> AppResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON")
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(url)
        .await?;
    init(&pool).await?;
    Ok(pool)
}

async fn init(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS authors (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS groups (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            description TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    // author deletion cascades into posts; group deletion only clears the
    // reference, the post survives
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            author_id TEXT NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
            group_id TEXT REFERENCES groups(id) ON DELETE SET NULL,
            body TEXT NOT NULL,
            image TEXT,
            created INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS comments (
            id TEXT PRIMARY KEY,
            post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            author_id TEXT NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
            body TEXT NOT NULL,
            created INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    // composite primary key makes duplicate edges impossible at the store,
    // not just in handler logic
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS follows (
            follower_id TEXT NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
            author_id TEXT NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
            PRIMARY KEY (follower_id, author_id)
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn now_micros() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000) as i64
}

// ---- authors ----

pub async fn author_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<Author>> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT id, username FROM authors WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;
    match row {
        Some((id, username)) => Ok(Some(Author {
            id: Uuid::parse_str(&id)?,
            username,
        })),
        None => Ok(None),
    }
}

pub async fn author_by_id(pool: &SqlitePool, id: Uuid) -> AppResult<Option<Author>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT username FROM authors WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(username,)| Author { id, username }))
}

pub async fn get_or_create_author(pool: &SqlitePool, username: &str) -> AppResult<Author> {
    if let Some(author) = author_by_username(pool, username).await? {
        return Ok(author);
    }

    sqlx::query("INSERT OR IGNORE INTO authors (id, username) VALUES (?, ?)")
        .bind(Uuid::now_v7().to_string())
        .bind(username)
        .execute(pool)
        .await?;

    author_by_username(pool, username)
        .await?
        .ok_or_else(|| anyhow::anyhow!("author {username} missing right after insert").into())
}

pub async fn delete_author(pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM authors WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

// ---- groups ----

pub async fn create_group(
    pool: &SqlitePool,
    slug: &str,
    title: &str,
    description: &str,
) -> AppResult<Group> {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO groups (id, slug, title, description) VALUES (?, ?, ?, ?)")
        .bind(id.to_string())
        .bind(slug)
        .bind(title)
        .bind(description)
        .execute(pool)
        .await?;
    Ok(Group {
        id,
        slug: slug.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
    })
}

pub async fn group_by_slug(pool: &SqlitePool, slug: &str) -> AppResult<Option<Group>> {
    let row: Option<(String, String, String, String)> =
        sqlx::query_as("SELECT id, slug, title, description FROM groups WHERE slug = ?")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
    match row {
        Some((id, slug, title, description)) => Ok(Some(Group {
            id: Uuid::parse_str(&id)?,
            slug,
            title,
            description,
        })),
        None => Ok(None),
    }
}

pub async fn delete_group(pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM groups WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

// ---- posts ----

const POST_COLUMNS: &str = "p.id, p.author_id, a.username, g.slug, p.body, p.image, p.created";
const POST_ORDER: &str = "ORDER BY p.created DESC, p.rowid DESC";

type PostTuple = (
    String,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    i64,
);

fn post_from_tuple(row: PostTuple) -> AppResult<PostRow> {
    let (id, author_id, author, group_slug, body, image, created) = row;
    Ok(PostRow {
        id: Uuid::parse_str(&id)?,
        author_id: Uuid::parse_str(&author_id)?,
        author,
        group_slug,
        body,
        image,
        created,
    })
}

fn posts_from_tuples(rows: Vec<PostTuple>) -> AppResult<Vec<PostRow>> {
    rows.into_iter().map(post_from_tuple).collect()
}

pub async fn create_post(
    pool: &SqlitePool,
    author_id: Uuid,
    group_id: Option<Uuid>,
    body: &str,
    image: Option<&str>,
) -> AppResult<Uuid> {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO posts (id, author_id, group_id, body, image, created) VALUES (?, ?, ?, ?, ?, ?)")
        .bind(id.to_string())
        .bind(author_id.to_string())
        .bind(group_id.map(|g| g.to_string()))
        .bind(body)
        .bind(image)
        .bind(now_micros())
        .execute(pool)
        .await?;
    Ok(id)
}

/// Body, group and image only; `created` is assigned once and never touched.
pub async fn update_post(
    pool: &SqlitePool,
    id: Uuid,
    group_id: Option<Uuid>,
    body: &str,
    image: Option<&str>,
) -> AppResult<()> {
    sqlx::query("UPDATE posts SET group_id = ?, body = ?, image = ? WHERE id = ?")
        .bind(group_id.map(|g| g.to_string()))
        .bind(body)
        .bind(image)
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn post_by_id(pool: &SqlitePool, id: Uuid) -> AppResult<Option<PostRow>> {
    let row: Option<PostTuple> = sqlx::query_as(&format!(
        "SELECT {POST_COLUMNS} FROM posts p
         JOIN authors a ON a.id = p.author_id
         LEFT JOIN groups g ON g.id = p.group_id
         WHERE p.id = ?"
    ))
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;
    row.map(post_from_tuple).transpose()
}

pub async fn all_posts(pool: &SqlitePool) -> AppResult<Vec<PostRow>> {
    let rows: Vec<PostTuple> = sqlx::query_as(&format!(
        "SELECT {POST_COLUMNS} FROM posts p
         JOIN authors a ON a.id = p.author_id
         LEFT JOIN groups g ON g.id = p.group_id
         {POST_ORDER}"
    ))
    .fetch_all(pool)
    .await?;
    posts_from_tuples(rows)
}

pub async fn posts_by_group(pool: &SqlitePool, group_id: Uuid) -> AppResult<Vec<PostRow>> {
    let rows: Vec<PostTuple> = sqlx::query_as(&format!(
        "SELECT {POST_COLUMNS} FROM posts p
         JOIN authors a ON a.id = p.author_id
         LEFT JOIN groups g ON g.id = p.group_id
         WHERE p.group_id = ?
         {POST_ORDER}"
    ))
    .bind(group_id.to_string())
    .fetch_all(pool)
    .await?;
    posts_from_tuples(rows)
}

pub async fn posts_by_author(pool: &SqlitePool, author_id: Uuid) -> AppResult<Vec<PostRow>> {
    let rows: Vec<PostTuple> = sqlx::query_as(&format!(
        "SELECT {POST_COLUMNS} FROM posts p
         JOIN authors a ON a.id = p.author_id
         LEFT JOIN groups g ON g.id = p.group_id
         WHERE p.author_id = ?
         {POST_ORDER}"
    ))
    .bind(author_id.to_string())
    .fetch_all(pool)
    .await?;
    posts_from_tuples(rows)
}

/// Posts by any of the given authors, for the following feed. An empty set
/// short-circuits to an empty feed.
pub async fn posts_by_authors(pool: &SqlitePool, author_ids: &[Uuid]) -> AppResult<Vec<PostRow>> {
    if author_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; author_ids.len()].join(", ");
    let sql = format!(
        "SELECT {POST_COLUMNS} FROM posts p
         JOIN authors a ON a.id = p.author_id
         LEFT JOIN groups g ON g.id = p.group_id
         WHERE p.author_id IN ({placeholders})
         {POST_ORDER}"
    );
    let mut query = sqlx::query_as(&sql);
    for id in author_ids {
        query = query.bind(id.to_string());
    }
    let rows: Vec<PostTuple> = query.fetch_all(pool).await?;
    posts_from_tuples(rows)
}

pub async fn count_posts_by_author(pool: &SqlitePool, author_id: Uuid) -> AppResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE author_id = ?")
        .bind(author_id.to_string())
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn delete_post(pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

// ---- comments ----

pub async fn create_comment(
    pool: &SqlitePool,
    post_id: Uuid,
    author_id: Uuid,
    body: &str,
) -> AppResult<Uuid> {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO comments (id, post_id, author_id, body, created) VALUES (?, ?, ?, ?, ?)")
        .bind(id.to_string())
        .bind(post_id.to_string())
        .bind(author_id.to_string())
        .bind(body)
        .bind(now_micros())
        .execute(pool)
        .await?;
    Ok(id)
}

pub async fn comments_for_post(pool: &SqlitePool, post_id: Uuid) -> AppResult<Vec<CommentRow>> {
    let rows: Vec<(String, String, String, i64)> = sqlx::query_as(
        "SELECT c.id, a.username, c.body, c.created FROM comments c
         JOIN authors a ON a.id = c.author_id
         WHERE c.post_id = ?
         ORDER BY c.created DESC, c.rowid DESC",
    )
    .bind(post_id.to_string())
    .fetch_all(pool)
    .await?;
    rows.into_iter()
        .map(|(id, author, body, created)| {
            Ok(CommentRow {
                id: Uuid::parse_str(&id)?,
                author,
                body,
                created,
            })
        })
        .collect()
}

// ---- follows ----

/// Follow is idempotent and silently refuses self-follows. Both guards live
/// here so no caller has to replicate them: the self check in code, the
/// duplicate check in the store's primary key.
pub async fn follow(pool: &SqlitePool, follower: Uuid, author: Uuid) -> AppResult<()> {
    if follower == author {
        return Ok(());
    }
    sqlx::query("INSERT OR IGNORE INTO follows (follower_id, author_id) VALUES (?, ?)")
        .bind(follower.to_string())
        .bind(author.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

/// No-op when the edge is absent.
pub async fn unfollow(pool: &SqlitePool, follower: Uuid, author: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM follows WHERE follower_id = ? AND author_id = ?")
        .bind(follower.to_string())
        .bind(author.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn is_following(pool: &SqlitePool, follower: Uuid, author: Uuid) -> AppResult<bool> {
    let (exists,): (i64,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ? AND author_id = ?)",
    )
    .bind(follower.to_string())
    .bind(author.to_string())
    .fetch_one(pool)
    .await?;
    Ok(exists != 0)
}

pub async fn followed_authors(pool: &SqlitePool, follower: Uuid) -> AppResult<Vec<Uuid>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT author_id FROM follows WHERE follower_id = ? ORDER BY author_id")
            .bind(follower.to_string())
            .fetch_all(pool)
            .await?;
    rows.into_iter()
        .map(|(id,)| Ok(Uuid::parse_str(&id)?))
        .collect()
}
