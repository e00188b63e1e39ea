#![allow(dead_code)]

use buzzclip_app::application::{RankingEngine, TrendingDetector};
use buzzclip_app::domain::TrendingPolicy;
use buzzclip_app::infrastructure::db::entities::{category, video, video_category, Video, VideoCategory};
use buzzclip_app::infrastructure::db::{run_migrations, SnapshotRepository, VoteRepository};
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{entity::*, ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Fresh in-memory database with the schema applied. One connection, so
/// every pool checkout sees the same database.
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    run_migrations(&db).await.unwrap();
    db
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
}

pub struct NewVideo {
    pub platform: &'static str,
    pub vote_count: i32,
    pub is_active: bool,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Default for NewVideo {
    fn default() -> Self {
        Self {
            platform: "x",
            vote_count: 0,
            is_active: true,
            submitted_by: None,
            created_at: fixed_now() - Duration::days(30),
        }
    }
}

pub async fn insert_video(db: &DatabaseConnection, new: NewVideo) -> Uuid {
    let id = Uuid::new_v4();
    video::ActiveModel {
        id: Set(id),
        url: Set(format!("https://example.com/clips/{id}")),
        platform: Set(new.platform.to_string()),
        title: Set(Some("clip".to_string())),
        submitted_by: Set(new.submitted_by),
        vote_count: Set(new.vote_count),
        was_trending: Set(false),
        is_active: Set(new.is_active),
        created_at: Set(new.created_at),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

pub async fn active_video(db: &DatabaseConnection) -> Uuid {
    insert_video(db, NewVideo::default()).await
}

pub async fn insert_vote(db: &DatabaseConnection, video_id: Uuid, at: DateTime<Utc>) -> Uuid {
    let user_id = Uuid::new_v4();
    VoteRepository::create(db, user_id, video_id, at).await.unwrap();
    user_id
}

pub async fn insert_votes(db: &DatabaseConnection, video_id: Uuid, n: usize, at: DateTime<Utc>) {
    for _ in 0..n {
        insert_vote(db, video_id, at).await;
    }
}

pub async fn insert_snapshot(db: &DatabaseConnection, video_id: Uuid, count: i32, at: DateTime<Utc>) {
    SnapshotRepository::insert_batch(db, &[(video_id, count)], at)
        .await
        .unwrap();
}

pub async fn insert_category(db: &DatabaseConnection, slug: &str) -> Uuid {
    let id = Uuid::new_v4();
    category::ActiveModel {
        id: Set(id),
        slug: Set(slug.to_string()),
        name: Set(slug.to_string()),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

pub async fn link_category(db: &DatabaseConnection, video_id: Uuid, category_id: Uuid) {
    let link = video_category::ActiveModel {
        video_id: Set(video_id),
        category_id: Set(category_id),
    };
    VideoCategory::insert(link)
        .exec_without_returning(db)
        .await
        .unwrap();
}

pub async fn find_video(db: &DatabaseConnection, id: Uuid) -> video::Model {
    Video::find_by_id(id).one(db).await.unwrap().unwrap()
}

pub fn ranking_engine(db: &DatabaseConnection) -> RankingEngine {
    let detector = TrendingDetector::new(db.clone(), TrendingPolicy::default());
    RankingEngine::new(db.clone(), detector)
}
