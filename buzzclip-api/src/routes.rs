use crate::handlers::{self, rankings, votes};
use axum::{
    routing::{get, post},
    Router,
};
use buzzclip_app::AppContext;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub fn router(ctx: AppContext) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/votes/{video_id}",
            post(votes::cast_vote).delete(votes::remove_vote),
        )
        .route("/rankings", get(rankings::rankings))
        .route("/rankings/trending", get(rankings::trending))
        .route("/rankings/contributors", get(rankings::contributors));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::USER_ID_HEADER;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use buzzclip_app::infrastructure::db::{entities::video, run_migrations};
    use buzzclip_app::AppConfig;
    use sea_orm::{entity::*, ConnectOptions, Database, DatabaseConnection};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn setup() -> (Router, DatabaseConnection) {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        run_migrations(&db).await.unwrap();

        let config = AppConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "VOTE_RATE_LIMIT_PER_MINUTE" => Some("3".to_string()),
            _ => None,
        })
        .unwrap();
        let ctx = AppContext::new(db.clone(), &config);
        (router(ctx), db)
    }

    async fn insert_video(db: &DatabaseConnection) -> Uuid {
        let id = Uuid::new_v4();
        video::ActiveModel {
            id: Set(id),
            url: Set(format!("https://x.com/clips/{id}")),
            platform: Set("x".to_string()),
            title: Set(None),
            submitted_by: Set(None),
            vote_count: Set(0),
            was_trending: Set(false),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(db)
        .await
        .unwrap();
        id
    }

    fn request(method: Method, uri: &str, user: Option<Uuid>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _db) = setup().await;
        let (status, body) = send(&app, request(Method::GET, "/api/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "buzzclip-api");
    }

    #[tokio::test]
    async fn test_vote_lifecycle() {
        let (app, db) = setup().await;
        let video_id = insert_video(&db).await;
        let user = Uuid::new_v4();
        let uri = format!("/api/votes/{video_id}");

        let (status, body) = send(&app, request(Method::POST, &uri, Some(user))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["new_vote_count"], 1);
        assert_eq!(body["user_voted"], true);

        let (status, body) = send(&app, request(Method::POST, &uri, Some(user))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let (status, body) = send(&app, request(Method::DELETE, &uri, Some(user))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["new_vote_count"], 0);
        assert_eq!(body["user_voted"], false);
    }

    #[tokio::test]
    async fn test_vote_requires_identity() {
        let (app, db) = setup().await;
        let video_id = insert_video(&db).await;
        let uri = format!("/api/votes/{video_id}");

        let (status, body) = send(&app, request(Method::POST, &uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let req = Request::builder()
            .method(Method::POST)
            .uri(&uri)
            .header(USER_ID_HEADER, "not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_vote_unknown_video() {
        let (app, _db) = setup().await;
        let uri = format!("/api/votes/{}", Uuid::new_v4());

        let (status, body) = send(&app, request(Method::POST, &uri, Some(Uuid::new_v4()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_votes_are_rate_limited() {
        let (app, db) = setup().await;
        let user = Uuid::new_v4();

        for _ in 0..3 {
            let video_id = insert_video(&db).await;
            let uri = format!("/api/votes/{video_id}");
            let (status, _) = send(&app, request(Method::POST, &uri, Some(user))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let video_id = insert_video(&db).await;
        let uri = format!("/api/votes/{video_id}");
        let (status, body) = send(&app, request(Method::POST, &uri, Some(user))).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["code"], "RATE_LIMITED");
    }

    #[tokio::test]
    async fn test_rankings_for_viewer() {
        let (app, db) = setup().await;
        let video_id = insert_video(&db).await;
        insert_video(&db).await;
        let user = Uuid::new_v4();
        let uri = format!("/api/votes/{video_id}");
        send(&app, request(Method::POST, &uri, Some(user))).await;

        let (status, body) = send(
            &app,
            request(Method::GET, "/api/rankings?period=all&per_page=1", Some(user)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["has_next"], true);
        assert_eq!(body["items"][0]["id"], video_id.to_string());
        assert_eq!(body["items"][0]["user_voted"], true);

        // anonymous readers are allowed
        let (status, body) = send(&app, request(Method::GET, "/api/rankings", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["user_voted"], false);
    }

    #[tokio::test]
    async fn test_rankings_rejects_bad_period() {
        let (app, _db) = setup().await;
        let (status, body) =
            send(&app, request(Method::GET, "/api/rankings?period=2d", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");

        let (status, _) =
            send(&app, request(Method::GET, "/api/rankings?per_page=500", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_trending_and_contributors() {
        let (app, db) = setup().await;
        let video_id = insert_video(&db).await;
        let uri = format!("/api/votes/{video_id}");
        send(&app, request(Method::POST, &uri, Some(Uuid::new_v4()))).await;

        let (status, body) = send(
            &app,
            request(Method::GET, "/api/rankings/trending?platform=x", None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["trending_count"], 0);
        assert_eq!(body["items"][0]["id"], video_id.to_string());

        let (status, body) =
            send(&app, request(Method::GET, "/api/rankings/contributors", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"], "1w");
        assert!(body["contributors"].as_array().unwrap().is_empty());
    }
}
