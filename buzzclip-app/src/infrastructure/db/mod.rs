pub mod entities;
mod ranking_repository;
mod snapshot_repository;
mod video_repository;
mod vote_repository;

pub use ranking_repository::{RankedRow, RankingFilter, RankingRepository};
pub use snapshot_repository::SnapshotRepository;
pub use video_repository::VideoRepository;
pub use vote_repository::VoteRepository;

use buzzclip_errors::AppError;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::time::Duration;

pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    Database::connect(opt).await
}

pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let migration = include_str!("../../../../migrations/001_initial.sql");
    let backend = db.get_database_backend();

    for statement in migration.split(';') {
        let statement = strip_comments(statement);
        if statement.is_empty() {
            continue;
        }
        db.execute(Statement::from_string(backend, statement)).await?;
    }

    Ok(())
}

fn strip_comments(statement: &str) -> String {
    statement
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub fn db_error(err: DbErr) -> AppError {
    AppError::Database(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        let sql = "-- header\n-- more\n\nCREATE TABLE t (id INT)\n";
        assert_eq!(strip_comments(sql), "CREATE TABLE t (id INT)");
        assert!(strip_comments("\n-- only a comment\n").is_empty());
    }

    #[test]
    fn test_db_error_maps_to_database() {
        let err = db_error(DbErr::RecordNotFound("video".to_string()));
        assert!(matches!(err, AppError::Database(_)));
    }
}
