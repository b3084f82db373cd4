//! SQLite summary store

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::Path;
use tracing::{debug, info};

use super::schema;
use super::{DriverRow, SessionRecord, SummarySink};
use crate::report::title_case;
use crate::{PaddockError, Result};

/// Most recently stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub session_id: i64,
    pub session_name: String,
    pub event_name: String,
    pub year: i32,
}

/// One stored analysis row joined with its driver and team.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAnalysis {
    pub driver_name: String,
    pub number: i64,
    pub team_name: String,
    pub fastest_soft_time: Option<f64>,
    pub avg_med_time: Option<f64>,
    pub avg_hard_time: Option<f64>,
    pub best_avg_compound: Option<String>,
}

/// Summary sink backed by an SQLite database.
///
/// Names are trimmed and title-cased before they are stored, so
/// `"spielberg"` and `"Spielberg "` refer to the same event.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    pool: SqlitePool,
}

type AnalysisTuple = (String, i64, String, Option<f64>, Option<f64>, Option<f64>, Option<String>);

impl SqliteSink {
    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| PaddockError::persistence(format!("open {}", path.display()), e))?;

        info!(path = %path.display(), "Opened summary database");
        Self::from_pool(pool).await
    }

    /// Private in-memory database; lives as long as the sink.
    pub async fn in_memory() -> Result<Self> {
        let options: SqliteConnectOptions = "sqlite::memory:"
            .parse()
            .map_err(|e| PaddockError::persistence("parse in-memory url", e))?;

        // Every connection to :memory: is a separate database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.foreign_keys(true))
            .await
            .map_err(|e| PaddockError::persistence("open in-memory database", e))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if it is missing.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| PaddockError::persistence("create schema", e))?;
        }
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The session with the highest id, with its event.
    pub async fn latest_session(&self) -> Result<Option<StoredSession>> {
        let row = sqlx::query_as::<_, (i64, String, String, i32)>(
            r#"
            SELECT s.session_id, s.name, e.name, e.year
            FROM Session s
            JOIN Event e ON s.event_id = e.event_id
            ORDER BY s.session_id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PaddockError::persistence("load latest session", e))?;

        Ok(row.map(|(session_id, session_name, event_name, year)| StoredSession {
            session_id,
            session_name,
            event_name,
            year,
        }))
    }

    /// Delete a stored session with its teams, participation and analysis.
    ///
    /// The event goes too once it has no sessions left. Returns `false` when
    /// no session has this id.
    pub async fn delete_session(&self, session_id: i64) -> Result<bool> {
        let mut tx = self.begin().await?;

        let event_id: Option<i64> = sqlx::query_scalar("SELECT event_id FROM Session WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| PaddockError::persistence("look up session", e))?;

        let Some(event_id) = event_id else {
            debug!(session_id, "No stored session to delete");
            return Ok(false);
        };

        sqlx::query("DELETE FROM Session WHERE session_id = ?")
            .bind(session_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| PaddockError::persistence("delete session", e))?;

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Session WHERE event_id = ?")
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| PaddockError::persistence("count event sessions", e))?;

        if remaining == 0 {
            sqlx::query("DELETE FROM Event WHERE event_id = ?")
                .bind(event_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| PaddockError::persistence("delete event", e))?;
        }

        tx.commit().await.map_err(|e| PaddockError::persistence("commit delete", e))?;

        info!(session_id, event_id, event_removed = remaining == 0, "Deleted stored session");
        Ok(true)
    }

    /// Stored analysis rows for a session, by car number.
    pub async fn analysis_for(&self, session_id: i64) -> Result<Vec<StoredAnalysis>> {
        let rows = sqlx::query_as::<_, AnalysisTuple>(
            r#"
            SELECT d.name, p.number, t.name,
                   a.fastest_soft_time, a.avg_med_time, a.avg_hard_time, a.best_avg_compound
            FROM Analysis a
            JOIN DriverSessionParticipation p ON a.session_driver_id = p.session_driver_id
            JOIN Driver d ON p.driver_id = d.driver_id
            JOIN Team t ON p.team_id = t.team_id
            WHERE p.session_id = ?
            ORDER BY p.number
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PaddockError::persistence("load analysis", e))?;

        Ok(rows
            .into_iter()
            .map(|(driver_name, number, team_name, soft, medium, hard, compound)| StoredAnalysis {
                driver_name,
                number,
                team_name,
                fastest_soft_time: soft,
                avg_med_time: medium,
                avg_hard_time: hard,
                best_avg_compound: compound,
            })
            .collect())
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool.begin().await.map_err(|e| PaddockError::persistence("begin transaction", e))
    }
}

async fn upsert_session(tx: &mut Transaction<'static, Sqlite>, session: &SessionRecord) -> Result<i64> {
    let session_key = i64::try_from(session.session_key.0)
        .map_err(|_| PaddockError::parse("session key", format!("{} does not fit the store", session.session_key)))?;

    let event_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO Event (name, year) VALUES (?, ?)
        ON CONFLICT(name, year) DO UPDATE SET name = excluded.name
        RETURNING event_id
        "#,
    )
    .bind(title_case(session.event_name.trim()))
    .bind(session.year)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| PaddockError::persistence("upsert event", e))?;

    sqlx::query_scalar(
        r#"
        INSERT INTO Session (event_id, name, session_key) VALUES (?, ?, ?)
        ON CONFLICT(event_id, name) DO UPDATE SET session_key = excluded.session_key
        RETURNING session_id
        "#,
    )
    .bind(event_id)
    .bind(title_case(session.session_name.trim()))
    .bind(session_key)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| PaddockError::persistence("upsert session", e))
}

async fn upsert_driver_row(tx: &mut Transaction<'static, Sqlite>, session_id: i64, row: &DriverRow) -> Result<()> {
    let team_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO Team (session_id, name) VALUES (?, ?)
        ON CONFLICT(session_id, name) DO UPDATE SET name = excluded.name
        RETURNING team_id
        "#,
    )
    .bind(session_id)
    .bind(title_case(row.team_name.trim()))
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| PaddockError::persistence("upsert team", e))?;

    let driver_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO Driver (name, number) VALUES (?, ?)
        ON CONFLICT(name) DO UPDATE SET number = excluded.number
        RETURNING driver_id
        "#,
    )
    .bind(title_case(row.name.trim()))
    .bind(i64::from(row.number))
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| PaddockError::persistence("upsert driver", e))?;

    let session_driver_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO DriverSessionParticipation (session_id, driver_id, team_id, number)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(session_id, driver_id)
            DO UPDATE SET team_id = excluded.team_id, number = excluded.number
        RETURNING session_driver_id
        "#,
    )
    .bind(session_id)
    .bind(driver_id)
    .bind(team_id)
    .bind(i64::from(row.number))
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| PaddockError::persistence("upsert participation", e))?;

    sqlx::query(
        r#"
        INSERT INTO Analysis
            (session_driver_id, fastest_soft_time, avg_med_time, avg_hard_time, best_avg_compound)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(session_driver_id) DO UPDATE SET
            fastest_soft_time = excluded.fastest_soft_time,
            avg_med_time = excluded.avg_med_time,
            avg_hard_time = excluded.avg_hard_time,
            best_avg_compound = excluded.best_avg_compound
        "#,
    )
    .bind(session_driver_id)
    .bind(row.fastest_soft)
    .bind(row.average_medium)
    .bind(row.average_hard)
    .bind(row.best_compound.map(|c| c.label()))
    .execute(&mut **tx)
    .await
    .map_err(|e| PaddockError::persistence("upsert analysis", e))?;

    Ok(())
}

#[async_trait::async_trait]
impl SummarySink for SqliteSink {
    async fn persist_summary(&self, session: &SessionRecord, rows: &[DriverRow]) -> Result<i64> {
        let mut tx = self.begin().await?;

        let session_id = upsert_session(&mut tx, session).await?;
        for row in rows {
            upsert_driver_row(&mut tx, session_id, row).await?;
        }

        tx.commit().await.map_err(|e| PaddockError::persistence("commit summary", e))?;

        info!(
            session_id,
            event = %session.event_name,
            session = %session.session_name,
            year = session.year,
            drivers = rows.len(),
            "Stored session summary"
        );
        Ok(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Compound, SessionKey};

    fn record() -> SessionRecord {
        SessionRecord {
            event_name: "spielberg".into(),
            year: 2024,
            session_name: "practice 2".into(),
            session_key: SessionKey(9531),
        }
    }

    fn row(name: &str, number: u32, team: &str, medium: Option<f64>) -> DriverRow {
        DriverRow {
            name: name.into(),
            number,
            team_name: team.into(),
            fastest_soft: Some(65.1),
            average_medium: medium,
            average_hard: None,
            best_compound: medium.map(|_| Compound::Medium),
        }
    }

    async fn count(sink: &SqliteSink, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(sink.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn stores_normalized_names() {
        let sink = SqliteSink::in_memory().await.unwrap();
        let rows = vec![row("max verstappen", 1, "red bull racing", Some(69.8))];

        let session_id = sink.persist_summary(&record(), &rows).await.unwrap();

        let latest = sink.latest_session().await.unwrap().unwrap();
        assert_eq!(latest.session_id, session_id);
        assert_eq!(latest.session_name, "Practice 2");
        assert_eq!(latest.event_name, "Spielberg");
        assert_eq!(latest.year, 2024);

        let stored = sink.analysis_for(session_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].driver_name, "Max Verstappen");
        assert_eq!(stored[0].team_name, "Red Bull Racing");
        assert_eq!(stored[0].avg_med_time, Some(69.8));
        assert_eq!(stored[0].avg_hard_time, None);
        assert_eq!(stored[0].best_avg_compound.as_deref(), Some("MEDIUM"));
    }

    #[tokio::test]
    async fn rerun_updates_instead_of_duplicating() {
        let sink = SqliteSink::in_memory().await.unwrap();

        let first = sink.persist_summary(&record(), &[row("A Driver", 7, "X", Some(90.0))]).await.unwrap();
        let second = sink.persist_summary(&record(), &[row("A Driver", 7, "X", Some(89.5))]).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(count(&sink, "Event").await, 1);
        assert_eq!(count(&sink, "Session").await, 1);
        assert_eq!(count(&sink, "Driver").await, 1);
        assert_eq!(count(&sink, "DriverSessionParticipation").await, 1);
        assert_eq!(count(&sink, "Analysis").await, 1);

        let stored = sink.analysis_for(first).await.unwrap();
        assert_eq!(stored[0].avg_med_time, Some(89.5));
    }

    #[tokio::test]
    async fn drivers_are_shared_across_sessions() {
        let sink = SqliteSink::in_memory().await.unwrap();
        let mut fp3 = record();
        fp3.session_name = "Practice 3".into();

        sink.persist_summary(&record(), &[row("A Driver", 7, "X", None)]).await.unwrap();
        sink.persist_summary(&fp3, &[row("A Driver", 7, "X", None)]).await.unwrap();

        assert_eq!(count(&sink, "Event").await, 1);
        assert_eq!(count(&sink, "Session").await, 2);
        assert_eq!(count(&sink, "Driver").await, 1);
        assert_eq!(count(&sink, "Team").await, 2);
    }

    #[tokio::test]
    async fn empty_summary_stores_session_only() {
        let sink = SqliteSink::in_memory().await.unwrap();
        let session_id = sink.persist_summary(&record(), &[]).await.unwrap();

        assert!(sink.analysis_for(session_id).await.unwrap().is_empty());
        assert_eq!(count(&sink, "Session").await, 1);
    }

    #[tokio::test]
    async fn delete_cascades_and_removes_empty_event() {
        let sink = SqliteSink::in_memory().await.unwrap();
        let mut fp3 = record();
        fp3.session_name = "Practice 3".into();

        let fp2_id = sink.persist_summary(&record(), &[row("A Driver", 7, "X", Some(90.0))]).await.unwrap();
        let fp3_id = sink.persist_summary(&fp3, &[row("A Driver", 7, "X", Some(90.0))]).await.unwrap();

        assert!(sink.delete_session(fp2_id).await.unwrap());
        assert_eq!(count(&sink, "Event").await, 1);
        assert_eq!(count(&sink, "Analysis").await, 1);
        assert_eq!(count(&sink, "Team").await, 1);

        assert!(sink.delete_session(fp3_id).await.unwrap());
        assert_eq!(count(&sink, "Event").await, 0);
        assert_eq!(count(&sink, "DriverSessionParticipation").await, 0);
        assert_eq!(count(&sink, "Driver").await, 1);

        assert!(!sink.delete_session(fp3_id).await.unwrap());
        assert!(sink.latest_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn database_file_is_created_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.db");

        let sink = SqliteSink::open(&path).await.unwrap();
        sink.persist_summary(&record(), &[row("A Driver", 7, "X", None)]).await.unwrap();

        assert!(path.exists());
        let reopened = SqliteSink::open(&path).await.unwrap();
        assert!(reopened.latest_session().await.unwrap().is_some());
    }
}
