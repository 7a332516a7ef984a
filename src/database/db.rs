use std::collections::BTreeMap;

use postgres_types::{Json, ToSql};
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info, warn};

use crate::{
    database::error::StoreError,
    model::structures::{
        contest::Contest,
        leaderboard_record::{ContestHistoryEntry, LeaderboardRecord},
        result_row::{ProblemResult, ResultRow}
    },
    utils::progress_utils::progress_bar
};

/// Postgres-backed rating store.
///
/// Tables: `contests`, `contest_standing` (one row per participant and
/// contest) and `leaderboard` (one row per user, history as jsonb).
pub struct DbClient {
    client: Client
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient { client })
    }

    /// Fetches the contest, its standing rows and the whole leaderboard concurrently.
    pub async fn load_contest(
        &self,
        contest_id: i32
    ) -> Result<(Contest, Vec<ResultRow>, Vec<LeaderboardRecord>), StoreError> {
        futures::try_join!(
            self.get_contest(contest_id),
            self.get_standing_rows(contest_id),
            self.get_leaderboard()
        )
    }

    pub async fn get_contest(&self, contest_id: i32) -> Result<Contest, StoreError> {
        let row = self
            .client
            .query_opt(
                "SELECT id, name, time_start, time_end FROM contests WHERE id = $1",
                &[&contest_id]
            )
            .await?
            .ok_or(StoreError::ContestNotFound(contest_id))?;

        Ok(Contest {
            id: row.get("id"),
            name: row.get::<_, Option<String>>("name").unwrap_or_default(),
            time_start: row.get("time_start"),
            time_end: row.get("time_end")
        })
    }

    /// Standing rows in storage order; ordering is the aggregator's job.
    pub async fn get_standing_rows(&self, contest_id: i32) -> Result<Vec<ResultRow>, StoreError> {
        info!("Fetching standing rows for contest {}...", contest_id);
        let rows = self
            .client
            .query(
                "SELECT user_id, score::float8 AS score, penalty::float8 AS penalty, problems \
                 FROM contest_standing WHERE contest_id = $1 ORDER BY id",
                &[&contest_id]
            )
            .await?;

        let result = rows.iter().map(Self::result_row_from_row).collect::<Vec<_>>();
        info!("Fetched {} standing rows", result.len());

        Ok(result)
    }

    fn result_row_from_row(row: &Row) -> ResultRow {
        let user_id: String = row.get("user_id");
        let problems = match row.try_get::<_, Option<Json<BTreeMap<String, ProblemResult>>>>("problems") {
            Ok(p) => p.map(|Json(p)| p).unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring unreadable problem data for {}: {}", user_id, e);
                BTreeMap::new()
            }
        };

        ResultRow {
            user_id,
            score: row.get::<_, Option<f64>>("score").unwrap_or_default(),
            penalty: row.get::<_, Option<f64>>("penalty").unwrap_or_default(),
            problems
        }
    }

    pub async fn get_leaderboard(&self) -> Result<Vec<LeaderboardRecord>, StoreError> {
        info!("Fetching leaderboard...");
        let rows = self
            .client
            .query(
                "SELECT username, elo::float8 AS elo, history FROM leaderboard ORDER BY username",
                &[]
            )
            .await?;

        let records = rows.iter().map(Self::record_from_row).collect::<Vec<_>>();
        info!("Fetched {} leaderboard records", records.len());

        Ok(records)
    }

    fn record_from_row(row: &Row) -> LeaderboardRecord {
        let username: String = row.get("username");
        let history = match row.try_get::<_, Option<Json<Vec<ContestHistoryEntry>>>>("history") {
            Ok(h) => h.map(|Json(h)| h).unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring unreadable history for {}: {}", username, e);
                Vec::new()
            }
        };

        LeaderboardRecord {
            username,
            elo: row.get::<_, Option<f64>>("elo").unwrap_or_default(),
            history
        }
    }

    /// Upserts records in one transaction; nothing is written if any statement fails.
    pub async fn save_records(&mut self, records: &[LeaderboardRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            warn!("No leaderboard records to save");
            return Ok(());
        }

        let p_bar = progress_bar(records.len() as u64, "Saving leaderboard records".to_string());

        let transaction = self.client.transaction().await?;
        let statement = transaction
            .prepare(
                "INSERT INTO leaderboard (username, elo, history) VALUES ($1, $2, $3) \
                 ON CONFLICT (username) DO UPDATE SET elo = EXCLUDED.elo, history = EXCLUDED.history"
            )
            .await?;

        for record in records {
            let history = Json(&record.history);
            let values: &[&(dyn ToSql + Sync)] = &[&record.username, &record.elo, &history];
            transaction.execute(&statement, values).await?;

            if let Some(bar) = &p_bar {
                bar.inc(1);
            }
        }

        transaction.commit().await?;

        if let Some(bar) = p_bar {
            bar.finish();
        }
        info!("Saved {} leaderboard records", records.len());

        Ok(())
    }

    // Access the underlying Client
    pub fn client(&self) -> &Client {
        &self.client
    }
}
