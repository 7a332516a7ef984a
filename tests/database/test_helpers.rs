use lazy_static::lazy_static;
use std::sync::Arc;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio_postgres::{Client, NoTls};

pub const ENDED_CONTEST: i32 = 1;
pub const UPCOMING_CONTEST: i32 = 2;
pub const EMPTY_CONTEST: i32 = 3;

pub struct TestDatabase {
    pub connection_string: String,
    _container: Container<'static, Postgres>
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Create a static CLI instance
        lazy_static! {
            static ref DOCKER: Arc<Cli> = Arc::new(Cli::default());
        }

        // Start PostgreSQL container
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        let connection_string = format!(
            "host=localhost port={} user=postgres password=postgres dbname=postgres",
            port
        );

        let client = connect(&connection_string).await?;

        let schema = include_str!("schema.sql");
        client.batch_execute(schema).await?;

        Ok(TestDatabase {
            connection_string,
            _container: container
        })
    }

    pub async fn get_client(&self) -> Result<Client, Box<dyn std::error::Error>> {
        connect(&self.connection_string).await
    }

    /// Contest 1 has ended with four participants, contest 2 starts in the
    /// far future and contest 3 ended without anyone taking part.
    ///
    /// Leaderboard: bob is rated with one earlier contest, carol has a record
    /// but was never rated, alice and dave have no record at all.
    pub async fn seed_test_data(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = self.get_client().await?;

        client
            .batch_execute(
                "INSERT INTO contests (id, name, time_start, time_end) VALUES
                 (1, 'Weekly Round 1', '2025-01-04 10:00:00+00', '2025-01-04 12:00:00+00'),
                 (2, 'Weekly Round 2', '2099-01-11 10:00:00+00', '2099-01-11 12:00:00+00'),
                 (3, 'Empty Round', '2025-01-18 10:00:00+00', '2025-01-18 12:00:00+00');

                 INSERT INTO contest_standing (contest_id, user_id, score, penalty, problems) VALUES
                 (1, 'dave', 0, 0, NULL),
                 (1, 'carol', 200, 900,
                  '{\"A\": {\"verdict\": \"AC\", \"tries\": 0, \"time\": \"2025-01-04T10:05:00+00:00\"},
                    \"B\": {\"verdict\": \"AC\", \"tries\": 2, \"time\": \"2025-01-04T10:10:00+00:00\"},
                    \"C\": {\"verdict\": \"Pending\", \"tries\": 1}}'),
                 (1, 'alice', 300, 1200,
                  '{\"A\": {\"verdict\": \"AC\", \"tries\": 0},
                    \"B\": {\"verdict\": \"AC\", \"tries\": 0},
                    \"C\": {\"score\": 100, \"verdict\": \"WA\", \"tries\": 1}}'),
                 (1, 'bob', 200, 600, '\"not an object\"'),
                 (2, 'alice', 100, 60, NULL);

                 INSERT INTO leaderboard (username, elo, history) VALUES
                 ('bob', 1700,
                  '[{\"contestId\": 0, \"name\": \"Warmup\", \"date\": \"2024-12-28\", \"rank\": 1, \"elo\": 1700}]'),
                 ('carol', 0, '[]');"
            )
            .await?;

        Ok(())
    }
}

async fn connect(connection_string: &str) -> Result<Client, Box<dyn std::error::Error>> {
    let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("Database connection error: {}", e);
        }
    });

    Ok(client)
}
