use std::time::Duration;

use actix::{Actor, Addr, SyncContext};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;

use crate::settings::ApiKeys;
use crate::types::StartupError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

pub struct DbActor(pub DbPool);

pub struct AppState {
    pub db: Addr<DbActor>,
    pub api_keys: ApiKeys,
}

impl Actor for DbActor {
    type Context = SyncContext<Self>;
}

/// Lets concurrent writers wait on the file lock instead of failing with SQLITE_BUSY.
#[derive(Debug)]
struct BusyTimeout(Duration);

impl CustomizeConnection<SqliteConnection, r2d2::Error> for BusyTimeout {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", self.0.as_millis()))
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn get_db_pool(db_url: &str, busy_timeout: Duration) -> Result<DbPool, StartupError> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(BusyTimeout(busy_timeout)))
        .build(manager)?;

    Ok(pool)
}

const CREATE_CAFE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS cafe (
        id INTEGER NOT NULL PRIMARY KEY,
        name VARCHAR(250) NOT NULL UNIQUE,
        map_url VARCHAR(500) NOT NULL,
        img_url VARCHAR(500) NOT NULL,
        location VARCHAR(250) NOT NULL,
        seats VARCHAR(250) NOT NULL,
        has_toilet BOOLEAN NOT NULL,
        has_wifi BOOLEAN NOT NULL,
        has_sockets BOOLEAN NOT NULL,
        can_take_calls BOOLEAN NOT NULL,
        coffee_price VARCHAR(250)
    );
";

/// Creates the cafe table on first start. Existing tables are left as they are.
pub fn init_schema(pool: &DbPool) -> Result<(), StartupError> {
    let mut conn = pool.get()?;
    conn.batch_execute(CREATE_CAFE_TABLE)?;

    Ok(())
}
