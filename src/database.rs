use std::time::Duration;
use diesel::prelude::*;
use diesel::connection::SimpleConnection;
use diesel::result::Error;
use diesel::{insert_into, sql_query};
use diesel::r2d2::{ConnectionManager, CustomizeConnection};
use r2d2::{Pool, PooledConnection};
use crate::error::DatabaseError;
use crate::models::{NewRating, OrderBy, Rating};
use crate::settings;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

// Kept identical to the table existing app.sqlite3 files were created with.
const CREATE_TABLE: &str = "
    CREATE TABLE
    IF NOT EXISTS
    data(
        secret TEXT,
        who    TEXT,
        url    TEXT,
        mark   INTEGER,
        cats   TEXT,
        desc   TEXT
    );";

const IN_MEMORY: &str = ":memory:";

/// Applied to every connection the pool opens, so none of them can miss the table.
#[derive(Debug)]
struct ConnectionSetup {
    busy_timeout: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionSetup {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        connection.batch_execute(&format!("PRAGMA busy_timeout = {};", self.busy_timeout))
            .and_then(|_| init_schema(connection))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn build_connection_pool(settings: &settings::Database) -> Result<DbPool, DatabaseError> {
    // every :memory: connection is its own database, so all requests must share one
    let pool_size = if settings.url == IN_MEMORY {
        if settings.poolsize > 1 {
            warn!("{} database requested with poolsize {}, using a single connection", IN_MEMORY, settings.poolsize);
        }
        1
    } else {
        settings.poolsize
    };
    let manager = ConnectionManager::<SqliteConnection>::new(&settings.url);
    Pool::builder()
        .max_size(pool_size)
        .connection_timeout(Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionSetup { busy_timeout: settings.busytimeout }))
        .build(manager)
        .map_err(|err| DatabaseError::PoolInitializationError(err.to_string()))
}

pub fn init_schema(connection: &mut SqliteConnection) -> Result<(), Error> {
    sql_query(CREATE_TABLE)
        .execute(connection)
        .map(|_| ())
}

pub fn find_ratings(connection: &mut SqliteConnection, board: &str, order_by: OrderBy)
                    -> Result<Vec<Rating>, Error> {
    use crate::schema::ratings::dsl::*;
    let query = ratings
        .filter(secret.eq(board))
        .into_boxed();
    let query = match order_by {
        OrderBy::Who => query.order(who.asc()),
        OrderBy::Url => query.order(url.asc()),
        OrderBy::Mark => query.order(mark.asc()),
        OrderBy::Cats => query.order(cats.asc()),
        OrderBy::Desc => query.order(description.asc()),
    };
    query
        .then_order_by(rowid.asc())
        .load::<Rating>(connection)
}

pub fn insert_rating(connection: &mut SqliteConnection, rating: &NewRating)
                     -> Result<usize, Error> {
    use crate::schema::ratings::dsl::*;
    insert_into(ratings)
        .values(rating)
        .execute(connection)
}

pub fn count_ratings(connection: &mut SqliteConnection, board: &str) -> Result<i64, Error> {
    use crate::schema::ratings::dsl::*;
    ratings
        .filter(secret.eq(board))
        .count()
        .get_result(connection)
}
