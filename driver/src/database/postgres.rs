use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::time::Duration;

use error_stack::{Report, ResultExt};
use sqlx::error::ErrorKind;
use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnBookQuery, DependOnGenreQuery};
use kernel::interface::update::{DependOnBookModifier, DependOnGenreModifier};
use kernel::KernelError;

use crate::error::{with_deadline, ConvertError};
use crate::{env, env_or};

pub use self::{book::*, genre::*};

mod book;
mod genre;

static POSTGRES_URL: &str = "POSTGRES_URL";
static STORAGE_TIMEOUT_MS: &str = "STORAGE_TIMEOUT_MS";

const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct PostgresDatabase {
    pool: Pool<Postgres>,
    deadline: Duration,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Self::connect(storage_deadline()?).await
    }

    /// Like [`PostgresDatabase::new`], with the storage deadline given
    /// instead of read from `STORAGE_TIMEOUT_MS`.
    pub async fn connect(deadline: Duration) -> error_stack::Result<Self, KernelError> {
        let options = connect_options()?;
        let pool = PgPoolOptions::new()
            .acquire_timeout(deadline)
            .connect_with(options)
            .await
            .convert_error()?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .convert_error()?;
        tracing::info!(?deadline, "connected to postgres");
        Ok(Self { pool, deadline })
    }
}

fn connect_options() -> error_stack::Result<PgConnectOptions, KernelError> {
    if let Ok(url) = env(POSTGRES_URL) {
        return PgConnectOptions::from_str(&url).convert_error();
    }
    let port = env_or("DB_PORT", "5432")
        .parse::<u16>()
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| "DB_PORT is not a port number")?;
    Ok(PgConnectOptions::new()
        .host(&env_or("DB_HOST", "localhost"))
        .port(port)
        .username(&env_or("DB_USER", "postgres"))
        .password(&env_or("DB_PASSWORD", ""))
        .database(&env_or("DB_NAME", "bookstore")))
}

fn storage_deadline() -> error_stack::Result<Duration, KernelError> {
    match env(STORAGE_TIMEOUT_MS) {
        Ok(millis) => millis
            .parse::<u64>()
            .map(Duration::from_millis)
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| format!("{STORAGE_TIMEOUT_MS} is not a number")),
        Err(_) => Ok(DEFAULT_STORAGE_TIMEOUT),
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresConnection;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let transaction =
            with_deadline(self.deadline, async { self.pool.begin().await.convert_error() })
                .await?;
        Ok(PostgresConnection {
            transaction,
            deadline: self.deadline,
        })
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnGenreQuery for PostgresDatabase {
    type GenreQuery = PostgresGenreRepository;
    fn genre_query(&self) -> &Self::GenreQuery {
        &PostgresGenreRepository
    }
}

impl DependOnGenreModifier for PostgresDatabase {
    type GenreModifier = PostgresGenreRepository;
    fn genre_modifier(&self) -> &Self::GenreModifier {
        &PostgresGenreRepository
    }
}

/// Open postgres transaction. Every statement issued through it is bounded
/// by the storage deadline, and dropping it without a commit rolls back.
pub struct PostgresConnection {
    transaction: sqlx::Transaction<'static, Postgres>,
    deadline: Duration,
}

impl PostgresConnection {
    pub(in crate::database) fn deadline(&self) -> Duration {
        self.deadline
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresConnection {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let deadline = self.deadline;
        with_deadline(deadline, async move { self.transaction.commit().await.convert_error() }).await
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        let deadline = self.deadline;
        with_deadline(deadline, async move {
            self.transaction.rollback().await.convert_error()
        })
        .await
    }
}

impl Deref for PostgresConnection {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.transaction
    }
}

impl DerefMut for PostgresConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.transaction
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                Error::PoolTimedOut => KernelError::Timeout,
                Error::RowNotFound => KernelError::NotFound,
                Error::Database(database) => match database.kind() {
                    ErrorKind::UniqueViolation => KernelError::AlreadyExists,
                    ErrorKind::ForeignKeyViolation => KernelError::Referenced,
                    _ => KernelError::Internal,
                },
                _ => KernelError::Internal,
            };
            Report::from(error).change_context(context)
        })
    }
}

impl<T> ConvertError for Result<T, MigrateError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::from(error).change_context(KernelError::Internal))
    }
}

/// Builds an `ILIKE` pattern that matches `keyword` literally anywhere.
pub(in crate::database) fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod test {
    use super::contains_pattern;

    #[test]
    fn pattern_wraps_keyword() {
        assert_eq!(contains_pattern(""), "%%");
        assert_eq!(contains_pattern("tolkien"), "%tolkien%");
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\"), "%c:\\\\%");
    }
}
