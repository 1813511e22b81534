use error_stack::Report;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::GenreQuery;
use kernel::interface::update::GenreModifier;
use kernel::prelude::entity::{Genre, GenreId, GenreName};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::{with_deadline, ConvertError};

pub struct PostgresGenreRepository;

#[async_trait::async_trait]
impl GenreQuery for PostgresGenreRepository {
    type Transaction = PostgresConnection;

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Genre>, KernelError> {
        with_deadline(con.deadline(), PgGenreInternal::find_all(con)).await
    }

    async fn find_by_name(
        &self,
        con: &mut PostgresConnection,
        name: &GenreName,
    ) -> error_stack::Result<Option<Genre>, KernelError> {
        with_deadline(con.deadline(), PgGenreInternal::find_by_name(con, name)).await
    }
}

#[async_trait::async_trait]
impl GenreModifier for PostgresGenreRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        name: &GenreName,
    ) -> error_stack::Result<GenreId, KernelError> {
        with_deadline(con.deadline(), PgGenreInternal::create(con, name)).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        id: &GenreId,
    ) -> error_stack::Result<(), KernelError> {
        with_deadline(con.deadline(), PgGenreInternal::delete(con, id)).await
    }
}

#[derive(sqlx::FromRow)]
struct GenreRow {
    id: Uuid,
    name: String,
}

impl From<GenreRow> for Genre {
    fn from(value: GenreRow) -> Self {
        Genre::new(GenreId::new(value.id), GenreName::new(value.name))
    }
}

pub(in crate::database) struct PgGenreInternal;

impl PgGenreInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Genre>, KernelError> {
        let rows = sqlx::query_as::<_, GenreRow>(
            // language=postgresql
            r#"
            SELECT id, name
            FROM genre
            ORDER BY name
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Genre::from).collect())
    }

    async fn find_by_name(
        con: &mut PgConnection,
        name: &GenreName,
    ) -> error_stack::Result<Option<Genre>, KernelError> {
        let row = sqlx::query_as::<_, GenreRow>(
            // language=postgresql
            r#"
            SELECT id, name
            FROM genre
            WHERE name = $1
            "#,
        )
        .bind(name.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Genre::from))
    }

    async fn create(
        con: &mut PgConnection,
        name: &GenreName,
    ) -> error_stack::Result<GenreId, KernelError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            // language=postgresql
            r#"
            INSERT INTO genre (name)
            VALUES ($1)
            RETURNING id
            "#,
        )
        .bind(name.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(GenreId::new(id))
    }

    async fn delete(con: &mut PgConnection, id: &GenreId) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM genre
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("No genre with id {:?}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rand::distributions::{Alphanumeric, DistString};

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::GenreQuery;
    use kernel::interface::update::GenreModifier;
    use kernel::prelude::entity::{GenreId, GenreName};
    use kernel::KernelError;

    use crate::database::postgres::genre::PostgresGenreRepository;
    use crate::database::postgres::PostgresDatabase;

    fn random_name() -> GenreName {
        GenreName::new(Alphanumeric.sample_string(&mut rand::thread_rng(), 16))
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn create_find_delete() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let name = random_name();

        let id = PostgresGenreRepository.create(&mut con, &name).await?;
        let found = PostgresGenreRepository
            .find_by_name(&mut con, &name)
            .await?
            .expect("created genre is readable");
        assert_eq!(found.id(), &id);
        assert_eq!(found.name(), &name);

        let all = PostgresGenreRepository.find_all(&mut con).await?;
        assert!(all.iter().any(|genre| genre.id() == &id));

        PostgresGenreRepository.delete(&mut con, &id).await?;
        let found = PostgresGenreRepository.find_by_name(&mut con, &name).await?;
        assert!(found.is_none());

        let missing = PostgresGenreRepository
            .delete(&mut con, &GenreId::new(uuid::Uuid::new_v4()))
            .await;
        assert_eq!(
            missing.unwrap_err().current_context(),
            &KernelError::NotFound
        );
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn duplicate_name_already_exists() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let name = random_name();

        PostgresGenreRepository.create(&mut con, &name).await?;
        let duplicate = PostgresGenreRepository.create(&mut con, &name).await;
        assert_eq!(
            duplicate.unwrap_err().current_context(),
            &KernelError::AlreadyExists
        );
        Ok(())
    }
}
