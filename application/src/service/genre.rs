use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnGenreQuery, GenreQuery};
use kernel::interface::update::{DependOnGenreModifier, GenreModifier};
use kernel::prelude::entity::{GenreId, GenreName};
use kernel::KernelError;

use crate::transfer::{CreateGenreDto, DeleteGenreDto};

#[async_trait::async_trait]
pub trait GetGenreService: 'static + Sync + Send + DependOnGenreQuery {
    async fn get_genres(&self) -> error_stack::Result<Vec<String>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let genres = self.genre_query().find_all(&mut connection).await?;
        Ok(genres
            .into_iter()
            .map(|genre| genre.into_destruct().name.into())
            .collect())
    }
}

impl<T> GetGenreService for T where T: DependOnGenreQuery {}

#[async_trait::async_trait]
pub trait CreateGenreService: 'static + Sync + Send + DependOnGenreModifier {
    /// Fails with [`KernelError::AlreadyExists`] when the name is taken.
    async fn create_genre(&self, dto: CreateGenreDto) -> error_stack::Result<Uuid, KernelError> {
        let name = GenreName::new(dto.name);
        let mut connection = self.database_connection().transact().await?;
        let id = self.genre_modifier().create(&mut connection, &name).await?;
        connection.commit().await?;
        tracing::info!(id = ?id, name = ?name, "genre created");
        Ok(id.into())
    }
}

impl<T> CreateGenreService for T where T: DependOnGenreModifier {}

#[async_trait::async_trait]
pub trait DeleteGenreService: 'static + Sync + Send + DependOnGenreModifier {
    async fn delete_genre(&self, dto: DeleteGenreDto) -> error_stack::Result<(), KernelError> {
        let id = GenreId::parse(&dto.id).ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("'{}' is not a genre id", dto.id))
        })?;
        let mut connection = self.database_connection().transact().await?;
        self.genre_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;
        tracing::info!(id = ?id, "genre deleted");
        Ok(())
    }
}

impl<T> DeleteGenreService for T where T: DependOnGenreModifier {}

#[cfg(test)]
mod test {
    use driver::database::MemoryDatabase;
    use kernel::KernelError;

    use crate::service::{
        CreateBookService, CreateGenreService, DeleteGenreService, GetGenreService,
    };
    use crate::transfer::{CreateBookDto, CreateGenreDto, DeleteGenreDto};

    fn create(name: &str) -> CreateGenreDto {
        CreateGenreDto {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_keeps_existing() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let id = db.create_genre(create("horror")).await?;
        let err = db
            .create_genre(create("horror"))
            .await
            .expect_err("name is taken");
        assert_eq!(err.current_context(), &KernelError::AlreadyExists);
        assert_eq!(db.get_genres().await?, vec!["horror".to_string()]);

        db.delete_genre(DeleteGenreDto { id: id.to_string() })
            .await?;
        assert!(db.get_genres().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let db = MemoryDatabase::new();
        for id in ["horror".to_string(), uuid::Uuid::new_v4().to_string()] {
            let err = db
                .delete_genre(DeleteGenreDto { id })
                .await
                .expect_err("nothing stored");
            assert_eq!(err.current_context(), &KernelError::NotFound);
        }
    }

    #[tokio::test]
    async fn delete_assigned_is_refused() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let id = db.create_genre(create("horror")).await?;
        db.create_book(CreateBookDto {
            title: "It".to_string(),
            author: "Stephen King".to_string(),
            description: String::new(),
            cover_image: String::new(),
            price: 15.0,
            genres: vec!["horror".to_string()],
        })
        .await?;

        let err = db
            .delete_genre(DeleteGenreDto { id: id.to_string() })
            .await
            .expect_err("a book still uses it");
        assert_eq!(err.current_context(), &KernelError::Referenced);
        assert_eq!(db.get_genres().await?, vec!["horror".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_create_has_one_winner() {
        let db = MemoryDatabase::new();
        let (first, second) = tokio::join!(
            db.create_genre(create("horror")),
            db.create_genre(create("horror"))
        );
        let results = [first, second];
        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        let loser = results
            .into_iter()
            .find_map(Result::err)
            .expect("one call loses");
        assert_eq!(loser.current_context(), &KernelError::AlreadyExists);
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn concurrent_create_has_one_winner_on_postgres() -> error_stack::Result<(), KernelError>
    {
        use driver::database::PostgresDatabase;
        use rand::distributions::{Alphanumeric, DistString};

        let db = PostgresDatabase::new().await?;
        let name = Alphanumeric.sample_string(&mut rand::thread_rng(), 16);
        let (first, second) = tokio::join!(
            db.create_genre(create(&name)),
            db.create_genre(create(&name))
        );
        let results = [first, second];
        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        let loser = results
            .into_iter()
            .find_map(Result::err)
            .expect("one call loses");
        assert_eq!(loser.current_context(), &KernelError::AlreadyExists);
        assert_eq!(
            db.get_genres()
                .await?
                .into_iter()
                .filter(|genre| genre == &name)
                .count(),
            1
        );
        Ok(())
    }
}
