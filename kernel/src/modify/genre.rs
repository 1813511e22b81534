use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{GenreId, GenreName};
use crate::KernelError;

#[async_trait::async_trait]
pub trait GenreModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Fails with [`KernelError::AlreadyExists`] when the name is taken.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        name: &GenreName,
    ) -> error_stack::Result<GenreId, KernelError>;
    /// Fails with [`KernelError::NotFound`] when nothing was deleted and with
    /// [`KernelError::Referenced`] while books still carry the genre.
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        id: &GenreId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnGenreModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type GenreModifier: GenreModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn genre_modifier(&self) -> &Self::GenreModifier;
}
