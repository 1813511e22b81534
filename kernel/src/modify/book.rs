use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookDraft, BookId, GenreId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Stores the book row only. Genres are linked with [`BookModifier::link_genres`].
    async fn create(
        &self,
        con: &mut Self::Transaction,
        book: &BookDraft,
    ) -> error_stack::Result<BookId, KernelError>;
    async fn link_genres(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        genre_ids: &[GenreId],
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBookModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookModifier: BookModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_modifier(&self) -> &Self::BookModifier;
}
