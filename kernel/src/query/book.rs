use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookId, BookPage, BookSelection};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;

    /// Filters, sorts, then pages. The total is counted before paging and
    /// read together with the page.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        selection: &BookSelection,
    ) -> error_stack::Result<BookPage, KernelError>;
}

pub trait DependOnBookQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookQuery: BookQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_query(&self) -> &Self::BookQuery;
}
