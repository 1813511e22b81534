use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use error_stack::Report;
use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnBookQuery, DependOnGenreQuery};
use kernel::interface::update::{DependOnBookModifier, DependOnGenreModifier};
use kernel::prelude::entity::{
    BookAuthor, BookCoverImage, BookDescription, BookId, BookPrice, BookTitle, Genre, GenreId,
};
use kernel::KernelError;

pub use self::{book::*, genre::*};

mod book;
mod genre;

#[derive(Debug, Clone)]
pub(in crate::database) struct BookRecord {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    description: BookDescription,
    cover_image: BookCoverImage,
    price: BookPrice,
}

#[derive(Debug, Clone, Default)]
pub(in crate::database) struct MemoryStore {
    books: Vec<BookRecord>,
    genres: Vec<Genre>,
    book_genres: Vec<(BookId, GenreId)>,
}

/// In-process stand-in for [`PostgresDatabase`](crate::database::PostgresDatabase).
///
/// Transactions are serialized by a single lock and work on the live store;
/// a snapshot taken at `transact` is restored unless the transaction commits.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    store: Arc<Mutex<MemoryStore>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every `transact` fails with [`KernelError::Internal`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Report::new(KernelError::Internal)
                .attach_printable("memory database is marked unavailable"));
        }
        let store = Arc::clone(&self.store).lock_owned().await;
        let snapshot = Some(store.clone());
        Ok(MemoryTransaction { store, snapshot })
    }
}

impl DependOnBookQuery for MemoryDatabase {
    type BookQuery = MemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &MemoryBookRepository
    }
}

impl DependOnBookModifier for MemoryDatabase {
    type BookModifier = MemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &MemoryBookRepository
    }
}

impl DependOnGenreQuery for MemoryDatabase {
    type GenreQuery = MemoryGenreRepository;
    fn genre_query(&self) -> &Self::GenreQuery {
        &MemoryGenreRepository
    }
}

impl DependOnGenreModifier for MemoryDatabase {
    type GenreModifier = MemoryGenreRepository;
    fn genre_modifier(&self) -> &Self::GenreModifier {
        &MemoryGenreRepository
    }
}

pub struct MemoryTransaction {
    store: OwnedMutexGuard<MemoryStore>,
    snapshot: Option<MemoryStore>,
}

impl MemoryTransaction {
    pub(in crate::database) fn store(&mut self) -> &mut MemoryStore {
        &mut self.store
    }
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(mut self) -> error_stack::Result<(), KernelError> {
        self.snapshot = None;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.store = snapshot;
        }
    }
}
