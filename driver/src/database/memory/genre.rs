use error_stack::Report;
use uuid::Uuid;

use kernel::interface::query::GenreQuery;
use kernel::interface::update::GenreModifier;
use kernel::prelude::entity::{Genre, GenreId, GenreName};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;

pub struct MemoryGenreRepository;

#[async_trait::async_trait]
impl GenreQuery for MemoryGenreRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Genre>, KernelError> {
        let mut genres = con.store().genres.clone();
        genres.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(genres)
    }

    async fn find_by_name(
        &self,
        con: &mut MemoryTransaction,
        name: &GenreName,
    ) -> error_stack::Result<Option<Genre>, KernelError> {
        Ok(con
            .store()
            .genres
            .iter()
            .find(|genre| genre.name() == name)
            .cloned())
    }
}

#[async_trait::async_trait]
impl GenreModifier for MemoryGenreRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        name: &GenreName,
    ) -> error_stack::Result<GenreId, KernelError> {
        let store = con.store();
        if store.genres.iter().any(|genre| genre.name() == name) {
            return Err(Report::new(KernelError::AlreadyExists)
                .attach_printable(format!("genre {:?} already exists", name)));
        }
        let id = GenreId::new(Uuid::new_v4());
        store.genres.push(Genre::new(id.clone(), name.clone()));
        Ok(id)
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        id: &GenreId,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store();
        let Some(position) = store.genres.iter().position(|genre| genre.id() == id) else {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("genre {:?} does not exist", id)));
        };
        if store.book_genres.iter().any(|(_, genre_id)| genre_id == id) {
            return Err(Report::new(KernelError::Referenced)
                .attach_printable(format!("genre {:?} is still assigned", id)));
        }
        store.genres.remove(position);
        Ok(())
    }
}
