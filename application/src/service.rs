mod book;
mod genre;

pub use self::{book::*, genre::*};

/// Every catalog use case at once. Anything that can hand out the book and
/// genre capabilities over one database connection gets this for free.
pub trait CatalogService:
    'static
    + Sync
    + Send
    + GetBookService
    + GetAllBookService
    + CreateBookService
    + GetGenreService
    + CreateGenreService
    + DeleteGenreService
{
}

impl<T> CatalogService for T where
    T: GetBookService
        + GetAllBookService
        + CreateBookService
        + GetGenreService
        + CreateGenreService
        + DeleteGenreService
{
}
