use std::cmp::Ordering;

use error_stack::Report;
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookDraft, BookId, BookOrder, BookPage, BookSelection, GenreId, GenreName,
};
use kernel::KernelError;

use crate::database::memory::{BookRecord, MemoryStore, MemoryTransaction};

pub struct MemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for MemoryBookRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let store: &MemoryStore = con.store();
        Ok(store
            .books
            .iter()
            .find(|record| &record.id == id)
            .map(|record| store.assemble(record)))
    }

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
        selection: &BookSelection,
    ) -> error_stack::Result<BookPage, KernelError> {
        let store: &MemoryStore = con.store();
        let mut books = store
            .books
            .iter()
            .map(|record| store.assemble(record))
            .filter(|book| selection.filter().matches(book))
            .collect::<Vec<_>>();
        books.sort_by(|a, b| {
            let ordering = compare(*selection.order(), a, b);
            if *selection.desc() {
                ordering.reverse()
            } else {
                ordering
            }
        });
        let total = books.len() as i64;
        let offset = usize::try_from(*selection.offset().as_ref()).unwrap_or(0);
        let limit = usize::try_from(*selection.limit().as_ref()).unwrap_or(0);
        let books = books.into_iter().skip(offset).take(limit).collect();
        Ok(BookPage::new(books, total))
    }
}

#[async_trait::async_trait]
impl BookModifier for MemoryBookRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        book: &BookDraft,
    ) -> error_stack::Result<BookId, KernelError> {
        let id = BookId::new(Uuid::new_v4());
        con.store().books.push(BookRecord {
            id: id.clone(),
            title: book.title().clone(),
            author: book.author().clone(),
            description: book.description().clone(),
            cover_image: book.cover_image().clone(),
            price: *book.price(),
        });
        Ok(id)
    }

    async fn link_genres(
        &self,
        con: &mut MemoryTransaction,
        book_id: &BookId,
        genre_ids: &[GenreId],
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store();
        if !store.books.iter().any(|record| &record.id == book_id) {
            return Err(Report::new(KernelError::Referenced)
                .attach_printable(format!("book {:?} does not exist", book_id)));
        }
        for genre_id in genre_ids {
            if !store.genres.iter().any(|genre| genre.id() == genre_id) {
                return Err(Report::new(KernelError::Referenced)
                    .attach_printable(format!("genre {:?} does not exist", genre_id)));
            }
            let link = (book_id.clone(), genre_id.clone());
            if store.book_genres.contains(&link) {
                return Err(Report::new(KernelError::AlreadyExists)
                    .attach_printable(format!("genre {:?} is already linked", genre_id)));
            }
            store.book_genres.push(link);
        }
        Ok(())
    }
}

impl MemoryStore {
    fn assemble(&self, record: &BookRecord) -> Book {
        let mut genres = self
            .book_genres
            .iter()
            .filter(|(book_id, _)| book_id == &record.id)
            .filter_map(|(_, genre_id)| self.genres.iter().find(|genre| genre.id() == genre_id))
            .map(|genre| genre.name().clone())
            .collect::<Vec<GenreName>>();
        genres.sort();
        Book::new(
            record.id.clone(),
            record.title.clone(),
            record.author.clone(),
            record.description.clone(),
            record.cover_image.clone(),
            record.price,
            genres,
        )
    }
}

fn compare(order: BookOrder, a: &Book, b: &Book) -> Ordering {
    let title = |book: &Book| -> String { AsRef::<String>::as_ref(book.title()).clone() };
    let author = |book: &Book| -> String { AsRef::<String>::as_ref(book.author()).clone() };
    let (primary, secondary) = match order {
        BookOrder::Title => (title(a).cmp(&title(b)), author(a).cmp(&author(b))),
        BookOrder::Author => (author(a).cmp(&author(b)), title(a).cmp(&title(b))),
    };
    primary.then(secondary).then_with(|| {
        AsRef::<Uuid>::as_ref(a.id()).cmp(AsRef::<Uuid>::as_ref(b.id()))
    })
}

#[cfg(test)]
mod test {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::{BookModifier, GenreModifier};
    use kernel::prelude::entity::{
        BookAuthor, BookCoverImage, BookDescription, BookDraft, BookFilter, BookOrder, BookPrice,
        BookSelection, BookTitle, GenreName, Keyword, SelectLimit, SelectOffset,
    };
    use kernel::KernelError;

    use crate::database::memory::{MemoryBookRepository, MemoryDatabase, MemoryGenreRepository};

    fn draft(title: &str, author: &str, genres: &[&str]) -> BookDraft {
        BookDraft::new(
            BookTitle::new(title),
            BookAuthor::new(author),
            BookDescription::default(),
            BookCoverImage::default(),
            BookPrice::from_cents(999),
            genres.iter().map(|genre| GenreName::new(*genre)).collect(),
        )
    }

    async fn seeded() -> error_stack::Result<MemoryDatabase, KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let horror = MemoryGenreRepository
            .create(&mut con, &GenreName::new("horror"))
            .await?;
        let drama = MemoryGenreRepository
            .create(&mut con, &GenreName::new("drama"))
            .await?;
        for (title, author, genres) in [
            ("It", "Stephen King", vec![horror.clone(), drama.clone()]),
            ("Carrie", "Stephen King", vec![horror.clone()]),
            ("Hamlet", "William Shakespeare", vec![drama.clone()]),
            ("Dune", "Frank Herbert", vec![]),
        ] {
            let id = MemoryBookRepository
                .create(&mut con, &draft(title, author, &[]))
                .await?;
            MemoryBookRepository.link_genres(&mut con, &id, &genres).await?;
        }
        con.commit().await?;
        Ok(db)
    }

    fn titles(page: &kernel::prelude::entity::BookPage) -> Vec<String> {
        page.books()
            .iter()
            .map(|book| AsRef::<String>::as_ref(book.title()).clone())
            .collect()
    }

    #[tokio::test]
    async fn sorts_and_pages() -> error_stack::Result<(), KernelError> {
        let db = seeded().await?;
        let mut con = db.transact().await?;

        let selection = BookSelection::new(
            BookOrder::Author,
            false,
            BookFilter::default(),
            SelectLimit::new(2),
            SelectOffset::new(1),
        );
        let page = MemoryBookRepository.find_all(&mut con, &selection).await?;
        assert_eq!(page.total(), &4);
        assert_eq!(titles(&page), vec!["Carrie", "It"]);

        let selection = BookSelection::new(
            BookOrder::Title,
            true,
            BookFilter::default(),
            SelectLimit::default(),
            SelectOffset::default(),
        );
        let page = MemoryBookRepository.find_all(&mut con, &selection).await?;
        assert_eq!(titles(&page), vec!["It", "Hamlet", "Dune", "Carrie"]);
        Ok(())
    }

    #[tokio::test]
    async fn filters_before_counting() -> error_stack::Result<(), KernelError> {
        let db = seeded().await?;
        let mut con = db.transact().await?;

        let filter = BookFilter::new(
            Keyword::new("king"),
            Keyword::default(),
            vec![GenreName::new("DRAMA")],
        );
        let selection = BookSelection::new(
            BookOrder::Title,
            false,
            filter,
            SelectLimit::default(),
            SelectOffset::default(),
        );
        let page = MemoryBookRepository.find_all(&mut con, &selection).await?;
        assert_eq!(page.total(), &1);
        assert_eq!(titles(&page), vec!["It"]);
        assert_eq!(
            page.books()[0].genres(),
            &vec![GenreName::new("drama"), GenreName::new("horror")]
        );

        let selection = BookSelection::new(
            BookOrder::Title,
            false,
            BookFilter::default(),
            SelectLimit::default(),
            SelectOffset::new(40),
        );
        let page = MemoryBookRepository.find_all(&mut con, &selection).await?;
        assert!(page.books().is_empty());
        assert_eq!(page.total(), &4);
        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_reads_back() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let id = MemoryBookRepository
            .create(&mut con, &draft("Dune", "Frank Herbert", &[]))
            .await?;
        let found = MemoryBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(
            found,
            Some(draft("Dune", "Frank Herbert", &[]).into_book(id))
        );
        Ok(())
    }

    #[tokio::test]
    async fn mixed_case_titles_sort_bytewise() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        for title in ["apple", "Banana", "cherry"] {
            MemoryBookRepository
                .create(&mut con, &draft(title, "author", &[]))
                .await?;
        }
        let page = MemoryBookRepository
            .find_all(&mut con, &BookSelection::default())
            .await?;
        assert_eq!(titles(&page), vec!["Banana", "apple", "cherry"]);
        Ok(())
    }
}
