use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery, DependOnGenreQuery, GenreQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    BookDraft, BookFilter, BookId, BookOrder, BookSelection, DestructBookPage, GenreName,
    Keyword, Page, PageCount, SelectLimit,
};
use kernel::KernelError;

use crate::transfer::{BookDto, BookListDto, CreateBookDto, GetAllBookDto, GetBookDto};

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<BookDto, KernelError> {
        let id = BookId::parse(&dto.id).ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("'{}' is not a book id", dto.id))
        })?;

        let mut connection = self.database_connection().transact().await?;
        let book = self.book_query().find_by_id(&mut connection, &id).await?;

        book.map(BookDto::from).ok_or_else(|| {
            Report::new(KernelError::NotFound).attach_printable(format!("book {} not found", dto.id))
        })
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait GetAllBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_all_books(
        &self,
        dto: GetAllBookDto,
    ) -> error_stack::Result<BookListDto, KernelError> {
        let limit = SelectLimit::default();
        let offset = Page::new(dto.page).offset(&limit);
        let filter = BookFilter::new(
            Keyword::new(dto.author),
            Keyword::new(dto.title),
            dto.genres.into_iter().map(GenreName::new).collect(),
        );
        let selection = BookSelection::new(
            BookOrder::from_key(&dto.order_by),
            dto.desc,
            filter,
            limit,
            offset,
        );

        let mut connection = self.database_connection().transact().await?;
        let DestructBookPage { books, total } = self
            .book_query()
            .find_all(&mut connection, &selection)
            .await?
            .into_destruct();

        Ok(BookListDto {
            books: books.into_iter().map(BookDto::from).collect(),
            pages: PageCount::new(total, &limit).into(),
        })
    }
}

impl<T> GetAllBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static + Sync + Send + DependOnBookModifier + DependOnGenreQuery
{
    /// Resolves every genre by name, stores the book and links it, all in
    /// one transaction. An unknown genre fails with [`KernelError::NotFound`]
    /// and leaves nothing behind.
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let draft = BookDraft::try_from(dto)?;
        let mut connection = self.database_connection().transact().await?;

        let created = async {
            let mut genre_ids = Vec::with_capacity(draft.genres().len());
            for name in draft.genres() {
                let genre = self
                    .genre_query()
                    .find_by_name(&mut connection, name)
                    .await?
                    .ok_or_else(|| {
                        Report::new(KernelError::NotFound)
                            .attach_printable(format!("genre {:?} does not exist", name))
                    })?;
                genre_ids.push(genre.id().clone());
            }
            let id = self.book_modifier().create(&mut connection, &draft).await?;
            self.book_modifier()
                .link_genres(&mut connection, &id, &genre_ids)
                .await?;
            Ok::<_, Report<KernelError>>(id)
        }
        .await;

        match created {
            Ok(id) => {
                connection.commit().await?;
                tracing::info!(id = ?id, "book created");
                Ok(BookDto::from(draft.into_book(id)))
            }
            Err(report) => {
                if let Err(rollback) = connection.roll_back().await {
                    tracing::warn!("failed to roll back book creation: {:?}", rollback);
                }
                Err(report)
            }
        }
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier + DependOnGenreQuery {}
