use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookCoverImage, BookDescription, BookDraft, BookId, BookOrder, BookPage,
    BookPrice, BookSelection, BookTitle, GenreId, GenreName,
};
use kernel::KernelError;

use crate::database::postgres::{contains_pattern, PostgresConnection};
use crate::error::{with_deadline, ConvertError};

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        with_deadline(con.deadline(), PgBookInternal::find_by_id(con, id)).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
        selection: &BookSelection,
    ) -> error_stack::Result<BookPage, KernelError> {
        with_deadline(con.deadline(), PgBookInternal::find_all(con, selection)).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        book: &BookDraft,
    ) -> error_stack::Result<BookId, KernelError> {
        with_deadline(con.deadline(), PgBookInternal::create(con, book)).await
    }

    async fn link_genres(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
        genre_ids: &[GenreId],
    ) -> error_stack::Result<(), KernelError> {
        with_deadline(
            con.deadline(),
            PgBookInternal::link_genres(con, book_id, genre_ids),
        )
        .await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    author: String,
    description: String,
    cover_image: String,
    price: i64,
    genres: Vec<String>,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            BookDescription::new(value.description),
            BookCoverImage::new(value.cover_image),
            BookPrice::from_cents(value.price),
            value.genres.into_iter().map(GenreName::new).collect(),
        )
    }
}

// The book columns are null on the single row returned for an empty page.
#[derive(sqlx::FromRow)]
struct BookPageRow {
    total: i64,
    id: Option<Uuid>,
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    cover_image: Option<String>,
    price: Option<i64>,
    genres: Option<Vec<String>>,
}

impl BookPageRow {
    fn into_book(self) -> Option<Book> {
        Some(Book::from(BookRow {
            id: self.id?,
            title: self.title?,
            author: self.author?,
            description: self.description?,
            cover_image: self.cover_image?,
            price: self.price?,
            genres: self.genres.unwrap_or_default(),
        }))
    }
}

fn order_clause(order: BookOrder, desc: bool, table: &str) -> String {
    let direction = if desc { "DESC" } else { "ASC" };
    let (primary, secondary) = match order {
        BookOrder::Title => ("title", "author"),
        BookOrder::Author => ("author", "title"),
    };
    format!(
        "{table}.{primary} COLLATE \"C\" {direction}, \
         {table}.{secondary} COLLATE \"C\" {direction}, \
         {table}.id {direction}"
    )
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT
                book.id,
                book.title,
                book.author,
                book.description,
                book.cover_image,
                (book.price * 100)::BIGINT AS price,
                ARRAY(
                    SELECT genre.name
                    FROM book_genre
                    INNER JOIN genre ON genre.id = book_genre.genre_id
                    WHERE book_genre.book_id = book.id
                    ORDER BY genre.name
                ) AS genres
            FROM
                book
            WHERE
                book.id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_all(
        con: &mut PgConnection,
        selection: &BookSelection,
    ) -> error_stack::Result<BookPage, KernelError> {
        let filter = selection.filter();
        let genres = filter
            .genres()
            .iter()
            .map(|genre| AsRef::<String>::as_ref(genre).to_lowercase())
            .collect::<Vec<_>>();
        let sql = format!(
            // language=postgresql
            r#"
            WITH matched AS (
                SELECT
                    book.id,
                    book.title,
                    book.author,
                    book.description,
                    book.cover_image,
                    (book.price * 100)::BIGINT AS price
                FROM
                    book
                WHERE
                    book.author ILIKE $1
                AND
                    book.title ILIKE $2
                AND (
                    CARDINALITY($3::TEXT[]) = 0
                    OR EXISTS (
                        SELECT 1
                        FROM book_genre
                        INNER JOIN genre ON genre.id = book_genre.genre_id
                        WHERE book_genre.book_id = book.id
                        AND LOWER(genre.name) = ANY($3::TEXT[])
                    )
                )
            )
            SELECT
                total.total,
                page.id,
                page.title,
                page.author,
                page.description,
                page.cover_image,
                page.price,
                page.genres
            FROM
                (SELECT COUNT(*) AS total FROM matched) AS total
            LEFT JOIN LATERAL (
                SELECT
                    matched.*,
                    ARRAY(
                        SELECT genre.name
                        FROM book_genre
                        INNER JOIN genre ON genre.id = book_genre.genre_id
                        WHERE book_genre.book_id = matched.id
                        ORDER BY genre.name
                    ) AS genres
                FROM
                    matched
                ORDER BY
                    {matched_order}
                LIMIT
                    $4
                OFFSET
                    $5
            ) AS page ON TRUE
            ORDER BY
                {page_order}
            "#,
            matched_order = order_clause(*selection.order(), *selection.desc(), "matched"),
            page_order = order_clause(*selection.order(), *selection.desc(), "page"),
        );
        let rows = sqlx::query_as::<_, BookPageRow>(&sql)
            .bind(contains_pattern(filter.author().as_ref()))
            .bind(contains_pattern(filter.title().as_ref()))
            .bind(genres)
            .bind(selection.limit().as_ref())
            .bind(selection.offset().as_ref())
            .fetch_all(con)
            .await
            .convert_error()?;

        let total = rows.first().map(|row| row.total).unwrap_or_default();
        let books = rows
            .into_iter()
            .filter_map(BookPageRow::into_book)
            .collect::<Vec<_>>();
        Ok(BookPage::new(books, total))
    }

    async fn create(
        con: &mut PgConnection,
        book: &BookDraft,
    ) -> error_stack::Result<BookId, KernelError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            // language=postgresql
            r#"
            INSERT INTO book (title, author, description, cover_image, price)
            VALUES ($1, $2, $3, $4, $5::NUMERIC / 100)
            RETURNING id
            "#,
        )
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.description().as_ref())
        .bind(book.cover_image().as_ref())
        .bind(book.price().cents())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(BookId::new(id))
    }

    async fn link_genres(
        con: &mut PgConnection,
        book_id: &BookId,
        genre_ids: &[GenreId],
    ) -> error_stack::Result<(), KernelError> {
        if genre_ids.is_empty() {
            return Ok(());
        }
        let genre_ids = genre_ids
            .iter()
            .map(|id| *AsRef::<Uuid>::as_ref(id))
            .collect::<Vec<Uuid>>();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO book_genre (book_id, genre_id)
            SELECT $1, UNNEST($2::UUID[])
            "#,
        )
        .bind(book_id.as_ref())
        .bind(genre_ids)
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
