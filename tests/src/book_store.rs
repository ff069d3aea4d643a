use ormlet::db::Database;
use ormlet::schema::{Field, Model};
use ormlet::{props, Orm, Session};

use std::sync::Arc;

/// Books with authors, covers, genres and publishers, seeded with three
/// books.
///
/// | model | rows |
/// |---|---|
/// | `Book` | 3 |
/// | `Cover` | 3 |
/// | `Genre` | 4 |
/// | `BookGenres` | 5 |
/// | `Author` | 3 |
/// | `Publisher` | 2 |
/// | `AuthorPublisher` | 3 |
pub struct BookStore {
    pub orm: Orm,
    pub state: Arc<Database>,
}

impl BookStore {
    pub fn new() -> BookStore {
        crate::init_logging();

        let mut builder = Orm::builder();
        builder.register_all(BookStore::models()).unwrap();
        let orm = builder.build().unwrap();

        let state = BookStore::seed(&orm);
        BookStore { orm, state }
    }

    pub fn models() -> Vec<Model> {
        vec![
            Model::new("Book")
                .attr("name")
                .attr("releaseYear")
                .field(Field::fk("author", "Author").related_name("books"))
                .field(Field::one_to_one("cover", "Cover"))
                .field(Field::many("genres", "Genre").related_name("books"))
                .field(Field::fk("publisher", "Publisher").related_name("books")),
            Model::new("Author").attr("name").field(
                Field::many("publishers", "Publisher")
                    .through("AuthorPublisher")
                    .related_name("authors"),
            ),
            Model::new("AuthorPublisher")
                .field(Field::fk("author", "Author"))
                .field(Field::fk("publisher", "Publisher")),
            Model::new("Cover").attr("src"),
            Model::new("Genre").attr("name"),
            Model::new("Publisher").attr("name"),
        ]
    }

    /// A copy-on-write session over the seeded snapshot.
    pub fn session(&self) -> Session {
        self.orm.session(self.state.clone())
    }

    fn seed(orm: &Orm) -> Arc<Database> {
        let session = orm.mutable_session(orm.empty_state());

        let author = session.model("Author");
        for name in ["Tommi Kaikkonen", "Bill Gates", "Steve Jobs"] {
            author.create(props! { "name" => name }).unwrap();
        }

        let cover = session.model("Cover");
        for _ in 0..3 {
            cover.create(props! { "src" => "cover.jpg" }).unwrap();
        }

        let genre = session.model("Genre");
        for name in ["Biography", "Autobiography", "Software Development", "Redux"] {
            genre.create(props! { "name" => name }).unwrap();
        }

        let publisher = session.model("Publisher");
        for name in ["Technical Publishing", "Autobiographies Inc"] {
            publisher.create(props! { "name" => name }).unwrap();
        }

        let book = session.model("Book");
        book.create(props! {
            "name" => "Tommi Kaikkonen - an Autobiography",
            "releaseYear" => 2050,
            "author" => 0,
            "cover" => 0,
            "genres" => vec![0, 1],
            "publisher" => 1,
        })
        .unwrap();
        book.create(props! {
            "name" => "Clean Code",
            "releaseYear" => 2008,
            "author" => 1,
            "cover" => 1,
            "genres" => vec![2],
            "publisher" => 0,
        })
        .unwrap();
        book.create(props! {
            "name" => "Getting Started with Redux",
            "releaseYear" => 2015,
            "author" => 2,
            "cover" => 2,
            "genres" => vec![2, 3],
            "publisher" => 0,
        })
        .unwrap();

        for (author, publishers) in [(0, vec![1]), (1, vec![0]), (2, vec![0])] {
            session
                .model("Author")
                .with_id(author)
                .unwrap()
                .update(props! { "publishers" => publishers })
                .unwrap();
        }

        session.into_state()
    }
}

impl Default for BookStore {
    fn default() -> Self {
        BookStore::new()
    }
}
