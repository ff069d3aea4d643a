use tests::*;

use ormlet::schema::{Field, Model};
use ormlet::stmt::{Id, Record};
use ormlet::{props, Orm};

use pretty_assertions::assert_eq;
use std_util::prelude::*;

use std::collections::HashSet;
use std::sync::Arc;

fn library() -> Orm {
    init_logging();

    let mut builder = Orm::builder();
    assert_ok!(builder.register_all([
        Model::new("Author"),
        Model::new("Genre"),
        Model::new("Book")
            .field(Field::fk("author", "Author").related_name("books"))
            .field(Field::many("genres", "Genre").related_name("books")),
    ]));
    assert_ok!(builder.build())
}

#[test]
fn deleting_a_genre_unlinks_it() {
    let orm = library();
    let session = orm.session(orm.empty_state());
    assert_ok!(session.model("Author").create(props! { "id" => 0 }));
    assert_ok!(session.model("Genre").create(props! { "id" => 0 }));
    assert_ok!(session.model("Genre").create(props! { "id" => 1 }));
    let book = assert_ok!(session.model("Book").create(props! {
        "id" => 0,
        "author" => 0,
        "genres" => vec![0, 1],
    }));

    assert_eq!(assert_ok!(book.query("genres")).count(), 2);
    let author = assert_ok!(session.model("Author").with_id(0));
    assert_eq!(assert_ok!(author.query("books")).count(), 1);

    assert_ok!(assert_ok!(session.model("Genre").with_id(0)).delete());

    let book = assert_ok!(session.model("Book").with_id(0));
    assert_eq!(assert_ok!(book.query("genres")).count(), 1);
    let links = session
        .model("BookGenres")
        .filter(props! { "from_book_id" => 0, "to_genre_id" => 0 });
    assert!(!links.exists());

    assert_ok!(author.delete());
    assert_none!(assert_ok!(book.related("author")));
}

#[test]
fn structural_sharing_across_models() {
    let orm = library();
    let session = orm.session(orm.empty_state());
    assert_ok!(session.model("Genre").create(props! {}));
    let before = session.state();

    assert_ok!(session.model("Author").create(props! {}));

    let after = session.state();
    assert_same!(
        assert_some!(before.table("Genre")),
        assert_some!(after.table("Genre"))
    );
    assert_same!(
        assert_some!(before.table("Book")),
        assert_some!(after.table("Book"))
    );
    assert_not_same!(
        assert_some!(before.table("Author")),
        assert_some!(after.table("Author"))
    );
}

#[test]
fn ids_stay_unique_through_creates_and_deletes() {
    let orm = library();
    let session = orm.session(orm.empty_state());
    let genre = session.model("Genre");

    for round in 0..5 {
        for _ in 0..4 {
            assert_ok!(genre.create(props! {}));
        }
        let doomed = genre.filter_by(move |record| {
            record.value("id").as_i64().is_some_and(|id| id % 3 == round % 3)
        });
        assert_ok!(doomed.delete());

        let ids = genre.ids();
        assert_unique!(ids);
        let table = genre.table();
        assert_eq!(table.ids().count(), table.len());
        assert!(ids.iter().all(|id| table.contains(id)));
    }
}

#[test]
fn many_to_many_is_symmetric() {
    let orm = library();
    let session = orm.session(orm.empty_state());
    for _ in 0..4 {
        assert_ok!(session.model("Genre").create(props! {}));
    }
    let links = [vec![0, 1], vec![1, 2, 3], vec![], vec![3, 9]];
    for genres in links {
        assert_ok!(session.model("Book").create(props! { "genres" => genres }));
    }

    let mut forward = HashSet::new();
    for book in session.model("Book").all().iter() {
        for genre in assert_ok!(book.query("genres")).ids() {
            forward.insert((book.id().clone(), genre));
        }
    }

    let mut backward = HashSet::new();
    for genre in session.model("Genre").all().iter() {
        for book in assert_ok!(genre.query("books")).ids() {
            backward.insert((book, genre.id().clone()));
        }
    }

    assert_eq!(forward, backward);
    assert_eq!(forward.len(), 6);
}

#[test]
fn diff_update_touches_only_changed_links() {
    let orm = library();
    let session = orm.session(orm.empty_state());
    let book = assert_ok!(session.model("Book").create(props! { "genres" => vec![1, 2, 3] }));
    let through = session.model("BookGenres");
    let before: Vec<(Id, Arc<Record>)> = through
        .all()
        .iter()
        .map(|link| (link.id().clone(), assert_ok!(link.record())))
        .collect();

    assert_ok!(book.update(props! { "genres" => vec![2, 3, 4] }));

    let after: Vec<Id> = through.ids();
    assert_eq!(after.len(), 3);
    let removed: Vec<&Id> = before
        .iter()
        .map(|(id, _)| id)
        .filter(|id| !after.contains(id))
        .collect();
    assert_eq!(removed, [&before[0].0]);

    for (id, record) in &before[1..] {
        let link = assert_ok!(through.with_id(id));
        assert_same!(assert_ok!(link.record()), *record);
    }
    let added = assert_ok!(through.with_id(&after[2]));
    assert_eq!(assert_ok!(added.get("to_genre_id")), 4.into());
}

#[test]
fn forward_references_resolve_once_created() {
    let mut builder = Orm::builder();
    assert_ok!(builder.register_all([
        Model::new("User"),
        Model::new("Team").field(Field::many("users", "User").related_name("teams")),
    ]));
    let orm = assert_ok!(builder.build());
    let session = orm.session(orm.empty_state());

    let team = assert_ok!(session.model("Team").create(props! { "id" => "t0", "users" => vec!["u0", "u2"] }));
    assert_eq!(assert_ok!(team.query("users")).count(), 0);

    for id in ["u2", "u1", "u0"] {
        assert_ok!(session.model("User").create(props! { "id" => id }));
    }

    let users = assert_ok!(team.query("users"));
    assert_eq!(users.ids(), [Id::from("u2"), Id::from("u0")]);
    assert_eq!(
        users.order_by("id", ormlet::Direction::Asc).ids(),
        [Id::from("u0"), Id::from("u2")]
    );
}

#[test]
fn duplicate_ids_name_the_relation() {
    let orm = library();
    let session = orm.session(orm.empty_state());

    let err = assert_err!(session.model("Book").create(props! { "genres" => vec![0, 0] }));
    assert!(err.is_relation_link());
    assert!(err.to_string().contains("genres"), "{err}");
}

#[test]
fn removing_unlinked_id_names_it() {
    let orm = library();
    let session = orm.session(orm.empty_state());
    let book = assert_ok!(session.model("Book").create(props! { "genres" => vec![0] }));

    let err = assert_err!(assert_ok!(book.many("genres")).remove([99]));
    assert!(err.is_relation_unlink());
    assert!(err.to_string().contains("99"), "{err}");
}
