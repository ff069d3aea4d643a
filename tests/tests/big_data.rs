//! Bulk workloads. These check results at scale; timing is left to the
//! host's benchmarks.

use tests::*;

use ormlet::schema::{Field, Model};
use ormlet::stmt::Id;
use ormlet::{props, Orm};

use std_util::prelude::*;

fn items() -> Orm {
    init_logging();

    let mut builder = Orm::builder();
    assert_ok!(builder.register(Model::new("Item").attr("name")));
    assert_ok!(builder.build())
}

fn parents() -> Orm {
    init_logging();

    let mut builder = Orm::builder();
    assert_ok!(builder.register_all([
        Model::new("Parent")
            .attr("name")
            .field(Field::many("children", "Child").related_name("parent")),
        Model::new("Child").attr("name"),
    ]));
    assert_ok!(builder.build())
}

#[test]
fn creates_many_items() {
    let orm = items();
    let session = orm.session(orm.empty_state());
    let item = session.model("Item");

    for i in 0..10_000 {
        assert_ok!(item.create(props! { "id" => i, "name" => "TestItem" }));
    }

    assert_eq!(item.count(), 10_000);
    assert_eq!(assert_some!(item.last()).id(), &Id::from(9_999));
}

#[test]
fn looks_up_items_in_a_large_table() {
    let orm = items();
    let session = orm.mutable_session(orm.empty_state());
    let item = session.model("Item");
    for i in 0..20_000 {
        assert_ok!(item.create(props! { "id" => i, "name" => "TestItem" }));
    }

    for id in (10_000..20_000).rev() {
        assert_ok!(item.with_id(id));
    }
}

#[test]
fn adds_queries_and_removes_many_links() {
    let orm = parents();
    let session = orm.session(orm.empty_state());
    let child = session.model("Child");
    for i in 0..3_000 {
        assert_ok!(child.create(props! { "id" => i, "name" => "TestChild" }));
    }
    let parent = assert_ok!(session.model("Parent").create(props! {}));
    let children = assert_ok!(parent.many("children"));

    for i in 0..2_500 {
        assert_ok!(children.add([i]));
    }
    assert_eq!(children.count(), 2_500);

    for _ in 0..50 {
        assert_eq!(children.count(), 2_500);
    }

    for i in 0..1_000 {
        assert_ok!(children.remove([i]));
    }
    assert_eq!(children.count(), 1_500);
    assert_eq!(session.model("ParentChildren").count(), 1_500);

    let first = assert_some!(children.query().first());
    assert_eq!(first.id(), &Id::from(1_000));
    assert_eq!(assert_ok!(first.query("parent")).ids(), [parent.id().clone()]);
}
