use tests::*;

use ormlet::schema::{Field, Model};
use ormlet::stmt::{Id, Value};
use ormlet::{props, Orm, Session};

use pretty_assertions::assert_eq;
use std_util::prelude::*;

fn orm(link: Model, users: Field) -> Orm {
    init_logging();

    let mut builder = Orm::builder();
    assert_ok!(builder.register_all([
        Model::new("User").attr("name"),
        Model::new("Team").attr("name").field(users),
        link,
    ]));
    assert_ok!(builder.build())
}

fn seed_teams(session: &Session) {
    let team = session.model("Team");
    for (id, name) in [("t0", "team0"), ("t1", "team1"), ("t2", "team2")] {
        assert_ok!(team.create(props! { "id" => id, "name" => name }));
    }
}

fn assert_links(session: &Session) {
    let user = assert_ok!(session.model("User").get(props! { "name" => "user0" }));
    let teams = assert_ok!(user.query("teams"));
    assert_eq!(teams.model().name, "Team");
    assert_eq!(teams.count(), 1);

    let team = assert_ok!(session.model("Team").get(props! { "name" => "team0" }));
    let users = assert_ok!(team.query("users"));
    assert_eq!(users.model().name, "User");
    assert_eq!(users.count(), 2);
    assert_eq!(users.ids(), [Id::from("u0"), Id::from("u1")]);

    let t2 = assert_ok!(session.model("Team").with_id("t2"));
    assert_eq!(assert_ok!(t2.query("users")).ids(), [Id::from("u1")]);
    assert_eq!(assert_ok!(user.query("teams")).ids(), [team.id().clone()]);

    let u1 = assert_ok!(session.model("User").with_id("u1"));
    assert_eq!(
        assert_ok!(u1.query("teams")).ids(),
        [Id::from("t0"), Id::from("t2")]
    );
    assert_eq!(session.model("User2Team").count(), 3);
}

#[test]
fn without_through_fields() {
    let orm = orm(
        Model::new("User2Team")
            .field(Field::fk("user", "User"))
            .field(Field::fk("team", "Team")),
        Field::many("users", "User")
            .through("User2Team")
            .related_name("teams"),
    );
    let session = orm.session(orm.empty_state());
    seed_teams(&session);

    let user = session.model("User");
    assert_ok!(user.create(props! { "id" => "u0", "name" => "user0", "teams" => vec!["t0"] }));
    assert_ok!(user.create(props! { "id" => "u1", "name" => "user1", "teams" => vec!["t0", "t2"] }));

    assert_links(&session);
}

#[test]
fn with_through_fields() {
    let orm = orm(
        Model::new("User2Team")
            .field(Field::fk("user", "User"))
            .field(Field::fk("team", "Team")),
        Field::many("users", "User")
            .through("User2Team")
            .related_name("teams")
            .through_fields("user", "team"),
    );
    let session = orm.session(orm.empty_state());
    seed_teams(&session);

    let user = session.model("User");
    assert_ok!(user.create(props! { "id" => "u0", "name" => "user0", "teams" => vec!["t0"] }));
    assert_ok!(user.create(props! { "id" => "u1", "name" => "user1", "teams" => vec!["t0", "t2"] }));

    assert_links(&session);

    let link = assert_some!(session.model("User2Team").first());
    assert_eq!(assert_ok!(link.get("user")), Value::from("u0"));
    assert_eq!(assert_ok!(link.get("team")), Value::from("t0"));
}

#[test]
fn with_additional_attributes() {
    let orm = orm(
        Model::new("User2Team")
            .field(Field::fk("user", "User").related_name("links"))
            .field(Field::fk("team", "Team").related_name("links"))
            .attr("name"),
        Field::many("users", "User")
            .through("User2Team")
            .related_name("teams"),
    );
    let session = orm.session(orm.empty_state());
    seed_teams(&session);

    let user = session.model("User");
    assert_ok!(user.create(props! { "id" => "u0", "name" => "user0" }));
    assert_ok!(user.create(props! { "id" => "u1", "name" => "user1" }));

    let link = session.model("User2Team");
    assert_ok!(link.create(props! { "user" => "u0", "team" => "t0", "name" => "link0" }));
    assert_ok!(link.create(props! { "user" => "u1", "team" => "t0", "name" => "link1" }));
    assert_ok!(link.create(props! { "user" => "u1", "team" => "t2", "name" => "link2" }));

    assert_links(&session);

    let names = |id: &str| {
        let user = assert_ok!(session.model("User").with_id(id));
        column(&assert_ok!(user.query("links")).to_ref_array(), "name")
    };
    assert_eq!(names("u0"), [Value::from("link0")]);
    assert_eq!(names("u1"), [Value::from("link1"), Value::from("link2")]);
}

#[test]
fn diff_update_keeps_link_attributes() {
    let orm = orm(
        Model::new("User2Team")
            .field(Field::fk("user", "User").related_name("links"))
            .field(Field::fk("team", "Team").related_name("links"))
            .attr("name"),
        Field::many("users", "User")
            .through("User2Team")
            .related_name("teams"),
    );
    let session = orm.session(orm.empty_state());
    seed_teams(&session);
    assert_ok!(session.model("User").create(props! { "id" => "u0" }));

    let link = session.model("User2Team");
    let kept = assert_ok!(link.create(props! { "user" => "u0", "team" => "t1", "name" => "keep" }));
    assert_ok!(link.create(props! { "user" => "u0", "team" => "t0", "name" => "drop" }));
    let before = assert_ok!(kept.record());

    let user = assert_ok!(session.model("User").with_id("u0"));
    assert_ok!(assert_ok!(user.many("teams")).update(["t1", "t2"]));

    assert_eq!(link.count(), 2);
    assert_same!(assert_ok!(kept.record()), before);
    assert_eq!(assert_ok!(kept.get("name")), Value::from("keep"));
    assert_eq!(
        assert_ok!(user.query("teams")).ids(),
        [Id::from("t1"), Id::from("t2")]
    );
}
