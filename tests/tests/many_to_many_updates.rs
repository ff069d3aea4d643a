//! Links between teams and users made from either side, with and without the
//! other side existing yet.

use tests::*;

use ormlet::props;

use std_util::prelude::*;

#[test]
fn add_forward() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    let team = assert_some!(session.model("Team").first());
    let first = assert_some!(session.model("User").first());
    let last = assert_some!(session.model("User").last());

    assert_ok!(assert_ok!(team.many("users")).add([&first, &last]));

    fixture.assert_first_team_links_first_and_last_user();
}

#[test]
fn update_forward() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    let team = assert_some!(session.model("Team").first());
    let first = assert_some!(session.model("User").first());
    let last = assert_some!(session.model("User").last());

    assert_ok!(team.update(props! { "users" => vec![&first, &last] }));

    fixture.assert_first_team_links_first_and_last_user();
}

#[test]
fn add_backward() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    let team = assert_some!(session.model("Team").first());
    let first = assert_some!(session.model("User").first());
    let last = assert_some!(session.model("User").last());

    assert_ok!(assert_ok!(first.many("teams")).add([&team]));
    assert_ok!(assert_ok!(last.many("teams")).add([&team]));

    fixture.assert_first_team_links_first_and_last_user();
}

#[test]
fn update_backward() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    let team = assert_some!(session.model("Team").first());
    let first = assert_some!(session.model("User").first());
    let last = assert_some!(session.model("User").last());

    assert_ok!(first.update(props! { "teams" => vec![&team] }));
    assert_ok!(last.update(props! { "teams" => vec![&team] }));

    fixture.assert_first_team_links_first_and_last_user();
}

#[test]
fn create_with_forward_field() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    fixture.reset();

    let user = session.model("User");
    for name in ["user0", "user1", "user2"] {
        assert_ok!(user.create(props! { "name" => name }));
    }
    let (first, last) = (assert_some!(user.first()), assert_some!(user.last()));
    assert_ok!(session
        .model("Team")
        .create(props! { "name" => "team0", "users" => vec![&first, &last] }));
    assert_ok!(session.model("Team").create(props! { "name" => "team1" }));

    fixture.assert_first_team_links_first_and_last_user();
}

#[test]
fn create_with_backward_field() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    fixture.reset();

    let team = session.model("Team");
    assert_ok!(team.create(props! { "name" => "team0" }));
    assert_ok!(team.create(props! { "name" => "team1" }));
    let first = assert_some!(team.first());

    let user = session.model("User");
    assert_ok!(user.create(props! { "name" => "user0", "teams" => vec![&first] }));
    assert_ok!(user.create(props! { "name" => "user1" }));
    assert_ok!(user.create(props! { "name" => "user2", "teams" => vec![&first] }));

    fixture.assert_first_team_links_first_and_last_user();
}

#[test]
fn create_with_forward_field_before_targets() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    fixture.reset();

    let (team, user) = (session.model("Team"), session.model("User"));
    assert_ok!(team.create(props! { "id" => "t0", "users" => vec!["u0", "u2"] }));
    assert_ok!(team.create(props! { "id" => "t1" }));
    for id in ["u0", "u1", "u2"] {
        assert_ok!(user.create(props! { "id" => id }));
    }

    fixture.assert_first_team_links_first_and_last_user();
}

#[test]
fn create_with_backward_field_before_targets() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    fixture.reset();

    let (team, user) = (session.model("Team"), session.model("User"));
    assert_ok!(user.create(props! { "id" => "u0", "teams" => vec!["t0"] }));
    assert_ok!(user.create(props! { "id" => "u1" }));
    assert_ok!(user.create(props! { "id" => "u2", "teams" => vec!["t0"] }));
    assert_ok!(team.create(props! { "id" => "t0" }));
    assert_ok!(team.create(props! { "id" => "t1" }));

    fixture.assert_first_team_links_first_and_last_user();
}

#[test]
fn create_with_forward_field_over_existing_links() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    fixture.reset();

    let (team, user) = (session.model("Team"), session.model("User"));
    assert_ok!(user.create(props! { "id" => "u0", "teams" => vec!["t0"] }));
    assert_ok!(user.create(props! { "id" => "u1" }));
    assert_ok!(user.create(props! { "id" => "u2", "teams" => vec!["t0"] }));
    assert_ok!(team.create(props! { "id" => "t0", "users" => vec!["u0", "u2"] }));
    assert_ok!(team.create(props! { "id" => "t1" }));

    fixture.assert_first_team_links_first_and_last_user();
}

#[test]
fn create_with_backward_field_over_existing_links() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    fixture.reset();

    let (team, user) = (session.model("Team"), session.model("User"));
    assert_ok!(team.create(props! { "id" => "t0", "users" => vec!["u0", "u2"] }));
    assert_ok!(team.create(props! { "id" => "t1" }));
    assert_ok!(user.create(props! { "id" => "u0", "teams" => vec!["t0"] }));
    assert_ok!(user.create(props! { "id" => "u1" }));
    assert_ok!(user.create(props! { "id" => "u2", "teams" => vec!["t0"] }));

    fixture.assert_first_team_links_first_and_last_user();
}

#[test]
fn deleting_either_side_drops_links() {
    let fixture = TeamUser::new();
    let session = &fixture.session;
    let team = assert_some!(session.model("Team").first());
    assert_ok!(team.update(props! { "users" => vec![0, 1, 2] }));
    let user = assert_ok!(session.model("User").with_id(1));
    assert_ok!(assert_ok!(user.many("teams")).add([1]));
    assert_eq!(session.model("TeamUsers").count(), 4);

    assert_ok!(user.delete());
    assert_eq!(session.model("TeamUsers").count(), 2);

    assert_ok!(team.delete());
    assert_eq!(session.model("TeamUsers").count(), 0);
}
