//! End-to-end queries over the bundled social-network dataset
//!
//! Eight users: me knows user2, user3 and user4; user2 knows user5 and user8;
//! user3 knows user4 and user6; user4, user5, user6 and user7 each know one
//! more. Seven websites liked by users 2 through 8.

use reachgraph::fixture::NodeKeys;
use reachgraph::graph::{ErrorKind, Label, PropertyValue};
use reachgraph::query::order_by;
use reachgraph::{
    Database, Direction, Exclusion, Fixture, GraphError, NodeRecord, QueryEngine, Seed, Snapshot,
    TraversalDescription, Uniqueness,
};

fn social_network() -> (Database, NodeKeys) {
    let db = Database::in_memory();
    let keys = Fixture::social_network().unwrap().load(&db).unwrap();
    (db, keys)
}

fn me() -> Seed {
    Seed::lookup("User", "name", "me")
}

fn names(records: &[NodeRecord]) -> Vec<&str> {
    records.iter().filter_map(|r| r.get_str("name")).collect()
}

fn urls_with_counts(snapshot: &Snapshot, depth: u32) -> Vec<(String, usize)> {
    QueryEngine::new()
        .most_liked(snapshot, &me(), depth)
        .unwrap()
        .into_iter()
        .map(|g| (g.node.get_str("url").unwrap_or_default().to_string(), g.count))
        .collect()
}

#[test]
fn test_index_search() {
    let (db, keys) = social_network();
    let snap = db.snapshot();
    let users = Label::new("User");

    let by_id = snap.lookup_single(&users, "id", &PropertyValue::Integer(2)).unwrap();
    assert_eq!(by_id, Some(keys["user2"]));

    let by_name = snap.lookup_single(&users, "name", &"user2".into()).unwrap();
    assert_eq!(by_name, Some(keys["user2"]));

    let by_email = snap.lookup_single(&users, "email", &"me@net.org".into()).unwrap();
    assert_eq!(by_email, Some(keys["me"]));

    let site = snap
        .lookup_single(&Label::new("Website"), "url", &"http://www.web.de".into())
        .unwrap();
    assert_eq!(site, Some(keys["url1"]));

    // Websites and users are indexed separately
    assert!(snap.lookup(&Label::new("Website"), "id", &PropertyValue::Integer(2)).is_empty());
}

#[test]
fn test_friends_depth_1() {
    let (db, _) = social_network();
    let friends = QueryEngine::new().direct_neighbors(&db.snapshot(), &me()).unwrap();
    assert_eq!(names(&friends), vec!["user2", "user3", "user4"]);
}

#[test]
fn test_friends_depth_1_with_default_exclusion() {
    let (db, _) = social_network();
    let friends = QueryEngine::new()
        .friends_at_depth(&db.snapshot(), &me(), 1, Exclusion::default())
        .unwrap();
    assert_eq!(names(&friends), vec!["user2", "user3", "user4"]);
}

#[test]
fn test_friends_depth_1_with_traversal_api() {
    let (db, keys) = social_network();
    let snap = db.snapshot();
    let friends: Vec<_> = TraversalDescription::new()
        .relationships("KNOWS", Direction::Outgoing)
        .at_depth(1)
        .uniqueness(Uniqueness::NodeGlobal)
        .traverse(&snap, [keys["me"]])
        .unwrap()
        .nodes()
        .collect();
    assert_eq!(friends, vec![keys["user2"], keys["user3"], keys["user4"]]);
}

#[test]
fn test_friends_depth_2() {
    let (db, _) = social_network();
    let snap = db.snapshot();
    let engine = QueryEngine::new();

    let mut friends = engine
        .friends_at_depth(&snap, &me(), 2, Exclusion::DirectNeighbors)
        .unwrap();
    // breadth-first discovery order
    assert_eq!(names(&friends), vec!["user5", "user8", "user6"]);

    order_by(&mut friends, "name");
    assert_eq!(names(&friends), vec!["user5", "user6", "user8"]);
    assert!(friends.iter().all(|r| r.depth == 2));
}

#[test]
fn test_friends_depth_2_exclusion_modes_agree() {
    let (db, _) = social_network();
    let snap = db.snapshot();
    let engine = QueryEngine::new();

    let expected = names(
        &engine
            .friends_at_depth(&snap, &me(), 2, Exclusion::DirectNeighbors)
            .unwrap(),
    )
    .into_iter()
    .map(String::from)
    .collect::<Vec<_>>();

    for exclusion in [Exclusion::None, Exclusion::AllCloser] {
        let got = engine.friends_at_depth(&snap, &me(), 2, exclusion).unwrap();
        assert_eq!(names(&got), expected);
    }
}

#[test]
fn test_friends_depth_3() {
    let (db, _) = social_network();
    let snap = db.snapshot();
    let engine = QueryEngine::new();

    // Only user7 is first reached at three hops
    let exclusive = engine
        .friends_at_depth(&snap, &me(), 3, Exclusion::AllCloser)
        .unwrap();
    assert_eq!(names(&exclusive), vec!["user7"]);

    // The pattern form reports every end of a three-hop walk
    let mut pattern = engine.pattern_at_depth(&snap, &me(), 3).unwrap();
    order_by(&mut pattern, "name");
    assert_eq!(names(&pattern), vec!["user5", "user7", "user8"]);
}

#[test]
fn test_likes_of_friends() {
    let (db, _) = social_network();
    let likes = QueryEngine::new().likes_of_friends(&db.snapshot(), &me(), 1).unwrap();

    let pairs: Vec<(&str, &str)> = likes
        .iter()
        .map(|l| (l.friend.get_str("name").unwrap(), l.liked.get_str("url").unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("user2", "http://www.web.de"),
            ("user2", "http://www.facebook.com"),
            ("user3", "http://www.web.de"),
            ("user3", "http://www.facebook.com"),
            ("user3", "http://www.twitter.com"),
            ("user4", "http://www.twitter.com"),
            ("user4", "http://www.spiegel.de"),
        ]
    );
}

#[test]
fn test_sites_most_liked_of_friends() {
    let (db, _) = social_network();
    let snap = db.snapshot();

    assert_eq!(
        urls_with_counts(&snap, 1),
        vec![
            ("http://www.web.de".to_string(), 2),
            ("http://www.facebook.com".to_string(), 2),
            ("http://www.twitter.com".to_string(), 2),
            ("http://www.spiegel.de".to_string(), 1),
        ]
    );
}

#[test]
fn test_sites_most_liked_within_two_hops() {
    let (db, _) = social_network();
    let snap = db.snapshot();

    assert_eq!(
        urls_with_counts(&snap, 2),
        vec![
            ("http://www.facebook.com".to_string(), 3),
            ("http://www.twitter.com".to_string(), 3),
            ("http://www.web.de".to_string(), 2),
            ("http://www.spiegel.de".to_string(), 2),
            ("http://www.nike.com".to_string(), 2),
            ("http://www.berlin.de".to_string(), 1),
            ("http://www.heise.de".to_string(), 1),
        ]
    );
}

#[test]
fn test_repeated_queries_are_deterministic() {
    let (db, _) = social_network();
    let snap = db.snapshot();
    let first = urls_with_counts(&snap, 2);
    for _ in 0..5 {
        assert_eq!(urls_with_counts(&snap, 2), first);
    }
}

#[test]
fn test_unknown_seed() {
    let (db, _) = social_network();
    let snap = db.snapshot();
    let engine = QueryEngine::new();

    let nobody = Seed::lookup("User", "name", "nobody");
    assert!(engine.direct_neighbors(&snap, &nobody).unwrap().is_empty());

    let err = engine
        .direct_neighbors(&snap, &Seed::Node(reachgraph::NodeId::new(1000)))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_new_friendship_changes_later_snapshots_only() {
    let (db, keys) = social_network();
    let before = db.snapshot();

    db.write(|tx| {
        tx.create_relationship(keys["me"], keys["user7"], "KNOWS")?;
        Ok::<_, GraphError>(())
    })
    .unwrap();

    let engine = QueryEngine::new();
    assert_eq!(names(&engine.direct_neighbors(&before, &me()).unwrap()).len(), 3);
    assert_eq!(
        names(&engine.direct_neighbors(&db.snapshot(), &me()).unwrap()),
        vec!["user2", "user3", "user4", "user7"]
    );
}

#[test]
fn test_reload_matches_first_load() {
    let fixture = Fixture::social_network().unwrap();
    let first = Database::in_memory();
    let second = Database::in_memory();
    fixture.load(&first).unwrap();
    fixture.load(&second).unwrap();

    let engine = QueryEngine::new();
    assert_eq!(
        engine.most_liked(&first.snapshot(), &me(), 2).unwrap(),
        engine.most_liked(&second.snapshot(), &me(), 2).unwrap()
    );
}
