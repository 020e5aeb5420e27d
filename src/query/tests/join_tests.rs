use crate::common::Error;
use crate::errinput;
use crate::query::tests::utility::{departments, employees, Department, Employee};
use crate::query::Queryable;
use crate::types::Pair;
use itertools::Itertools;

fn left() -> Queryable<i32> {
    Queryable::from_vec(vec![1, 2, 3])
}

fn right() -> Queryable<i32> {
    Queryable::from_vec(vec![2, 3, 4])
}

fn equal(a: &i32, b: &i32) -> crate::common::Result<bool> {
    Ok(a == b)
}

#[test]
fn inner_join_emits_matches_only() {
    let joined = left().inner_join(&right(), equal).to_list().unwrap();
    assert_eq!(joined, vec![Pair::both(2, 2), Pair::both(3, 3)]);
}

#[test]
fn left_join_pads_unmatched_left_elements() {
    let joined = left().left_join(&right(), equal).to_list().unwrap();
    assert_eq!(joined, vec![Pair::left_only(1), Pair::both(2, 2), Pair::both(3, 3)]);
}

#[test]
fn right_join_mirrors_left_join_in_right_order() {
    let joined = left().right_join(&right(), equal).to_list().unwrap();
    assert_eq!(joined, vec![Pair::both(2, 2), Pair::both(3, 3), Pair::right_only(4)]);
}

#[test]
fn full_join_unions_both_outer_joins() {
    let joined = left().full_join(&right(), equal).to_list().unwrap();
    assert_eq!(
        joined,
        vec![Pair::left_only(1), Pair::both(2, 2), Pair::both(3, 3), Pair::right_only(4)]
    );
}

#[test]
fn full_join_all_keeps_the_duplicate_matches() {
    let joined = left().full_join_all(&right(), equal).to_list().unwrap();
    assert_eq!(
        joined,
        vec![
            Pair::left_only(1),
            Pair::both(2, 2),
            Pair::both(3, 3),
            Pair::both(2, 2),
            Pair::both(3, 3),
            Pair::right_only(4),
        ]
    );
}

#[test]
fn cross_join_is_the_cartesian_product() {
    let joined = left().cross_join(&right()).to_list().unwrap();
    assert_eq!(joined.len(), 9);

    let expected = vec![1, 2, 3]
        .into_iter()
        .cartesian_product(vec![2, 3, 4])
        .map(|(a, b)| Pair::both(a, b))
        .collect_vec();
    assert_eq!(joined, expected);
}

#[test]
fn duplicate_matches_emit_one_pair_per_match() {
    let a = Queryable::from_vec(vec![1]);
    let b = Queryable::from_vec(vec![1, 1]);

    assert_eq!(
        a.left_join(&b, equal).to_list().unwrap(),
        vec![Pair::both(1, 1), Pair::both(1, 1)]
    );
    assert_eq!(a.inner_join(&b, equal).count().unwrap(), 2);
}

#[test]
fn left_join_total_row_property() {
    let a = Queryable::from_vec(vec![5, 6, 7, 8]);
    let b = Queryable::from_vec(vec![6, 6, 8]);
    let joined = a.left_join(&b, equal).to_list().unwrap();

    for element in a.to_list().unwrap() {
        let rows = joined
            .iter()
            .filter(|pair| pair.left.value() == Some(&element))
            .collect_vec();
        assert!(!rows.is_empty(), "left element {element} must appear");
        if !b.to_list().unwrap().contains(&element) {
            assert_eq!(rows.len(), 1);
            assert!(rows[0].right.is_absent());
        } else {
            assert!(rows.iter().all(|pair| !pair.right.is_absent()));
        }
    }
}

#[test]
fn outer_joins_with_an_empty_side() {
    let empty = Queryable::<i32>::empty();

    let padded = left().left_join(&empty, equal).to_list().unwrap();
    assert_eq!(padded, vec![Pair::left_only(1), Pair::left_only(2), Pair::left_only(3)]);

    assert_eq!(left().inner_join(&empty, equal).to_list().unwrap(), Vec::new());
    assert_eq!(empty.left_join(&left(), equal).to_list().unwrap(), Vec::new());
}

#[test]
fn join_re_scans_its_right_side_per_left_element() {
    let b = right();
    let joined = left().left_join(&b, equal);

    // Driving the join repeatedly, and the right pipeline on its own,
    // must keep yielding the same elements: traversals restart.
    let first = joined.to_list().unwrap();
    let second = joined.to_list().unwrap();
    assert_eq!(first, second);
    assert_eq!(b.to_list().unwrap(), vec![2, 3, 4]);
    assert_eq!(b.to_list().unwrap(), vec![2, 3, 4]);
}

#[test]
fn join_predicate_failures_propagate() {
    let joined = left().inner_join(&right(), |a: &i32, b: &i32| {
        if *b == 4 {
            errinput!("cannot compare {a} to {b}")
        } else {
            Ok(a == b)
        }
    });
    assert_eq!(joined.to_list(), Err(Error::InvalidInput("cannot compare 1 to 4".to_string())));
}

#[test]
fn joins_compose_with_downstream_operators() {
    let on_department = |e: &Employee, d: &Department| Ok(e.department == d.name);

    let named = employees()
        .left_join(&departments(), on_department)
        .select(|pair| {
            let name = pair.left.value().unwrap().name;
            let floor = pair.right.value().map(|d| d.floor);
            Ok((name, floor))
        })
        .to_list()
        .unwrap();
    assert_eq!(
        named,
        vec![("Ava", Some(3)), ("Ben", Some(3)), ("Cleo", Some(1)), ("Dan", None)]
    );

    let by_department = employees()
        .right_join(&departments(), on_department)
        .select(|pair| {
            let department = pair.right.value().unwrap().name;
            let name = pair.left.value().map(|e| e.name);
            Ok((department, name))
        })
        .to_list()
        .unwrap();
    assert_eq!(
        by_department,
        vec![
            ("eng", Some("Ava")),
            ("eng", Some("Ben")),
            ("sales", Some("Cleo")),
            ("support", None),
        ]
    );
}
