//! Integration tests for rosters and the area list.
//!
//! Verifies:
//! - Votes stay local to one area's roster
//! - Tribe add/rename/remove reach every area
//! - Winner computation and its tie-break
//! - Removing areas, including the last one

use tribevote_protocol::{AreaId, VoteCombine};
use tribevote_tally::{AreaError, AreaList, TribeRoster};

fn winners(list: &AreaList) -> Vec<(String, String)> {
    list.compute_winners()
        .unwrap()
        .iter()
        .map(|(area, tribe)| (area.clone(), tribe.clone()))
        .collect()
}

fn pair(area: &str, tribe: &str) -> (String, String) {
    (area.to_string(), tribe.to_string())
}

// ═══════════════════════════════════════════════════════════════
// Per-area independence
// ═══════════════════════════════════════════════════════════════

#[test]
fn votes_in_new_area_do_not_leak() {
    let mut list = AreaList::new();
    list.add_tribe(1, "cat").unwrap();
    list.add_tribe(2, "dog").unwrap();
    list.add_area(10, "north").unwrap();
    list.add_area(20, "south").unwrap();
    list.add_area(30, "west").unwrap();

    list.update_vote(30, 1, 4, VoteCombine::Add).unwrap();

    assert_eq!(list.votes(30, 1), Some(4));
    assert_eq!(list.votes(10, 1), Some(0));
    assert_eq!(list.votes(20, 1), Some(0));
}

#[test]
fn remove_vote_clamps_per_area() {
    let mut list = AreaList::new();
    list.add_tribe(1, "cat").unwrap();
    list.add_area(10, "north").unwrap();
    list.update_vote(10, 1, 3, VoteCombine::Add).unwrap();
    let votes = list
        .update_vote(10, 1, 5, VoteCombine::SubtractClamped)
        .unwrap();
    assert_eq!(votes, 0);
}

// ═══════════════════════════════════════════════════════════════
// Fan-out of tribe identity
// ═══════════════════════════════════════════════════════════════

#[test]
fn rename_reaches_every_area() {
    let mut list = AreaList::new();
    list.add_tribe(3, "old name").unwrap();
    list.add_area(10, "north").unwrap();
    list.add_area(20, "south").unwrap();
    list.update_vote(20, 3, 2, VoteCombine::Add).unwrap();

    list.set_tribe_name(3, "new name").unwrap();

    assert_eq!(list.tribe_name(3), Some("new name"));
    for area_id in [10, 20] {
        let roster = list.area(area_id).unwrap().roster();
        assert_eq!(roster.name(3), Some("new name"));
    }
    assert_eq!(list.votes(20, 3), Some(2));
}

#[test]
fn tribe_added_after_areas_reaches_them_all() {
    let mut list = AreaList::new();
    list.add_area(10, "north").unwrap();
    list.add_area(20, "south").unwrap();
    list.add_tribe(5, "owls").unwrap();

    assert!(list.contains_tribe(5));
    for area in list.areas() {
        assert_eq!(area.roster().votes(5), Some(0));
    }
    assert_eq!(
        list.add_tribe(5, "owls"),
        Err(AreaError::TribeAlreadyExists(5))
    );
}

#[test]
fn remove_tribe_everywhere() {
    let mut list = AreaList::new();
    list.add_tribe(1, "cat").unwrap();
    list.add_tribe(2, "dog").unwrap();
    list.add_area(10, "north").unwrap();
    list.add_area(20, "south").unwrap();

    list.remove_tribe(2).unwrap();

    assert!(!list.contains_tribe(2));
    assert!(list.areas().all(|area| !area.roster().contains(2)));
    assert_eq!(list.remove_tribe(2), Err(AreaError::TribeNotExist(2)));
    assert_eq!(
        list.set_tribe_name(2, "ghost"),
        Err(AreaError::TribeNotExist(2))
    );
}

// ═══════════════════════════════════════════════════════════════
// Winners
// ═══════════════════════════════════════════════════════════════

#[test]
fn end_to_end_winners() {
    let mut list = AreaList::new();
    list.add_tribe(1, "cat").unwrap();
    list.add_tribe(2, "dog").unwrap();
    list.add_area(100, "north").unwrap();
    list.add_area(200, "south").unwrap();
    list.update_vote(100, 1, 5, VoteCombine::Add).unwrap();
    list.update_vote(100, 2, 3, VoteCombine::Add).unwrap();
    list.update_vote(200, 1, 1, VoteCombine::Add).unwrap();

    assert_eq!(winners(&list), vec![pair("100", "1"), pair("200", "1")]);

    list.remove_tribe(2).unwrap();
    assert_eq!(winners(&list), vec![pair("100", "1"), pair("200", "1")]);
    assert!(list.tribe_name(2).is_none());
}

#[test]
fn tie_break_prefers_smaller_tribe_id() {
    let mut roster = TribeRoster::new();
    roster.add(5, "five").unwrap();
    roster.add(2, "two").unwrap();
    roster.update_vote(5, 10, VoteCombine::Add).unwrap();
    roster.update_vote(2, 10, VoteCombine::Add).unwrap();
    assert_eq!(roster.max_votes_tribe().unwrap(), Some(2));
}

#[test]
fn unvoted_area_goes_to_smallest_id() {
    let mut list = AreaList::new();
    list.add_tribe(7, "seven").unwrap();
    list.add_tribe(3, "three").unwrap();
    list.add_area(1, "quiet").unwrap();
    assert_eq!(winners(&list), vec![pair("1", "3")]);
}

// ═══════════════════════════════════════════════════════════════
// Area removal
// ═══════════════════════════════════════════════════════════════

#[test]
fn removing_only_area_degrades_to_empty() {
    let mut list = AreaList::new();
    list.add_tribe(1, "cat").unwrap();
    list.add_area(10, "north").unwrap();
    list.update_vote(10, 1, 6, VoteCombine::Add).unwrap();

    assert_eq!(list.remove_areas(|id| id == 10), 1);
    for id in [0, 10, 11, AreaId::MAX] {
        assert!(!list.contains_area(id));
    }
    assert!(winners(&list).is_empty());

    list.add_area(10, "north").unwrap();
    assert_eq!(list.votes(10, 1), Some(0));
    assert_eq!(list.area_count(), 1);
}

#[test]
fn removing_nothing_keeps_order() {
    let mut list = AreaList::new();
    for id in [5, 1, 3] {
        list.add_area(id, "area").unwrap();
    }
    assert_eq!(list.remove_areas(|_| false), 0);
    let order: Vec<AreaId> = list.areas().map(|area| area.id()).collect();
    assert_eq!(order, vec![5, 1, 3]);
}

#[test]
fn removing_head_keeps_later_areas_addressable() {
    let mut list = AreaList::new();
    list.add_tribe(1, "cat").unwrap();
    for id in [1, 2, 3] {
        list.add_area(id, "area").unwrap();
    }
    list.update_vote(2, 1, 9, VoteCombine::Add).unwrap();
    list.remove_areas(|id| id == 1);

    assert_eq!(list.votes(2, 1), Some(9));
    list.add_area(4, "fresh").unwrap();
    assert_eq!(list.votes(4, 1), Some(0));
}
