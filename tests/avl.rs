use balanced_bst::avl::AvlTree;

#[test]
fn mixed_inserts_build_a_small_valid_tree() {
    let values = [50, 30, 70, 20, 40, 60, 80, 10, 25, 35, 45, 55, 65, 75, 85];

    let mut tree = AvlTree::new();
    for value in values {
        assert!(tree.insert(value));
        assert!(tree.is_valid_avl());
        assert!(tree.is_balanced());
    }

    assert_eq!(tree.size(), 15);
    assert!(tree.height() <= 4);
}

#[test]
fn ascending_run_rotates_the_root() {
    let mut tree = AvlTree::new();
    tree.insert(10);
    tree.insert(20);
    tree.insert(30);

    assert_eq!(tree.in_order(), vec![&10, &20, &30]);
    // The single left rotation lifted 20 to the root.
    assert_eq!(tree.level_order()[0], &20);
    assert_eq!(tree.parent(&10), Some(&20));
    assert_eq!(tree.parent(&30), Some(&20));
}

#[test]
fn duplicate_insert_reports_success_without_growing() {
    let mut tree = AvlTree::new();
    tree.insert(1);

    assert!(tree.insert(1));
    assert_eq!(tree.size(), 1);
}

#[test]
fn removing_a_missing_value_reports_success_on_a_non_empty_tree() {
    let mut tree = AvlTree::new();
    tree.insert(1);
    tree.insert(2);

    assert!(tree.remove(&42));
    assert_eq!(tree.size(), 2);

    let mut empty: AvlTree<i32> = AvlTree::new();
    assert!(!empty.remove(&42));
}

#[test]
fn interleaved_inserts_and_removes_stay_valid() {
    let mut tree = AvlTree::new();

    // A deterministic but scrambled order.
    for i in 0..200u32 {
        tree.insert((i * 67) % 199);
        assert!(tree.is_valid_avl());
    }
    assert_eq!(tree.size(), 199); // 67 * k mod 199 revisits 0 once

    for i in 0..100u32 {
        tree.remove(&((i * 31) % 199));
        assert!(tree.is_valid_avl());
        assert!(tree.is_balanced());
    }

    let in_order = tree.in_order();
    assert!(in_order.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn height_stays_within_the_avl_bound() {
    let mut tree = AvlTree::new();
    let n = 1000;
    for value in 0..n {
        tree.insert(value);
    }

    let bound = 1.44 * f64::from(n + 2).log2();
    assert!((tree.height() as f64) <= bound);
    assert!(tree.is_valid_avl());
}

#[test]
fn clone_round_trip() {
    let mut tree = AvlTree::new();
    for value in [5, 3, 7, 1, 4, 6, 8] {
        tree.insert(value);
    }

    let copy = tree.clone();
    assert_eq!(copy.in_order(), tree.in_order());

    tree.remove(&4);
    assert!(copy.contains(&4));
    assert!(!tree.contains(&4));
    assert_eq!(copy.size(), 7);
    assert_eq!(tree.size(), 6);
}

#[test]
fn empty_tree_queries_have_absent_sentinels() {
    let tree: AvlTree<i32> = AvlTree::new();

    assert!(tree.is_empty());
    assert_eq!(tree.size(), 0);
    assert_eq!(tree.height(), -1);
    assert_eq!(tree.min(), None);
    assert_eq!(tree.max(), None);
    assert_eq!(tree.depth(&1), None);
    assert_eq!(tree.successor(&1), None);
    assert_eq!(tree.predecessor(&1), None);
    assert!(tree.in_order().is_empty());
    assert!(tree.is_valid_avl());
    assert!(tree.is_balanced());
}
