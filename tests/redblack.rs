use balanced_bst::redblack::RedBlackTree;

#[test]
fn mixed_inserts_build_a_small_valid_tree() {
    let values = [10, 5, 15, 3, 7, 12, 17];

    let mut tree = RedBlackTree::new();
    for value in values {
        assert!(tree.insert(value));
        assert!(tree.is_valid_red_black());
    }
    assert_eq!(tree.size(), 7);

    // No red node may have a red child, checked through the public surface.
    for value in values.iter() {
        if tree.is_red(value) {
            for child in tree.children(value) {
                assert!(tree.is_black(child));
            }
        }
    }
}

#[test]
fn removing_the_root_of_a_three_node_tree_stays_valid() {
    let mut tree = RedBlackTree::new();
    for value in [5, 3, 7] {
        tree.insert(value);
    }

    assert!(tree.remove(&5));

    assert_eq!(tree.size(), 2);
    assert_eq!(tree.in_order(), vec![&3, &7]);
    assert!(tree.is_valid_red_black());
}

#[test]
fn duplicate_insert_is_rejected() {
    let mut tree = RedBlackTree::new();
    tree.insert(1);

    assert!(!tree.insert(1));
    assert_eq!(tree.size(), 1);
}

#[test]
fn removing_a_missing_value_is_rejected() {
    let mut tree = RedBlackTree::new();
    tree.insert(1);

    assert!(!tree.remove(&42));
    assert_eq!(tree.size(), 1);
}

#[test]
fn interleaved_inserts_and_removes_stay_valid() {
    let mut tree = RedBlackTree::new();

    // A deterministic but scrambled order.
    for i in 0..200u32 {
        tree.insert((i * 67) % 199);
        assert!(tree.is_valid_red_black());
    }
    assert_eq!(tree.size(), 199); // 67 * k mod 199 revisits 0 once

    for i in 0..100u32 {
        tree.remove(&((i * 31) % 199));
        assert!(tree.is_valid_red_black());
    }

    let in_order = tree.in_order();
    assert!(in_order.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn height_stays_within_the_red_black_bound() {
    let mut tree = RedBlackTree::new();
    let n = 1000;
    for value in 0..n {
        tree.insert(value);
    }

    let bound = 2.0 * f64::from(n + 1).log2();
    assert!((tree.height() as f64) <= bound);
    assert!(tree.is_valid_red_black());
}

#[test]
fn clone_round_trip() {
    let mut tree = RedBlackTree::new();
    for value in [5, 3, 7, 1, 4, 6, 8] {
        tree.insert(value);
    }

    let copy = tree.clone();
    assert_eq!(copy.in_order(), tree.in_order());
    assert!(copy.is_valid_red_black());

    tree.remove(&4);
    assert!(copy.contains(&4));
    assert!(!tree.contains(&4));
    assert_eq!(copy.size(), 7);
    assert_eq!(tree.size(), 6);
}

#[test]
fn empty_tree_queries_have_absent_sentinels() {
    let tree: RedBlackTree<i32> = RedBlackTree::new();

    assert!(tree.is_empty());
    assert_eq!(tree.size(), 0);
    assert_eq!(tree.height(), -1);
    assert_eq!(tree.min(), None);
    assert_eq!(tree.max(), None);
    assert_eq!(tree.depth(&1), None);
    assert_eq!(tree.color(&1), None);
    assert_eq!(tree.successor(&1), None);
    assert_eq!(tree.predecessor(&1), None);
    assert!(tree.in_order().is_empty());
    assert!(tree.is_valid_red_black());
}
