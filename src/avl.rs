use std::cmp::Ordering;
use std::mem;

use ptree::{print_tree, TreeBuilder};

use crate::item::{render_lines, Item, SortOrder};

/// Height-balanced (AVL) search tree keyed by item name. Same external
/// contract as `SearchTree`, but every insert and remove restores the
/// balance invariant, keeping lookups O(log n).
#[derive(Debug, Clone, Default)]
pub struct BalancedTree {
    root: Option<Box<AvlNode>>,
    size: usize,
}

#[derive(Debug, Clone)]
struct AvlNode {
    item: Item,
    height: i32,
    left: Option<Box<AvlNode>>,
    right: Option<Box<AvlNode>>,
}

impl AvlNode {
    fn new(item: Item) -> Self {
        Self {
            item,
            height: 1,
            left: None,
            right: None,
        }
    }

    // an absent child counts as height 0
    fn height_of(node: &Option<Box<AvlNode>>) -> i32 {
        node.as_ref().map_or(0, |n| n.height)
    }

    fn balance_of(node: &Option<Box<AvlNode>>) -> i32 {
        node.as_ref().map_or(0, |n| n.balance_factor())
    }

    fn update_height(&mut self) {
        self.height = 1 + Self::height_of(&self.left).max(Self::height_of(&self.right));
    }

    fn balance_factor(&self) -> i32 {
        Self::height_of(&self.left) - Self::height_of(&self.right)
    }
}

impl BalancedTree {
    pub fn new() -> Self {
        Self {
            root: None,
            size: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Height of the whole tree, 0 when empty.
    pub fn height(&self) -> i32 {
        AvlNode::height_of(&self.root)
    }

    /// Inserts by name and rebalances the return path; a duplicate name is
    /// a no-op returning false.
    pub fn insert(&mut self, item: Item) -> bool {
        let mut inserted = false;
        self.root = Some(Self::insert_node(self.root.take(), item, &mut inserted));
        if inserted {
            self.size += 1;
        }
        inserted
    }

    /// Removes by name, rebalancing the path back up; an absent name is a
    /// no-op returning None.
    pub fn remove(&mut self, name: &str) -> Option<Item> {
        let mut removed = None;
        self.root = Self::remove_node(self.root.take(), name, &mut removed);
        if removed.is_some() {
            self.size -= 1;
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        Self::find_node(&self.root, name).map(|node| &node.item)
    }

    pub fn min(&self) -> Option<&Item> {
        self.root.as_deref().map(|node| &Self::min_node(node).item)
    }

    pub fn max(&self) -> Option<&Item> {
        self.root.as_deref().map(|node| &Self::max_node(node).item)
    }

    /// In-order iteration, names ascending.
    pub fn iter(&self) -> BalancedIter {
        BalancedIter::new(self.root.as_deref())
    }

    /// All items in name order; descending reverses the collected sequence.
    pub fn items_in_order(&self, order: SortOrder) -> Vec<Item> {
        let mut items: Vec<Item> = self.iter().cloned().collect();
        if order == SortOrder::Descending {
            items.reverse();
        }
        items
    }

    /// All items re-sorted by price, independent of tree shape. The sort is
    /// stable, so price ties keep their name order in both directions.
    pub fn items_by_price(&self, order: SortOrder) -> Vec<Item> {
        let mut items: Vec<Item> = self.iter().cloned().collect();
        items.sort_by(|a, b| order.apply(a.compare_by_price(b)));
        items
    }

    pub fn display(&self) -> String {
        render_lines(self.iter())
    }

    pub fn display_in_order(&self, order: SortOrder) -> String {
        render_lines(&self.items_in_order(order))
    }

    pub fn display_by_price(&self, order: SortOrder) -> String {
        render_lines(&self.items_by_price(order))
    }

    /// Prints the tree shape with per-node heights.
    pub fn print_tree(&self) {
        let mut tree = TreeBuilder::new("catalog".to_string());
        Self::print_node(&self.root, &mut tree);
        print_tree(&tree.build()).unwrap();
    }

    fn insert_node(node: Option<Box<AvlNode>>, item: Item, inserted: &mut bool) -> Box<AvlNode> {
        let mut n = match node {
            Some(n) => n,
            None => {
                *inserted = true;
                return Box::new(AvlNode::new(item));
            }
        };

        let name = item.name.clone();
        match item.compare_by_name(&n.item) {
            Ordering::Less => {
                n.left = Some(Self::insert_node(n.left.take(), item, inserted));
            }
            Ordering::Greater => {
                n.right = Some(Self::insert_node(n.right.take(), item, inserted));
            }
            Ordering::Equal => {
                // duplicate name, nothing changed below
                return n;
            }
        }

        n.update_height();
        Self::rebalance_after_insert(n, &name)
    }

    // one of four cases, picked by the balance sign and where the new name
    // landed relative to the unbalanced node's child
    fn rebalance_after_insert(mut node: Box<AvlNode>, name: &str) -> Box<AvlNode> {
        let balance = node.balance_factor();

        if balance > 1 {
            // balance > 1 implies the left child exists
            if name < node.left.as_ref().unwrap().item.name.as_str() {
                return Self::rotate_right(node);
            }
            node.left = Some(Self::rotate_left(node.left.take().unwrap()));
            return Self::rotate_right(node);
        }

        if balance < -1 {
            if name > node.right.as_ref().unwrap().item.name.as_str() {
                return Self::rotate_left(node);
            }
            node.right = Some(Self::rotate_right(node.right.take().unwrap()));
            return Self::rotate_left(node);
        }

        node
    }

    fn remove_node(
        node: Option<Box<AvlNode>>,
        name: &str,
        removed: &mut Option<Item>,
    ) -> Option<Box<AvlNode>> {
        let mut n = node?;
        match name.cmp(n.item.name.as_str()) {
            Ordering::Less => {
                n.left = Self::remove_node(n.left.take(), name, removed);
            }
            Ordering::Greater => {
                n.right = Self::remove_node(n.right.take(), name, removed);
            }
            Ordering::Equal => {
                return match (n.left.take(), n.right.take()) {
                    (None, None) => {
                        *removed = Some(n.item);
                        None
                    }
                    // a spliced-in child subtree is untouched inside, so it
                    // is already balanced and its height still holds
                    (Some(child), None) | (None, Some(child)) => {
                        *removed = Some(n.item);
                        Some(child)
                    }
                    (Some(left), Some(right)) => {
                        // promote the in-order successor, then splice it out
                        // of the right subtree
                        let successor = Self::min_node(&right).item.name.clone();
                        let mut promoted = None;
                        n.right = Self::remove_node(Some(right), &successor, &mut promoted);
                        n.left = Some(left);
                        if let Some(item) = promoted {
                            *removed = Some(mem::replace(&mut n.item, item));
                        }
                        n.update_height();
                        Some(Self::rebalance_after_remove(n))
                    }
                };
            }
        }

        n.update_height();
        Some(Self::rebalance_after_remove(n))
    }

    // the removed key no longer exists to compare against, so the rotation
    // case comes from the child's current balance factor
    fn rebalance_after_remove(mut node: Box<AvlNode>) -> Box<AvlNode> {
        let balance = node.balance_factor();

        if balance > 1 {
            if AvlNode::balance_of(&node.left) >= 0 {
                return Self::rotate_right(node);
            }
            node.left = Some(Self::rotate_left(node.left.take().unwrap()));
            return Self::rotate_right(node);
        }

        if balance < -1 {
            if AvlNode::balance_of(&node.right) <= 0 {
                return Self::rotate_left(node);
            }
            node.right = Some(Self::rotate_right(node.right.take().unwrap()));
            return Self::rotate_left(node);
        }

        node
    }

    // re-parents exactly one subtree and recomputes the two touched heights
    fn rotate_right(mut node: Box<AvlNode>) -> Box<AvlNode> {
        let mut new_root = node.left.take().unwrap();
        node.left = new_root.right.take();
        node.update_height();

        new_root.right = Some(node);
        new_root.update_height();

        new_root
    }

    fn rotate_left(mut node: Box<AvlNode>) -> Box<AvlNode> {
        let mut new_root = node.right.take().unwrap();
        node.right = new_root.left.take();
        node.update_height();

        new_root.left = Some(node);
        new_root.update_height();

        new_root
    }

    fn find_node<'a>(node: &'a Option<Box<AvlNode>>, name: &str) -> Option<&'a AvlNode> {
        match node {
            Some(n) => match name.cmp(n.item.name.as_str()) {
                Ordering::Less => Self::find_node(&n.left, name),
                Ordering::Greater => Self::find_node(&n.right, name),
                Ordering::Equal => Some(n),
            },
            None => None,
        }
    }

    fn min_node(node: &AvlNode) -> &AvlNode {
        let mut current = node;
        while let Some(ref left) = current.left {
            current = left;
        }
        current
    }

    fn max_node(node: &AvlNode) -> &AvlNode {
        let mut current = node;
        while let Some(ref right) = current.right {
            current = right;
        }
        current
    }

    fn print_node(node: &Option<Box<AvlNode>>, tree: &mut TreeBuilder) {
        if let Some(n) = node {
            tree.begin_child(format!("{} (h={})", n.item.name, n.height));
            Self::print_node(&n.left, tree);
            Self::print_node(&n.right, tree);
            tree.end_child();
        }
    }
}

pub struct BalancedIter<'a> {
    stack: Vec<&'a AvlNode>,
}

impl<'a> BalancedIter<'a> {
    fn new(root: Option<&'a AvlNode>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut node: Option<&'a AvlNode>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for BalancedIter<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(&node.item)
    }
}

impl<'a> IntoIterator for &'a BalancedTree {
    type Item = &'a Item;
    type IntoIter = BalancedIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use fake::faker::lorem::en::Words;
    use fake::Fake;
    use rand::prelude::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::avl::{AvlNode, BalancedTree};
    use crate::item::{Item, SortOrder};

    fn item(name: &str) -> Item {
        Item::new(name, "Misc", 1)
    }

    fn root_layout(tree: &BalancedTree) -> (&str, Option<&str>, Option<&str>) {
        let root = tree.root.as_ref().unwrap();
        (
            root.item.name.as_str(),
            root.left.as_ref().map(|n| n.item.name.as_str()),
            root.right.as_ref().map(|n| n.item.name.as_str()),
        )
    }

    // recomputes heights and balance factors over the whole tree
    fn assert_invariants(tree: &BalancedTree) {
        fn check(node: &Option<Box<AvlNode>>) -> i32 {
            match node {
                Some(n) => {
                    let left = check(&n.left);
                    let right = check(&n.right);
                    assert_eq!(n.height, 1 + left.max(right), "stale height at {}", n.item.name);
                    assert!(
                        (left - right).abs() <= 1,
                        "balance broken at {}: {} vs {}",
                        n.item.name,
                        left,
                        right
                    );
                    if let Some(ref l) = n.left {
                        assert!(l.item.name < n.item.name);
                    }
                    if let Some(ref r) = n.right {
                        assert!(r.item.name > n.item.name);
                    }
                    n.height
                }
                None => 0,
            }
        }

        check(&tree.root);
    }

    #[test]
    fn test_insert_ascending_triggers_left_rotation() {
        let mut tree = BalancedTree::new();
        for name in ["A", "B", "C"] {
            tree.insert(item(name));
        }

        assert_eq!(root_layout(&tree), ("B", Some("A"), Some("C")));
        assert_eq!(tree.height(), 2);
        assert_invariants(&tree);
    }

    #[test]
    fn test_insert_descending_triggers_right_rotation() {
        let mut tree = BalancedTree::new();
        for name in ["C", "B", "A"] {
            tree.insert(item(name));
        }

        assert_eq!(root_layout(&tree), ("B", Some("A"), Some("C")));
        assert_eq!(tree.height(), 2);
        assert_invariants(&tree);
    }

    #[test]
    fn test_insert_left_right_double_rotation() {
        let mut tree = BalancedTree::new();
        for name in ["C", "A", "B"] {
            tree.insert(item(name));
        }

        assert_eq!(root_layout(&tree), ("B", Some("A"), Some("C")));
        assert_invariants(&tree);
    }

    #[test]
    fn test_insert_right_left_double_rotation() {
        let mut tree = BalancedTree::new();
        for name in ["A", "C", "B"] {
            tree.insert(item(name));
        }

        assert_eq!(root_layout(&tree), ("B", Some("A"), Some("C")));
        assert_invariants(&tree);
    }

    #[test]
    fn test_remove_triggers_single_rotation() {
        let mut tree = BalancedTree::new();
        for name in ["a", "b", "c", "d"] {
            tree.insert(item(name));
        }

        // removing "a" leaves the root right heavy with an even right child
        assert_eq!(tree.remove("a").map(|i| i.name), Some("a".to_string()));
        assert_eq!(root_layout(&tree), ("c", Some("b"), Some("d")));
        assert_eq!(tree.size(), 3);
        assert_invariants(&tree);
    }

    #[test]
    fn test_remove_triggers_double_rotation() {
        let mut tree = BalancedTree::new();
        for name in ["b", "a", "d", "c"] {
            tree.insert(item(name));
        }

        // removing "a" leaves the root right heavy with a left-heavy right
        // child, which needs the right-left double rotation
        assert_eq!(tree.remove("a").map(|i| i.name), Some("a".to_string()));
        assert_eq!(root_layout(&tree), ("c", Some("b"), Some("d")));
        assert_invariants(&tree);
    }

    #[test]
    fn test_remove_two_child_node_promotes_successor() {
        let mut tree = BalancedTree::new();
        for name in ["d", "b", "f", "a", "c", "e", "g"] {
            tree.insert(item(name));
        }

        assert_eq!(tree.remove("d").map(|i| i.name), Some("d".to_string()));

        let names: Vec<&str> = tree.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "e", "f", "g"]);
        assert!(!tree.contains("d"));
        assert_eq!(root_layout(&tree).0, "e");
        assert_invariants(&tree);
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut tree = BalancedTree::new();
        assert!(tree.insert(Item::new("Apple", "Food", 5)));
        assert!(!tree.insert(Item::new("Apple", "Fruit", 99)));

        assert_eq!(tree.size(), 1);
        assert_eq!(tree.get("Apple").map(|i| i.price), Some(5));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut tree = BalancedTree::new();
        tree.insert(item("a"));

        assert_eq!(tree.remove("z"), None);
        assert_eq!(tree.size(), 1);
        assert_invariants(&tree);
    }

    #[test]
    fn test_sorted_inserts_stay_logarithmic() {
        let mut tree = BalancedTree::new();
        for i in 0..100 {
            tree.insert(item(&format!("item-{:03}", i)));
        }

        assert_eq!(tree.size(), 100);
        // worst-case AVL height for 100 nodes is 9
        assert!(tree.height() <= 9, "height {} too large", tree.height());
        assert_invariants(&tree);
    }

    #[test]
    fn test_invariants_under_random_inserts_and_removes() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let words: Vec<String> = Words(120..121).fake_with_rng(&mut rng);

        let mut tree = BalancedTree::new();
        let mut expected: BTreeSet<String> = BTreeSet::new();

        for word in &words {
            let inserted = tree.insert(Item::new(word, "Lorem", 1));
            assert_eq!(inserted, expected.insert(word.clone()));
            assert_invariants(&tree);
        }
        assert_eq!(tree.size(), expected.len());

        let mut victims = words.clone();
        victims.shuffle(&mut rng);
        for word in victims.iter().take(60) {
            let removed = tree.remove(word);
            assert_eq!(removed.is_some(), expected.remove(word.as_str()));
            assert_invariants(&tree);
        }

        let in_order: Vec<&str> = tree.iter().map(|i| i.name.as_str()).collect();
        let sorted: Vec<&str> = expected.iter().map(|s| s.as_str()).collect();
        assert_eq!(in_order, sorted);
        assert_eq!(tree.size(), expected.len());
        assert_eq!(tree.min().map(|i| i.name.as_str()), sorted.first().copied());
        assert_eq!(tree.max().map(|i| i.name.as_str()), sorted.last().copied());
    }

    #[test]
    fn test_display_matches_search_tree_contract() {
        let mut tree = BalancedTree::new();
        tree.insert(Item::new("Bread", "Food", 3));
        tree.insert(Item::new("Apple", "Food", 5));
        tree.insert(Item::new("Milk", "Dairy", 2));

        assert_eq!(
            tree.display(),
            "Item Name: Apple, Category: Food, Price: 5\n\
             Item Name: Bread, Category: Food, Price: 3\n\
             Item Name: Milk, Category: Dairy, Price: 2\n"
        );

        let by_price: Vec<i32> = tree
            .items_by_price(SortOrder::Ascending)
            .iter()
            .map(|i| i.price)
            .collect();
        assert_eq!(by_price, vec![2, 3, 5]);

        let reversed: Vec<String> = tree
            .items_in_order(SortOrder::Descending)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(reversed, vec!["Milk", "Bread", "Apple"]);
    }

    #[test]
    fn test_empty_tree() {
        let mut tree = BalancedTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.display(), "");
        assert_eq!(tree.remove("anything"), None);
    }
}
