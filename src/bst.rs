use std::cmp::Ordering;
use std::mem;

use crate::item::{render_lines, Item, SortOrder};

/// Unbalanced binary search tree keyed by item name. Insertion order
/// decides the shape, so adversarial input degrades lookups to O(n);
/// `BalancedTree` is the self-balancing alternative.
#[derive(Debug, Clone, Default)]
pub struct SearchTree {
    root: Option<Box<TreeNode>>,
    size: usize,
}

#[derive(Debug, Clone)]
struct TreeNode {
    item: Item,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn new(item: Item) -> Self {
        Self {
            item,
            left: None,
            right: None,
        }
    }
}

impl SearchTree {
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

    /// Inserts by name. A duplicate name is a no-op returning false.
    pub fn insert(&mut self, item: Item) -> bool {
        let mut inserted = false;
        self.root = Some(Self::insert_node(self.root.take(), item, &mut inserted));
        if inserted {
            self.size += 1;
        }
        inserted
    }

    /// Removes by name; an absent name is a no-op returning None.
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
    pub fn iter(&self) -> TreeIter {
        TreeIter::new(self.root.as_deref())
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

    // print tree with dashes to show the tree structure
    pub fn print_tree(&self) {
        Self::print_node(&self.root, 0);
    }

    fn insert_node(node: Option<Box<TreeNode>>, item: Item, inserted: &mut bool) -> Box<TreeNode> {
        match node {
            Some(mut n) => {
                match item.compare_by_name(&n.item) {
                    Ordering::Less => {
                        n.left = Some(Self::insert_node(n.left.take(), item, inserted));
                    }
                    Ordering::Greater => {
                        n.right = Some(Self::insert_node(n.right.take(), item, inserted));
                    }
                    Ordering::Equal => {
                        // duplicate name, the first write wins
                    }
                }
                n
            }
            None => {
                *inserted = true;
                Box::new(TreeNode::new(item))
            }
        }
    }

    fn remove_node(
        node: Option<Box<TreeNode>>,
        name: &str,
        removed: &mut Option<Item>,
    ) -> Option<Box<TreeNode>> {
        let mut n = node?;
        match name.cmp(n.item.name.as_str()) {
            Ordering::Less => {
                n.left = Self::remove_node(n.left.take(), name, removed);
                Some(n)
            }
            Ordering::Greater => {
                n.right = Self::remove_node(n.right.take(), name, removed);
                Some(n)
            }
            Ordering::Equal => match (n.left.take(), n.right.take()) {
                (None, None) => {
                    *removed = Some(n.item);
                    None
                }
                (Some(child), None) | (None, Some(child)) => {
                    *removed = Some(n.item);
                    Some(child)
                }
                (Some(left), Some(right)) => {
                    // promote the in-order successor, then splice it out of
                    // the right subtree
                    let successor = Self::min_node(&right).item.name.clone();
                    let mut promoted = None;
                    n.right = Self::remove_node(Some(right), &successor, &mut promoted);
                    n.left = Some(left);
                    if let Some(item) = promoted {
                        *removed = Some(mem::replace(&mut n.item, item));
                    }
                    Some(n)
                }
            },
        }
    }

    fn find_node<'a>(node: &'a Option<Box<TreeNode>>, name: &str) -> Option<&'a TreeNode> {
        match node {
            Some(n) => match name.cmp(n.item.name.as_str()) {
                Ordering::Less => Self::find_node(&n.left, name),
                Ordering::Greater => Self::find_node(&n.right, name),
                Ordering::Equal => Some(n),
            },
            None => None,
        }
    }

    fn min_node(node: &TreeNode) -> &TreeNode {
        let mut current = node;
        while let Some(ref left) = current.left {
            current = left;
        }
        current
    }

    fn max_node(node: &TreeNode) -> &TreeNode {
        let mut current = node;
        while let Some(ref right) = current.right {
            current = right;
        }
        current
    }

    fn print_node(node: &Option<Box<TreeNode>>, level: usize) {
        if let Some(n) = node {
            Self::print_node(&n.right, level + 1);
            for _ in 0..level {
                print!("--");
            }
            println!("{}", n.item.name);
            Self::print_node(&n.left, level + 1);
        }
    }
}

pub struct TreeIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> TreeIter<'a> {
    fn new(root: Option<&'a TreeNode>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut node: Option<&'a TreeNode>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(&node.item)
    }
}

impl<'a> IntoIterator for &'a SearchTree {
    type Item = &'a Item;
    type IntoIter = TreeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
