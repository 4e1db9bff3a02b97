use std::env;

use aisle::loader::{self, LoadError};
use aisle::{BalancedTree, Polarity, PriceHeap, SearchTree, SortOrder};

fn main() -> Result<(), LoadError> {
    let path = env::args().nth(1).unwrap_or_else(|| "records.txt".to_string());

    let items = loader::load_path(&path)?;
    println!("loaded {} records from {}", items.len(), path);

    let mut bst = SearchTree::new();
    let mut avl = BalancedTree::new();
    let mut cheap_first = PriceHeap::new(Polarity::Min);

    for item in items {
        bst.insert(item.clone());
        avl.insert(item.clone());
        cheap_first.add(item);
    }

    println!("\n{} unique names, balanced height {}", avl.size(), avl.height());
    print!("{}", avl.display_in_order(SortOrder::Ascending));

    println!("\npriciest to cheapest:");
    print!("{}", bst.display_by_price(SortOrder::Descending));

    println!("\ndraining duplicates included, cheapest first:");
    while let Some(item) = cheap_first.remove_top() {
        println!("{}", item);
    }

    Ok(())
}
