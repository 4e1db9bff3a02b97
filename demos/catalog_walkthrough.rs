use aisle::{BalancedTree, Item, Polarity, PriceHeap, SearchTree, SortKey, SortOrder};

fn main() {
    let stock = [
        ("Bread", "Food", 3),
        ("Apple", "Food", 5),
        ("Milk", "Dairy", 2),
        ("Cheese", "Dairy", 8),
        ("Honey", "Pantry", 6),
    ];

    let mut bst = SearchTree::new();
    let mut avl = BalancedTree::new();
    let mut heap = PriceHeap::new(Polarity::Min);

    for (name, category, price) in stock {
        bst.insert(Item::new(name, category, price));
        avl.insert(Item::new(name, category, price));
        heap.add(Item::new(name, category, price));
    }

    println!("search tree, names ascending:");
    print!("{}", bst.display_in_order(SortOrder::Ascending));

    println!("\nsearch tree shape:");
    bst.print_tree();

    println!("\nsearch tree, price descending:");
    print!("{}", bst.display_by_price(SortOrder::Descending));

    println!("\nbalanced tree (height {}):", avl.height());
    print!("{}", avl.display());
    avl.print_tree();

    println!("\nheap in array order:");
    print!("{}", heap.display());

    println!("\nheap sorted by name descending:");
    print!("{}", heap.display_by(SortKey::Name, SortOrder::Descending));

    bst.remove("Bread");
    avl.remove("Bread");
    assert_eq!(bst.size(), avl.size());

    println!("\nafter dropping Bread:");
    print!("{}", bst.display());

    println!("\ndraining the heap cheapest first:");
    while let Some(item) = heap.remove_top() {
        println!("{}", item);
    }
}
