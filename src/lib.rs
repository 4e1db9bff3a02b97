pub use crate::avl::*;
pub use crate::bst::*;
pub use crate::heap::*;
pub use crate::item::*;

mod avl;
mod bst;
mod heap;
mod item;
pub mod loader;
