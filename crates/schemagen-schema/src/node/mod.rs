mod field;
mod level;
mod type_node;

pub use field::*;
pub use level::*;
pub use type_node::*;
