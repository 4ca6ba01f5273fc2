mod config;
mod input;
mod selection;
mod tree;

pub(crate) use config::count_to_f32;
pub use config::GridConfig;
pub use input::{Direction, Key, KeyEvent, Modifiers, PointerButton, PointerEvent};
pub use selection::{Coordinate, GridBounds, SelectionRect, SelectionType};
pub use tree::{TreeNode, TreeRow};
