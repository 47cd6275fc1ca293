//! The diagram source editor.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
