//! Pure row-set transforms.
//!
//! Every function borrows its input and returns a freshly allocated result, so the rows
//! held by a node's `input` are never modified by running the node.

mod filter;
mod group;
mod slice;
mod sort;

pub use filter::{FilterMode, filter_rows};
pub use group::group_rows;
pub use slice::{parse_bound, slice_rows};
pub use sort::{SortOrder, sort_rows};
