pub mod row_set;
pub mod scalar;

pub use row_set::*;
pub use scalar::*;
