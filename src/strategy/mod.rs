pub mod comparator;
pub mod traits;
