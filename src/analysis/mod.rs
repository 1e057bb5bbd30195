pub mod demon;
pub mod ego;
pub mod merge;
pub mod propagation;
