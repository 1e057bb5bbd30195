pub mod communities;
pub mod translate;
