pub mod arithmetic;
pub mod comparison;
pub(crate) mod mutator;
pub mod trigonometry;

pub use trigonometry::Atan2;
