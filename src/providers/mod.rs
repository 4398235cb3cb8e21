pub mod fixer;
pub mod util;

pub use fixer::FixerProvider;
