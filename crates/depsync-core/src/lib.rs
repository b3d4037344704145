mod category;
pub mod types;

pub use category::{ChangeCategory, UnknownCategory};
pub use types::*;
