pub mod user;
pub mod word;
pub mod exposure;

pub use user::*;
pub use word::*;
pub use exposure::*;
