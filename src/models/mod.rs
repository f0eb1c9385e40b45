pub mod language;
pub mod repo;
pub mod stats;
pub mod user;

pub use language::*;
pub use repo::*;
pub use stats::*;
pub use user::*;
