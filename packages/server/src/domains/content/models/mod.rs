pub mod comment;
pub mod photo;
pub mod reportable;

pub use comment::*;
pub use photo::*;
pub use reportable::*;
