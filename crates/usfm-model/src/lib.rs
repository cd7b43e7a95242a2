pub mod books;
pub mod marker;
pub mod document;

pub use books::*;
pub use marker::*;
pub use document::*;
