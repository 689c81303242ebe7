pub mod payload;
pub mod record;
pub mod response;

pub use payload::*;
pub use record::*;
pub use response::*;
