pub mod color;
pub mod csvline;
pub mod period;
pub mod pipeline;
pub mod record;
pub mod segment;
pub mod store;
pub mod summary;
pub mod text;
