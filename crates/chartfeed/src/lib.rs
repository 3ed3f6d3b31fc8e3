pub mod axis;
pub mod export;
pub mod feed;
