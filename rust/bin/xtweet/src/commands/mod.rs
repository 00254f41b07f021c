pub mod feed;
pub mod status;
