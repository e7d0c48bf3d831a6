pub mod category;
pub mod link;
