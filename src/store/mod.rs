pub mod cart;
pub mod storage;
