pub mod money;
pub mod net;
pub mod slug;
