pub mod card;
pub mod grid;
pub mod layout;
pub mod mini_cart;
pub mod primitives;
pub mod templates;
