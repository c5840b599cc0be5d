pub mod book;
pub mod publisher;
pub mod sale;
pub mod shop;
pub mod stock;

pub use book::BookFields;
pub use publisher::PublisherFields;
pub use sale::SaleFields;
pub use shop::ShopFields;
pub use stock::StockFields;
