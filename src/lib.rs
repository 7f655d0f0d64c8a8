pub mod catalog;
pub mod client;
pub mod constants;
pub mod detail_request_funcs;
pub mod feed_request_funcs;
pub mod text_parse_funcs;
pub mod types;

pub use catalog::Catalog;
pub use client::MensaClient;
pub use types::{
    Allergen, Canteen, CatalogError, CatalogSnapshot, DetailError, Ingredient, IngestionError,
    Meal, PricePair,
};
