pub mod extract;
pub mod fetcher;
pub mod traits;

// Market source implementations
pub mod coinmarketcap;
