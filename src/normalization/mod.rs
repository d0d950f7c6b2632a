pub mod currency;
pub mod price;
