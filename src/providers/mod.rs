pub mod commodities;
pub mod metalprice;
pub mod open_rates;
pub mod spotgold;
