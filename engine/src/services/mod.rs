//! Business logic services for the stock engine

pub mod decomposition;
pub mod stock;
pub mod units;

pub use decomposition::{OrderStockService, SaleDecomposer};
pub use stock::StockService;
pub use units::UnitConversionService;
