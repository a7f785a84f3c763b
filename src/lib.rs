//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// `lob_engine` is a price-time priority limit order book matching engine
// for a single instrument. It provides exact-decimal arithmetic, O(log P)
// best-price access, O(1) FIFO insertion and cancel-by-id, and the
// amendment priority rules described in the module docs below.
//
// | Module        | Description                                                           |
// |---------------|------------------------------------------------------------------------|
// | error         | `EngineError` and the crate's `Result` alias.                        |
// | ids           | Opaque `OrderId`/`TradeId` newtypes.                                 |
// | types         | `Side`, `OrderKind`, `Quote`, `Order`, `Trade`.                      |
// | price_level   | Arena-backed intrusive FIFO queue for one price.                     |
// | book          | One side of the book: price tree + order-id index.                  |
// | config        | Tick size and price rounding policy.                                 |
// | engine        | `OrderBook`: the matching algorithm and trade tape.                  |
//--------------------------------------------------------------------------------------------------

pub mod book;
pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod price_level;
pub mod types;

pub use book::Book;
pub use config::Config;
pub use engine::OrderBook;
pub use error::{EngineError, EngineResult};
pub use ids::{OrderId, TradeId};
pub use price_level::{OrderArena, OrderHandle, PriceLevel};
pub use types::{Order, OrderKind, Quote, Side, Trade};
