//! Order ledger domain.
//!
//! - `order` - Order records written once per completed payment
//! - `status` - OrderStatus values as stored

mod order;
mod status;

pub use order::{NewOrder, Order};
pub use status::OrderStatus;
