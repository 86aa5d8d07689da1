//! Orders domain module.
//!
//! Pricing (line items and the total aggregator) and the admin-driven status
//! lifecycle, implemented as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod line_item;
pub mod order;
pub mod status;
pub mod totals;

pub use line_item::LineItem;
pub use order::{
    Actor, AttachTrackingNumber, ChangeStatus, Order, OrderCommand, OrderEvent, StatusChanged,
    TrackingNumberAttached,
};
pub use status::OrderStatus;
pub use totals::{OrderTotals, compute_totals};
