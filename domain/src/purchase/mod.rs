//! Purchase request domain
//!
//! A [`PurchaseRequest`] is the unit of work put in front of the panel.
//! Optional fields carry the same defaults as the dashboard API.

mod request;

pub use request::{
    DEFAULT_BUDGET_REMAINING, DEFAULT_EXPECTED_ROI, PurchaseRequest, Urgency, format_amount,
};
