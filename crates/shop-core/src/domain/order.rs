//! Order status vocabulary.
//!
//! The server reports order transitions as plain strings.  [`OrderState`]
//! gives them a display label so the client can phrase an in-app message;
//! statuses the client does not recognise are shown verbatim.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderState {
    Pending,
    Confirmed,
    Shipping,
    Delivered,
    Cancelled,
}

impl OrderState {
    pub const ALL: [OrderState; 5] = [
        OrderState::Pending,
        OrderState::Confirmed,
        OrderState::Shipping,
        OrderState::Delivered,
        OrderState::Cancelled,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            OrderState::Pending => "Pending",
            OrderState::Confirmed => "Confirmed",
            OrderState::Shipping => "Shipping",
            OrderState::Delivered => "Delivered",
            OrderState::Cancelled => "Cancelled",
        }
    }

    /// Lower-case label used inside sentences.
    pub fn describe(status: &str) -> String {
        match status.parse::<OrderState>() {
            Ok(state) => state.label().to_lowercase(),
            Err(_) => status.to_string(),
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognised status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrderState(pub String);

impl FromStr for OrderState {
    type Err = UnknownOrderState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderState::Pending),
            "confirmed" => Ok(OrderState::Confirmed),
            "shipping" | "shipped" => Ok(OrderState::Shipping),
            "delivered" => Ok(OrderState::Delivered),
            "cancelled" | "canceled" => Ok(OrderState::Cancelled),
            _ => Err(UnknownOrderState(s.to_string())),
        }
    }
}
