//! Infrastructure layer: concrete adapters behind the application traits.

pub mod http;
pub mod push;
pub mod socket;
pub mod storage;
pub mod surface;
