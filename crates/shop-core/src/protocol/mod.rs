//! Realtime channel wire protocol: JSON event frames and their codec.
//!
//! Wire format (one WebSocket text frame per event):
//!
//! ```json
//! {"event": "orderStatusChanged", "data": {"orderId": "O1", "status": "delivered"}}
//! ```
//!
//! The first frame the server sends after the socket opens is
//! `{"event":"connect","data":{"socketId":"..."}}`, which carries the
//! connection id the client must echo in `registerUser`/`unregisterUser`.

pub mod codec;
pub mod events;

pub use codec::{decode_frame, encode_frame, ProtocolError};
pub use events::*;
