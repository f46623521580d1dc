//! Exposures of the facture host
//!
//! - [`PageExposure`]: the page itself and the form endpoints behind it
//! - [`WebSocketExposure`]: the real-time table stream

pub mod page;
pub mod websocket;

pub use page::PageExposure;
pub use websocket::WebSocketExposure;
