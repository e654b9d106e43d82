/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public tickwire adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod error;
pub mod format;
pub mod ws;

pub use error::{Result, SocketError};

// Re-export commonly used types from format
pub use format::{
    format_decimal,
    format_number,
    FormatOptions,
    NumberFormatter,
    NumberLocale,
};

// Re-export commonly used types from ws
pub use ws::{
    create_connection,
    extract_data,
    ConnectionConfig,
    ConnectionHandle,
    ConnectionState,
};
