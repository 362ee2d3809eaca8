//! Hardware abstraction for optical spectrometers.
//!
//! The crate implements the framed binary protocol spoken by current
//! spectrometers (a 64-byte header block, optional extended payload,
//! checksum placeholder and footer) together with its query/command
//! transaction state machine. Transfer helpers adapt USB bulk endpoints,
//! RS232 lines and TCP sockets to one blocking byte interface, and
//! capability protocols route operations such as "read temperature" to the
//! wire protocol a device speaks.
//!
//! Layers, leaf first: [`transfer`], [`message`], [`transaction`],
//! [`exchange`], [`protocol`]. [`bus`] maps transfer hints to helpers and
//! [`connect`] opens a bus from a [`config::ConnectionConfig`].
//!
//! All I/O is synchronous and blocking. Helpers perform no locking, so
//! callers serialise access per connection.

pub mod bus;
pub mod config;
pub mod connect;
pub mod exchange;
pub mod identity;
pub mod legacy;
pub mod message;
pub mod protocol;
pub mod transaction;
pub mod transfer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_helpers;

pub use bus::{Bus, HelperBus};
pub use identity::{BusFamily, FeatureFamily, Hint, ProtocolFamily};
pub use message::{Message, MessageFlags, MessageType};
pub use transaction::{ProtocolError, Transaction, query_device, send_command_to_device};
pub use transfer::{TransferError, TransferHelper};
