//! # dialer-ami -- AMI gateway contract and client
//!
//! The dispatch layer reaches the telephony control protocol only through
//! the [`AmiGateway`] trait. [`AmiClient`] is the production implementation:
//! a single TCP connection to the manager interface, one action in flight
//! at a time, replies matched by `ActionID`.
//!
//! ## Operations
//!
//! | Method               | AMI action                                   |
//! |----------------------|----------------------------------------------|
//! | `add_to_queue`       | `QueueAdd`                                   |
//! | `remove_from_queue`  | `QueueRemove`                                |
//! | `queue_status`       | `QueueStatus` + `QueueMember` events         |
//! | `originate_call`     | `Originate` agent → number                   |
//! | `originate_in_queue` | `Originate` number → queue                   |
//! | `spy`                | `Originate` agent → `ChanSpy`                |
//! | `active_channels`    | `Command: sip show inuse`                    |
//! | `ping`               | `Ping`                                       |
//!
//! Action-level failures (`Response: Error`) are not errors here: they come
//! back as an ordinary [`ProtocolMessage`](dialer_core::ProtocolMessage) and
//! the envelope derivation decides what the caller sees. [`AmiError`] is
//! reserved for transport and protocol failures.

pub mod client;
pub mod codec;
pub mod error;
pub mod gateway;

pub use client::AmiClient;
pub use codec::Action;
pub use error::AmiError;
pub use gateway::AmiGateway;
