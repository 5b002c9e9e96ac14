#![deny(missing_docs)]

//! # dialer-core -- Foundational Types for the Dialer Backend
//!
//! Every other crate in the workspace builds on the types defined here.
//! The crate has no internal dependencies and performs no I/O apart from
//! reading the configuration file.
//!
//! ## Design Principles
//!
//! 1. **One typed command per operation.** Each HTTP route binds its
//!    parameters into exactly one [`command`] struct. There is no untyped
//!    command value and no runtime type assertion anywhere in the stack.
//!
//! 2. **Protocol replies stay open-ended, envelopes stay uniform.** The AMI
//!    gateway answers with a [`ProtocolMessage`] (arbitrary key/value
//!    pairs). Callers only ever see a [`ResponseEnvelope`].
//!
//! 3. **The success rule is explicit.** [`envelope::envelope_from_message`]
//!    decides success by the presence of the route's [`ResultKey`] and by
//!    nothing else.
//!
//! 4. **Secrets never print.** [`SecretKey`] is zeroized on drop and
//!    redacted in `Debug`.

pub mod command;
pub mod config;
pub mod envelope;
pub mod message;

pub use command::{
    CallCommand, CallInQueueCommand, CdrDeleteCommand, CdrLookupCommand, PhoneCallCommand,
    QueueCommand,
};
pub use config::{AgencySettings, AmiSettings, ConfigError, DialerConfig, SecretKey};
pub use envelope::{envelope_from_message, EnvelopeStatus, ResponseEnvelope};
pub use message::{ProtocolMessage, ResultKey};
