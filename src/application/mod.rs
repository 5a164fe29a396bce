// Application layer: validation and aggregation on top of the ledger store.

pub mod clock;
pub mod error;
pub mod reporting;
pub mod service;

pub use clock::*;
pub use error::*;
pub use reporting::*;
pub use service::*;
