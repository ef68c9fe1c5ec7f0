//! Core types and logic for the hackathon registration service.
//!
//! Nothing here speaks HTTP or SQL. The applicant record, the status
//! lifecycle and the access guard are plain data and functions; storage is
//! reached only through [`store::ApplicantStore`], and [`Registrar`] wires
//! the three together for the API and the operator commands.

pub mod applicant;
pub mod directory;
pub mod error;
pub mod guard;
pub mod legacy;
pub mod lifecycle;
pub mod registrar;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
pub use registrar::{Decision, Registrar, Submission};
