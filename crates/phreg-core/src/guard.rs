//! Access control: admins may touch any record, everyone else only their own.

use crate::{
  Error, Result,
  applicant::{ApplicantId, ApplicantRecord},
};

pub const PRIVACY_MESSAGE: &str =
  "in the privacy interests of our hackers, only admins are allowed to view other users' data";

/// The caller, as re-read from the store for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
  pub id:    ApplicantId,
  pub admin: bool,
}

impl From<&ApplicantRecord> for Principal {
  fn from(r: &ApplicantRecord) -> Self { Self { id: r.id.clone(), admin: r.admin } }
}

/// How a permitted access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
  Owner,
  Admin,
}

/// Allow if the caller owns `target` or is an admin. Ownership wins when both
/// hold.
pub fn authorize(principal: &Principal, target: &ApplicantId) -> Result<Access> {
  if principal.id == *target {
    Ok(Access::Owner)
  } else if principal.admin {
    Ok(Access::Admin)
  } else {
    Err(Error::Forbidden(PRIVACY_MESSAGE))
  }
}

pub fn require_admin(principal: &Principal) -> Result<()> {
  if principal.admin {
    Ok(())
  } else {
    Err(Error::Forbidden("only admins may perform this action"))
  }
}
