use serde::{Deserialize, Serialize};
use std::fmt;

/// Valid range for `app_id`.
pub const APP_ID_MIN: i64 = 1;
pub const APP_ID_MAX: i64 = 999_999_999;

/// The identifier of one Application Unit. Always a validated
/// 32-bit positive integer in `[1, 999_999_999]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppId(i64);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AppIdError {
    #[error("app_id {0} is out of range [{APP_ID_MIN}, {APP_ID_MAX}]")]
    OutOfRange(i64),
}

impl AppId {
    pub fn new(value: i64) -> Result<Self, AppIdError> {
        if (APP_ID_MIN..=APP_ID_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AppIdError::OutOfRange(value))
        }
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    /// The residue used by partitioned concurrent instances.
    pub fn partition_of(&self, modulo: u32) -> u32 {
        if modulo <= 1 {
            0
        } else {
            (self.0.rem_euclid(modulo as i64)) as u32
        }
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for AppId {
    type Error = AppIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        AppId::new(value)
    }
}
