use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

const TOKYO_OFFSET_SECS: i32 = 9 * 3600;

/// Converts a provider timestamp to Japan Standard Time.
pub fn to_tokyo(at: DateTime<Utc>) -> DateTime<FixedOffset> {
    match FixedOffset::east_opt(TOKYO_OFFSET_SECS) {
        Some(tz) => at.with_timezone(&tz),
        None => at.fixed_offset(),
    }
}

/// Provider-reported server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VmStatus {
    Active,
    Shutoff,
    Reboot,
    Build,
    Rebuild,
    Resize,
    #[serde(rename = "VERIFY_RESIZE")]
    VerifyResize,
    #[serde(other)]
    Unknown,
}

impl VmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Shutoff => "SHUTOFF",
            Self::Reboot => "REBOOT",
            Self::Build => "BUILD",
            Self::Rebuild => "REBUILD",
            Self::Resize => "RESIZE",
            Self::VerifyResize => "VERIFY_RESIZE",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn is_shutoff(&self) -> bool {
        *self == Self::Shutoff
    }
}

impl fmt::Display for VmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VmStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "ACTIVE" => Self::Active,
            "SHUTOFF" => Self::Shutoff,
            "REBOOT" | "HARD_REBOOT" => Self::Reboot,
            "BUILD" => Self::Build,
            "REBUILD" => Self::Rebuild,
            "RESIZE" => Self::Resize,
            "VERIFY_RESIZE" => Self::VerifyResize,
            _ => Self::Unknown,
        })
    }
}

/// A contracted server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vm {
    pub name: String,
    pub vm_id: Uuid,
    pub status: VmStatus,
    pub created: DateTime<FixedOffset>,
    pub updated: DateTime<FixedOffset>,
    pub image_id: Uuid,
    pub flavor_id: Uuid,
}

impl Vm {
    /// ConoHa names servers after their public address (`160-251-1-2`).
    pub fn ipv4(&self) -> Result<Ipv4Addr> {
        self.name
            .replace('-', ".")
            .parse()
            .map_err(|_| Error::InvalidAddress(self.name.clone()))
    }
}
