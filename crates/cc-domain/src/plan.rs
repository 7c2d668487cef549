use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Memory size of a VM plan, in GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Memory {
    #[serde(rename = "0.5")]
    Mb512,
    #[serde(rename = "1")]
    Gb1,
    #[serde(rename = "2")]
    Gb2,
    #[serde(rename = "4")]
    Gb4,
    #[serde(rename = "8")]
    Gb8,
    #[serde(rename = "16")]
    Gb16,
    #[serde(rename = "32")]
    Gb32,
    #[serde(rename = "64")]
    Gb64,
}

impl Memory {
    pub const ALL: [Memory; 8] = [
        Memory::Mb512,
        Memory::Gb1,
        Memory::Gb2,
        Memory::Gb4,
        Memory::Gb8,
        Memory::Gb16,
        Memory::Gb32,
        Memory::Gb64,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mb512 => "0.5",
            Self::Gb1 => "1",
            Self::Gb2 => "2",
            Self::Gb4 => "4",
            Self::Gb8 => "8",
            Self::Gb16 => "16",
            Self::Gb32 => "32",
            Self::Gb64 => "64",
        }
    }

    pub fn is_smallest(&self) -> bool {
        *self == Self::Mb512
    }

    /// Fragment of the flavor name identifying this plan (`g-c2m1d100`).
    pub fn expression(&self) -> String {
        if self.is_smallest() {
            return "m512d".to_string();
        }
        format!("m{}d", self.as_str())
    }

    pub fn is_flavor(&self, flavor_name: &str) -> bool {
        flavor_name.contains(&self.expression())
    }

    /// The 512 MB plan boots 30 GB disk images, every other plan 100 GB ones.
    pub fn is_match(&self, image_name: &str) -> bool {
        if self.is_smallest() {
            return image_name.contains("30gb");
        }
        image_name.contains("100gb")
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Memory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().trim_end_matches("GB").trim_end_matches("gb");
        Self::ALL
            .into_iter()
            .find(|memory| memory.as_str() == value)
            .ok_or_else(|| Error::InvalidMemory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression() {
        assert_eq!(Memory::Mb512.expression(), "m512d");
        assert_eq!(Memory::Gb1.expression(), "m1d");
        assert_eq!(Memory::Gb2.expression(), "m2d");
        assert_eq!(Memory::Gb64.expression(), "m64d");
    }

    #[test]
    fn test_is_flavor_does_not_confuse_sizes() {
        assert!(Memory::Gb1.is_flavor("g-c2m1d100"));
        assert!(!Memory::Gb1.is_flavor("g-c2m512d30"));
        assert!(!Memory::Gb4.is_flavor("g-c24m64d100"));
        assert!(!Memory::Gb1.is_flavor("g-c8m16d100"));
    }

    #[test]
    fn test_is_match_by_disk_size() {
        assert!(Memory::Mb512.is_match("vmi-ubuntu-20.04-amd64-30gb"));
        assert!(!Memory::Mb512.is_match("vmi-ubuntu-20.04-amd64-100gb"));
        assert!(Memory::Gb8.is_match("vmi-ubuntu-20.04-amd64-100gb"));
        assert!(!Memory::Gb8.is_match("vmi-ubuntu-20.04-amd64-30gb"));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("0.5".parse::<Memory>().unwrap(), Memory::Mb512);
        assert_eq!("16".parse::<Memory>().unwrap(), Memory::Gb16);
        assert_eq!("4GB".parse::<Memory>().unwrap(), Memory::Gb4);
        assert!(matches!("3".parse::<Memory>(), Err(Error::InvalidMemory(_))));
    }

    #[test]
    fn test_serde_uses_gigabyte_values() {
        assert_eq!(serde_json::to_string(&Memory::Mb512).unwrap(), "\"0.5\"");
        assert_eq!(serde_json::from_str::<Memory>("\"32\"").unwrap(), Memory::Gb32);
    }
}
