use std::fmt;

use uuid::Uuid;

/// Provider-side VM identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VpsId(pub Uuid);

impl fmt::Display for VpsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Request for creating a VM: resolved image and flavor plus access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpsSpec {
    pub flavor_id: Uuid,
    pub image_id: Uuid,
    pub admin_pass: String,
    pub key_name: Option<String>,
}

/// Request for reinstalling a VM from another image. Unset access fields
/// keep what the VM already has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildSpec {
    pub image_id: Uuid,
    pub admin_pass: Option<String>,
    pub key_name: Option<String>,
}
