use cc_domain::{Application, Version};
use tracing::info;

use crate::query::{Catalog, DistQuery};
use crate::types::{VpsId, VpsSpec};
use crate::{Result, VpsProvider};

/// Request for a new VM, expressed in catalog terms.
#[derive(Debug, Clone)]
pub struct AddVm {
    pub query: DistQuery,
    pub version: Version,
    pub app: Application,
    pub admin_pass: String,
    pub key_name: Option<String>,
}

impl AddVm {
    /// Resolve the image and flavor UUIDs the provider expects.
    pub fn spec(&self, catalog: &Catalog) -> Result<VpsSpec> {
        Ok(VpsSpec {
            flavor_id: self.query.flavor_id(catalog)?,
            image_id: self.query.image_id(catalog, &self.version, &self.app)?,
            admin_pass: self.admin_pass.clone(),
            key_name: self.key_name.clone(),
        })
    }

    pub async fn run(&self, provider: &dyn VpsProvider, catalog: &Catalog) -> Result<VpsId> {
        let spec = self.spec(catalog)?;
        info!(
            memory = %self.query.memory,
            os = %self.query.os,
            version = %self.version,
            app = %self.app,
            "adding VM"
        );
        provider.create_vps(&spec).await
    }
}
