use async_trait::async_trait;
use cc_domain::vm::to_tokyo;
use cc_domain::{Vm, VmStatus};
use conoha_api::{ConohaClient, NewServer, RebootKind, Rebuild, Server};
use futures_util::future::try_join;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ConohaConfig;
use crate::query::Catalog;
use crate::types::{RebuildSpec, VpsId, VpsSpec};
use crate::{Result, VpsProvider};

/// ConoHa VPS provider.
///
/// Delegates to `conoha_api::ConohaClient` for all HTTP calls.
#[derive(Clone)]
pub struct ConohaProvider {
    client: ConohaClient,
}

impl ConohaProvider {
    pub fn new(client: ConohaClient) -> Self {
        Self { client }
    }

    /// Issue a token for the configured account.
    pub async fn connect(config: &ConohaConfig) -> Result<Self> {
        let client = ConohaClient::login(&config.credentials, config.endpoints.clone()).await?;
        info!(region = %config.region, tenant_id = %config.credentials.tenant_id, "conoha: token issued");
        Ok(Self { client })
    }

    /// Load [`ConohaConfig`] from the environment, then [`connect`](Self::connect).
    pub async fn from_env() -> Result<Self> {
        let config = ConohaConfig::from_env()?;
        Self::connect(&config).await
    }

    pub fn client(&self) -> &ConohaClient {
        &self.client
    }

    /// Images and flavors, fetched concurrently.
    pub async fn catalog(&self) -> Result<Catalog> {
        let (images, flavors) =
            try_join(self.client.list_images(), self.client.list_flavors()).await?;
        debug!(images = images.len(), flavors = flavors.len(), "conoha: catalog fetched");
        Ok(Catalog::new(images, flavors))
    }

    fn to_vm(server: Server) -> Vm {
        Vm {
            status: server.status.parse().unwrap_or(VmStatus::Unknown),
            name: server.name,
            vm_id: server.id,
            created: to_tokyo(server.created),
            updated: to_tokyo(server.updated),
            image_id: server.image.id,
            flavor_id: server.flavor.id,
        }
    }
}

#[async_trait]
impl VpsProvider for ConohaProvider {
    async fn create_vps(&self, spec: &VpsSpec) -> Result<VpsId> {
        let created = self
            .client
            .create_server(&NewServer {
                flavor_ref: spec.flavor_id,
                image_ref: spec.image_id,
                admin_pass: spec.admin_pass.clone(),
                key_name: spec.key_name.clone(),
            })
            .await?;

        info!(server_id = %created.id, image_id = %spec.image_id, flavor_id = %spec.flavor_id, "conoha: server created");
        Ok(VpsId(created.id))
    }

    async fn start_vps(&self, id: &VpsId) -> Result<()> {
        self.client.start_server(&id.0).await?;
        info!(server_id = %id, "conoha: server started");
        Ok(())
    }

    async fn stop_vps(&self, id: &VpsId) -> Result<()> {
        self.client.stop_server(&id.0).await?;
        info!(server_id = %id, "conoha: server stopped");
        Ok(())
    }

    async fn reboot_vps(&self, id: &VpsId, hard: bool) -> Result<()> {
        let kind = if hard { RebootKind::Hard } else { RebootKind::Soft };
        self.client.reboot_server(&id.0, kind).await?;
        info!(server_id = %id, ?kind, "conoha: server rebooted");
        Ok(())
    }

    async fn rebuild_vps(&self, id: &VpsId, spec: &RebuildSpec) -> Result<()> {
        self.client
            .rebuild_server(
                &id.0,
                Rebuild {
                    image_ref: spec.image_id,
                    admin_pass: spec.admin_pass.clone(),
                    key_name: spec.key_name.clone(),
                },
            )
            .await?;
        info!(server_id = %id, image_id = %spec.image_id, "conoha: server rebuilding");
        Ok(())
    }

    async fn resize_vps(&self, id: &VpsId, flavor_id: &Uuid) -> Result<()> {
        self.client.resize_server(&id.0, flavor_id).await?;
        info!(server_id = %id, %flavor_id, "conoha: server resizing");
        Ok(())
    }

    async fn confirm_resize_vps(&self, id: &VpsId) -> Result<()> {
        self.client.confirm_resize(&id.0).await?;
        info!(server_id = %id, "conoha: resize confirmed");
        Ok(())
    }

    async fn snapshot_vps(&self, id: &VpsId, name: &str) -> Result<()> {
        self.client.create_image(&id.0, name).await?;
        info!(server_id = %id, image_name = name, "conoha: snapshot requested");
        Ok(())
    }

    async fn destroy_vps(&self, id: &VpsId) -> Result<()> {
        self.client.delete_server(&id.0).await?;
        info!(server_id = %id, "conoha: server destroyed");
        Ok(())
    }

    async fn get_vps(&self, id: &VpsId) -> Result<Vm> {
        let server = self.client.get_server(&id.0).await?;
        Ok(Self::to_vm(server))
    }

    async fn list_vps(&self) -> Result<Vec<Vm>> {
        let servers = self.client.list_servers().await?;
        Ok(servers.into_iter().map(Self::to_vm).collect())
    }
}
