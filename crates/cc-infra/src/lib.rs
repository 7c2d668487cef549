pub mod add;
pub mod billing;
pub mod change;
pub mod config;
pub mod conoha;
pub mod query;
pub mod types;
pub mod watch;

use async_trait::async_trait;
use cc_domain::Vm;
use types::{RebuildSpec, VpsId, VpsSpec};
use uuid::Uuid;

pub use config::ConohaConfig;
pub use conoha::ConohaProvider;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("conoha api error: {0}")]
    Api(#[from] conoha_api::Error),

    #[error(transparent)]
    Domain(#[from] cc_domain::Error),

    #[error("missing env var: {0}")]
    MissingEnv(String),

    #[error("no image matches {0}")]
    ImageNotFound(String),

    #[error("several images match {query}: {names:?}")]
    AmbiguousImage { query: String, names: Vec<String> },

    #[error("no flavor offers {0} GB of memory")]
    FlavorNotFound(String),

    #[error("VM {id} did not become {expected} within {waited_secs}s")]
    WatchTimeout {
        id: VpsId,
        expected: cc_domain::VmStatus,
        waited_secs: u64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Lifecycle operations on the provider's VMs.
///
/// `ConohaProvider` is the only production implementation; the trait is the
/// seam commands and the status watcher are written against.
#[async_trait]
pub trait VpsProvider: Send + Sync + 'static {
    /// Request a new VM. It is usually still `BUILD` when this returns.
    async fn create_vps(&self, spec: &VpsSpec) -> Result<VpsId>;

    /// Boot a stopped VM.
    async fn start_vps(&self, id: &VpsId) -> Result<()>;

    /// Shut a running VM down.
    async fn stop_vps(&self, id: &VpsId) -> Result<()>;

    async fn reboot_vps(&self, id: &VpsId, hard: bool) -> Result<()>;

    /// Reinstall a VM from another image. The disk is wiped.
    async fn rebuild_vps(&self, id: &VpsId, spec: &RebuildSpec) -> Result<()>;

    /// Move a VM onto another flavor. The VM waits in `VERIFY_RESIZE`
    /// until [`confirm_resize_vps`](Self::confirm_resize_vps).
    async fn resize_vps(&self, id: &VpsId, flavor_id: &Uuid) -> Result<()>;

    async fn confirm_resize_vps(&self, id: &VpsId) -> Result<()>;

    /// Save the VM's disk as a private image.
    async fn snapshot_vps(&self, id: &VpsId, name: &str) -> Result<()>;

    /// Destroy a VM permanently.
    async fn destroy_vps(&self, id: &VpsId) -> Result<()>;

    async fn get_vps(&self, id: &VpsId) -> Result<Vm>;

    async fn list_vps(&self) -> Result<Vec<Vm>>;
}
