//! Changing an existing VM: rebuild onto another image, resize onto another plan.

use cc_domain::{Application, Memory, Version, VmStatus};
use tracing::info;

use crate::query::{Catalog, DistQuery};
use crate::types::{RebuildSpec, VpsId};
use crate::watch::Watcher;
use crate::{Result, VpsProvider};

/// Reinstall request, expressed in catalog terms like [`AddVm`](crate::add::AddVm).
#[derive(Debug, Clone)]
pub struct RebuildVm {
    pub query: DistQuery,
    pub version: Version,
    pub app: Application,
    pub admin_pass: Option<String>,
    pub key_name: Option<String>,
}

impl RebuildVm {
    pub fn spec(&self, catalog: &Catalog) -> Result<RebuildSpec> {
        Ok(RebuildSpec {
            image_id: self.query.image_id(catalog, &self.version, &self.app)?,
            admin_pass: self.admin_pass.clone(),
            key_name: self.key_name.clone(),
        })
    }

    pub async fn run(&self, provider: &dyn VpsProvider, catalog: &Catalog, id: &VpsId) -> Result<()> {
        let spec = self.spec(catalog)?;
        info!(
            server_id = %id,
            os = %self.query.os,
            version = %self.version,
            app = %self.app,
            "rebuilding VM"
        );
        provider.rebuild_vps(id, &spec).await
    }
}

/// Move a VM onto the flavor of another memory plan and confirm it.
#[derive(Debug, Clone, Copy)]
pub struct ResizeVm {
    pub memory: Memory,
    /// Polls for `VERIFY_RESIZE` before confirming.
    pub verify: Watcher,
}

impl ResizeVm {
    pub fn new(memory: Memory) -> Self {
        Self {
            memory,
            verify: Watcher::new(VmStatus::VerifyResize),
        }
    }

    pub async fn run(&self, provider: &dyn VpsProvider, catalog: &Catalog, id: &VpsId) -> Result<()> {
        let flavor_id = catalog.flavor_id(self.memory)?;
        info!(server_id = %id, memory = %self.memory, %flavor_id, "resizing VM");

        provider.resize_vps(id, &flavor_id).await?;
        self.verify.wait(provider, id).await?;
        provider.confirm_resize_vps(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use cc_domain::vm::to_tokyo;
    use cc_domain::{Os, Vm};
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::query::tests::catalog;
    use crate::types::VpsSpec;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Rebuild(RebuildSpec),
        Resize(Uuid),
        Confirm,
    }

    /// Records changes and reports `status` on every poll.
    struct RecordingProvider {
        status: VmStatus,
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingProvider {
        fn new(status: VmStatus) -> Self {
            Self {
                status,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VpsProvider for RecordingProvider {
        async fn create_vps(&self, _spec: &VpsSpec) -> Result<VpsId> {
            unimplemented!()
        }

        async fn start_vps(&self, _id: &VpsId) -> Result<()> {
            unimplemented!()
        }

        async fn stop_vps(&self, _id: &VpsId) -> Result<()> {
            unimplemented!()
        }

        async fn reboot_vps(&self, _id: &VpsId, _hard: bool) -> Result<()> {
            unimplemented!()
        }

        async fn rebuild_vps(&self, _id: &VpsId, spec: &RebuildSpec) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Rebuild(spec.clone()));
            Ok(())
        }

        async fn resize_vps(&self, _id: &VpsId, flavor_id: &Uuid) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Resize(*flavor_id));
            Ok(())
        }

        async fn confirm_resize_vps(&self, _id: &VpsId) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Confirm);
            Ok(())
        }

        async fn snapshot_vps(&self, _id: &VpsId, _name: &str) -> Result<()> {
            unimplemented!()
        }

        async fn destroy_vps(&self, _id: &VpsId) -> Result<()> {
            unimplemented!()
        }

        async fn get_vps(&self, id: &VpsId) -> Result<Vm> {
            let now = to_tokyo(Utc::now());
            Ok(Vm {
                name: "160-251-1-2".into(),
                vm_id: id.0,
                status: self.status,
                created: now,
                updated: now,
                image_id: Uuid::nil(),
                flavor_id: Uuid::nil(),
            })
        }

        async fn list_vps(&self) -> Result<Vec<Vm>> {
            unimplemented!()
        }
    }

    fn resize(memory: Memory, timeout: Duration) -> ResizeVm {
        let mut resize = ResizeVm::new(memory);
        resize.verify = resize
            .verify
            .with_interval(Duration::from_millis(5))
            .with_timeout(timeout);
        resize
    }

    #[tokio::test]
    async fn test_rebuild_resolves_image_and_keeps_access_unset() {
        let catalog = catalog();
        let provider = RecordingProvider::new(VmStatus::Active);
        let rebuild = RebuildVm {
            query: DistQuery::new(Memory::Gb1, Os::Ubuntu),
            version: Version::new("latest"),
            app: Application::new("rust", "latest"),
            admin_pass: None,
            key_name: Some("main".into()),
        };

        rebuild
            .run(&provider, &catalog, &VpsId(Uuid::new_v4()))
            .await
            .unwrap();

        let image = catalog
            .images()
            .iter()
            .find(|image| image.name == "vmi-rust-latest-ubuntu-22.04-amd64-100gb")
            .unwrap();
        assert_eq!(
            provider.calls(),
            vec![Call::Rebuild(RebuildSpec {
                image_id: image.id,
                admin_pass: None,
                key_name: Some("main".into()),
            })]
        );
    }

    #[tokio::test]
    async fn test_rebuild_without_matching_image_does_nothing() {
        let provider = RecordingProvider::new(VmStatus::Active);
        let rebuild = RebuildVm {
            query: DistQuery::new(Memory::Mb512, Os::Debian),
            version: Version::new("12.0"),
            app: Application::none(),
            admin_pass: Some("P@ssw0rd!".into()),
            key_name: None,
        };

        let result = rebuild
            .run(&provider, &catalog(), &VpsId(Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(crate::Error::ImageNotFound(_))));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resize_waits_for_verify_then_confirms() {
        let catalog = catalog();
        let provider = RecordingProvider::new(VmStatus::VerifyResize);

        resize(Memory::Gb2, Duration::from_secs(2))
            .run(&provider, &catalog, &VpsId(Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(
            provider.calls(),
            vec![Call::Resize(catalog.flavors()[2].id), Call::Confirm]
        );
    }

    #[tokio::test]
    async fn test_resize_not_confirmed_when_verify_never_comes() {
        let provider = RecordingProvider::new(VmStatus::Resize);

        let result = resize(Memory::Gb2, Duration::from_millis(50))
            .run(&provider, &catalog(), &VpsId(Uuid::new_v4()))
            .await;
        assert!(matches!(
            result,
            Err(crate::Error::WatchTimeout {
                expected: VmStatus::VerifyResize,
                ..
            })
        ));
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_resize_to_unoffered_plan_fails_before_request() {
        let provider = RecordingProvider::new(VmStatus::VerifyResize);

        let result = resize(Memory::Gb64, Duration::from_secs(2))
            .run(&provider, &catalog(), &VpsId(Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(crate::Error::FlavorNotFound(_))));
        assert!(provider.calls().is_empty());
    }
}
