//! Image and flavor resolution over a fetched catalog.

use cc_domain::{Application, ImageNames, Memory, Os, Version};
use conoha_api::{Flavor, Image};
use tracing::warn;
use uuid::Uuid;

use crate::{Error, Result};

/// Everything the provider offers to boot: images and flavors.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    images: Vec<Image>,
    flavors: Vec<Flavor>,
}

impl Catalog {
    pub fn new(images: Vec<Image>, flavors: Vec<Flavor>) -> Self {
        Self { images, flavors }
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn flavors(&self) -> &[Flavor] {
        &self.flavors
    }

    pub fn names(&self) -> ImageNames {
        ImageNames::new(self.images.iter().map(|image| image.name.as_str()))
    }

    /// UUID of the flavor offering this memory plan.
    pub fn flavor_id(&self, memory: Memory) -> Result<Uuid> {
        self.flavors
            .iter()
            .find(|flavor| memory.is_flavor(&flavor.name))
            .map(|flavor| flavor.id)
            .ok_or_else(|| Error::FlavorNotFound(memory.to_string()))
    }

    /// Runs the OS partition check and logs the offending names.
    pub fn check(&self) -> Result<()> {
        let names = self.names();
        if let Err(e) = names.check_direct_sum() {
            for name in names.unclaimed() {
                warn!(image = name, "image matches no known OS");
            }
            for (name, claimants) in names.overclaimed() {
                warn!(image = name, ?claimants, "image matches several OSes");
            }
            return Err(e.into());
        }
        Ok(())
    }
}

/// Images and flavor for one memory plan and OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistQuery {
    pub memory: Memory,
    pub os: Os,
}

impl DistQuery {
    pub fn new(memory: Memory, os: Os) -> Self {
        Self { memory, os }
    }

    fn describe(&self, version: &Version, app: &Application) -> String {
        format!(
            "memory={}GB os={} version={} app={}",
            self.memory, self.os, version, app
        )
    }

    /// Image names bootable on this plan with this OS.
    pub fn names(&self, catalog: &Catalog) -> ImageNames {
        catalog
            .names()
            .filtered(|name| self.memory.is_match(name) && self.os.name_match(name))
    }

    pub fn available_versions(&self, catalog: &Catalog) -> Result<Vec<Version>> {
        Ok(self.names(catalog).available_os_versions(self.os)?)
    }

    /// `latest` becomes the greatest available version; anything else is
    /// taken as given.
    pub fn resolve_version(&self, catalog: &Catalog, version: &Version) -> Result<Version> {
        if !version.is_latest() {
            return Ok(version.clone());
        }
        self.names(catalog)
            .latest_os_version(self.os)?
            .ok_or_else(|| Error::ImageNotFound(self.describe(version, &Application::none())))
    }

    pub fn apps(&self, catalog: &Catalog, version: &Version) -> Result<Vec<Application>> {
        let version = self.resolve_version(catalog, version)?;
        Ok(self.names(catalog).available_apps(self.os, &version)?)
    }

    /// UUID of the single image with this version and application.
    pub fn image_id(&self, catalog: &Catalog, version: &Version, app: &Application) -> Result<Uuid> {
        let version = self.resolve_version(catalog, version)?;

        let mut found = Vec::new();
        for image in catalog.images() {
            let name = image.name.as_str();
            if !self.memory.is_match(name) || !self.os.name_match(name) {
                continue;
            }
            if self.os.extract_version(name)? == version
                && self.os.extract_app_with_version(name)? == *app
            {
                found.push(image);
            }
        }

        match found.as_slice() {
            [] => Err(Error::ImageNotFound(self.describe(&version, app))),
            [image] => Ok(image.id),
            images => Err(Error::AmbiguousImage {
                query: self.describe(&version, app),
                names: images.iter().map(|image| image.name.clone()).collect(),
            }),
        }
    }

    pub fn flavor_id(&self, catalog: &Catalog) -> Result<Uuid> {
        catalog.flavor_id(self.memory)
    }
}
