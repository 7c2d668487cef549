//! `conoha image`: the image catalog as the classification engine sees it.

use cc_domain::{ImageNames, Os};
use cc_infra::query::Catalog;
use conoha_api::Image;
use serde::Serialize;
use tabled::Tabled;

use super::connect;
use crate::cli::{ImageCommands, ImageLsArgs};
use crate::error::Result;
use crate::output::{self, Format};

#[derive(Debug, Tabled, Serialize)]
struct ImageRow {
    name: String,
    os: String,
    version: String,
    app: String,
    #[tabled(rename = "image id")]
    image_id: String,
}

impl ImageRow {
    /// Fields the engine cannot derive show as `-`.
    fn classify(image: &Image, os: Option<Os>) -> Self {
        let name = image.name.as_str();
        let (os, version, app) = match os {
            Some(os) => (
                os.to_string(),
                os.extract_version(name)
                    .map_or_else(|_| "-".to_string(), |v| v.to_string()),
                os.extract_app_with_version(name)
                    .map_or_else(|_| "-".to_string(), |a| a.to_string()),
            ),
            None => ("-".into(), "-".into(), "-".into()),
        };
        Self {
            name: image.name.clone(),
            os,
            version,
            app,
            image_id: image.id.to_string(),
        }
    }
}

#[derive(Debug, Tabled, Serialize)]
struct CheckRow {
    name: String,
    claimants: String,
}

pub async fn run(cmd: ImageCommands, format: Format) -> Result<()> {
    let provider = connect().await?;
    match cmd {
        ImageCommands::Ls(args) => {
            let images = provider.client().list_images().await?;
            output::render(format, &list(&images, &args))
        }
        ImageCommands::Check => check(&provider.catalog().await?, format),
    }
}

/// Print the offending names, then fail if the catalog is not partitioned.
fn check(catalog: &Catalog, format: Format) -> Result<()> {
    output::render(format, &check_rows(&catalog.names()))?;
    Ok(catalog.check()?)
}

fn list(images: &[Image], args: &ImageLsArgs) -> Vec<ImageRow> {
    images
        .iter()
        .filter_map(|image| {
            let claimant = ImageNames::claimants(&image.name).into_iter().next();
            match args.os {
                Some(os) if !os.name_match(&image.name) => None,
                Some(os) => Some(ImageRow::classify(image, Some(os))),
                None => Some(ImageRow::classify(image, claimant)),
            }
        })
        .collect()
}

fn check_rows(names: &ImageNames) -> Vec<CheckRow> {
    let unclaimed = names.unclaimed().into_iter().map(|name| CheckRow {
        name: name.to_string(),
        claimants: "none".into(),
    });
    let overclaimed = names.overclaimed().into_iter().map(|(name, oses)| CheckRow {
        name: name.to_string(),
        claimants: oses
            .iter()
            .map(Os::as_str)
            .collect::<Vec<_>>()
            .join(","),
    });
    unclaimed.chain(overclaimed).collect()
}
