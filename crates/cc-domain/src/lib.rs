//! Domain model for the ConoHa VPS client.
//!
//! The heart of this crate is [`image`]: it turns the provider's opaque image
//! names into OS versions and bundled applications. The other modules hold the
//! plan, VM and billing value types the CLI renders.

pub mod billing;
pub mod image;
pub mod plan;
pub mod vm;

pub use image::{Application, ImageNames, Os, Version};
pub use plan::Memory;
pub use vm::{Vm, VmStatus};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot extract from image name: {0}")]
    Extraction(String),

    #[error("application has no version: {0}")]
    ApplicationWithoutVersion(String),

    #[error("unexpected state while parsing image name: {0}")]
    UnexpectedState(String),

    #[error(
        "image names are not partitioned by OS: {claimed} of {total} claimed, \
         expected all but the single `dev` entry"
    )]
    CatalogPartition { total: usize, claimed: usize },

    #[error("unknown OS: {0}")]
    UnknownOs(String),

    #[error("invalid memory size: {0}")]
    InvalidMemory(String),

    #[error("VM name is not an IPv4 address: {0}")]
    InvalidAddress(String),
}

pub type Result<T> = std::result::Result<T, Error>;
