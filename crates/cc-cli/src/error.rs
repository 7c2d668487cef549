#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Infra(#[from] cc_infra::Error),

    #[error(transparent)]
    Api(#[from] conoha_api::Error),

    #[error(transparent)]
    Domain(#[from] cc_domain::Error),

    #[error("admin password required: pass --admin-password or set OS_ADMIN_PASSWORD")]
    MissingAdminPassword,

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
