//! Typed Rust client for the ConoHa VPS REST API.
//!
//! Covers the subset the CLI needs: identity (token issue), compute
//! (servers and their actions, flavors, images, keypairs) and account
//! (orders, payments, invoices).

mod types;

use uuid::Uuid;

pub use types::*;

pub const DEFAULT_REGION: &str = "tyo2";

const INVOICE_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("conoha api request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("conoha api {endpoint} returned {status}: {body}")]
    Api {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("the image and flavor combination is not offered; try another one: {0}")]
    NotProvided(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Base URLs of the three services, tenant already included where needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub identity: String,
    pub compute: String,
    pub account: String,
}

impl Endpoints {
    pub fn for_region(region: &str, tenant_id: &str) -> Self {
        Self {
            identity: format!("https://identity.{region}.conoha.io/v2.0"),
            compute: format!("https://compute.{region}.conoha.io/v2/{tenant_id}"),
            account: format!("https://account.{region}.conoha.io/v1/{tenant_id}"),
        }
    }

    /// All three services behind one base URL (mock servers).
    pub fn single(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            identity: format!("{base}/identity"),
            compute: format!("{base}/compute"),
            account: format!("{base}/account"),
        }
    }
}

/// Client for the ConoHa REST API, holding an issued token.
#[derive(Clone)]
pub struct ConohaClient {
    token: String,
    endpoints: Endpoints,
    http: reqwest::Client,
}

impl ConohaClient {
    pub fn new(token: impl Into<String>, endpoints: Endpoints) -> Self {
        Self {
            token: token.into(),
            endpoints,
            http: reqwest::Client::new(),
        }
    }

    /// Issue a token with the credentials and return a client using it.
    pub async fn login(credentials: &Credentials, endpoints: Endpoints) -> Result<Self> {
        let http = reqwest::Client::new();
        let token = issue_token(&http, &endpoints.identity, credentials).await?;
        Ok(Self {
            token: token.id,
            endpoints,
            http,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn compute_url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoints.compute)
    }

    fn account_url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoints.account)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        endpoint: &'static str,
    ) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .header("X-Auth-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        check(resp, endpoint)
            .await?
            .json()
            .await
            .map_err(Error::from)
    }

    async fn action(
        &self,
        server_id: &Uuid,
        action: &ServerAction,
        endpoint: &'static str,
    ) -> Result<()> {
        let resp = self
            .http
            .post(self.compute_url(&format!("/servers/{server_id}/action")))
            .header("X-Auth-Token", &self.token)
            .header("Accept", "application/json")
            .json(action)
            .send()
            .await?;

        check(resp, endpoint).await?;
        Ok(())
    }

    // ── Servers ─────────────────────────────────────────────────────

    pub async fn list_servers(&self) -> Result<Vec<Server>> {
        let body: ServersResponse = self
            .get(self.compute_url("/servers/detail"), "list servers")
            .await?;
        Ok(body.servers)
    }

    pub async fn get_server(&self, server_id: &Uuid) -> Result<Server> {
        let body: ServerResponse = self
            .get(self.compute_url(&format!("/servers/{server_id}")), "get server")
            .await?;
        Ok(body.server)
    }

    /// Create a server. A 400 means the provider does not offer the
    /// image on that flavor.
    pub async fn create_server(&self, server: &NewServer) -> Result<CreatedServer> {
        let resp = self
            .http
            .post(self.compute_url("/servers"))
            .header("X-Auth-Token", &self.token)
            .header("Accept", "application/json")
            .json(&CreateServerRequest { server })
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::BAD_REQUEST {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::NotProvided(body));
        }

        let body: CreatedServerResponse = check(resp, "create server").await?.json().await?;
        Ok(body.server)
    }

    pub async fn start_server(&self, server_id: &Uuid) -> Result<()> {
        self.action(server_id, &ServerAction::Start(()), "start server")
            .await
    }

    pub async fn stop_server(&self, server_id: &Uuid) -> Result<()> {
        self.action(server_id, &ServerAction::Stop(()), "stop server")
            .await
    }

    pub async fn reboot_server(&self, server_id: &Uuid, kind: RebootKind) -> Result<()> {
        self.action(
            server_id,
            &ServerAction::Reboot(Reboot { kind }),
            "reboot server",
        )
        .await
    }

    pub async fn rebuild_server(&self, server_id: &Uuid, rebuild: Rebuild) -> Result<()> {
        self.action(server_id, &ServerAction::Rebuild(rebuild), "rebuild server")
            .await
    }

    /// Move to another flavor. The server ends up in `VERIFY_RESIZE` until
    /// [`confirm_resize`](Self::confirm_resize) is sent.
    pub async fn resize_server(&self, server_id: &Uuid, flavor_id: &Uuid) -> Result<()> {
        self.action(
            server_id,
            &ServerAction::Resize(Resize {
                flavor_ref: *flavor_id,
            }),
            "resize server",
        )
        .await
    }

    pub async fn confirm_resize(&self, server_id: &Uuid) -> Result<()> {
        self.action(server_id, &ServerAction::ConfirmResize(()), "confirm resize")
            .await
    }

    pub async fn create_image(&self, server_id: &Uuid, name: &str) -> Result<()> {
        self.action(
            server_id,
            &ServerAction::CreateImage(CreateImage { name: name.into() }),
            "create image",
        )
        .await
    }

    pub async fn delete_server(&self, server_id: &Uuid) -> Result<()> {
        let resp = self
            .http
            .delete(self.compute_url(&format!("/servers/{server_id}")))
            .header("X-Auth-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        check_allow_404(resp, "delete server").await?;
        Ok(())
    }

    // ── Flavors, images, keypairs ───────────────────────────────────

    pub async fn list_flavors(&self) -> Result<Vec<Flavor>> {
        let body: FlavorsResponse = self
            .get(self.compute_url("/flavors/detail"), "list flavors")
            .await?;
        Ok(body.flavors)
    }

    pub async fn list_images(&self) -> Result<Vec<Image>> {
        let body: ImagesResponse = self
            .get(self.compute_url("/images/detail"), "list images")
            .await?;
        Ok(body.images)
    }

    pub async fn list_keypairs(&self) -> Result<Vec<Keypair>> {
        let body: KeypairsResponse = self
            .get(self.compute_url("/os-keypairs"), "list keypairs")
            .await?;
        Ok(body.keypairs.into_iter().map(|entry| entry.keypair).collect())
    }

    // ── Account ─────────────────────────────────────────────────────

    pub async fn list_order_items(&self) -> Result<Vec<OrderItemSummary>> {
        let body: OrderItemsResponse = self
            .get(self.account_url("/order-items"), "list order items")
            .await?;
        Ok(body.order_items)
    }

    pub async fn get_order_item(&self, order_id: &Uuid) -> Result<OrderItem> {
        let body: OrderItemResponse = self
            .get(
                self.account_url(&format!("/order-items/{order_id}")),
                "get order item",
            )
            .await?;
        Ok(body.order_item)
    }

    pub async fn payment_history(&self) -> Result<Vec<Payment>> {
        let body: PaymentHistoryResponse = self
            .get(self.account_url("/payment-history"), "payment history")
            .await?;
        Ok(body.payment_history)
    }

    pub async fn payment_summary(&self) -> Result<PaymentSummary> {
        let body: PaymentSummaryResponse = self
            .get(self.account_url("/payment-summary"), "payment summary")
            .await?;
        Ok(body.payment_summary)
    }

    /// Billing invoices, newest first. `limit` defaults to 1000.
    pub async fn list_invoices(
        &self,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<Invoice>> {
        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(INVOICE_PAGE_LIMIT);
        let body: InvoicesResponse = self
            .get(
                self.account_url(&format!("/billing-invoices?offset={offset}&limit={limit}")),
                "list invoices",
            )
            .await?;
        Ok(body.billing_invoices)
    }

    pub async fn get_invoice(&self, invoice_id: i64) -> Result<InvoiceDetail> {
        let body: InvoiceResponse = self
            .get(
                self.account_url(&format!("/billing-invoices/{invoice_id}")),
                "get invoice",
            )
            .await?;
        Ok(body.billing_invoice)
    }
}

/// `POST {identity}/tokens` with password credentials.
pub async fn issue_token(
    http: &reqwest::Client,
    identity_url: &str,
    credentials: &Credentials,
) -> Result<Token> {
    let req = TokenRequest {
        auth: TokenAuth {
            password_credentials: PasswordCredentials {
                username: &credentials.username,
                password: &credentials.password,
            },
            tenant_id: &credentials.tenant_id,
        },
    };

    let resp = http
        .post(format!("{identity_url}/tokens"))
        .header("Accept", "application/json")
        .json(&req)
        .send()
        .await?;

    let body: TokenResponse = check(resp, "issue token").await?.json().await?;
    Ok(body.access.token)
}

async fn check(resp: reqwest::Response, endpoint: &'static str) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api { endpoint, status, body });
    }
    Ok(resp)
}

/// Like `check` but also treats 404 as success (for delete idempotency).
async fn check_allow_404(
    resp: reqwest::Response,
    endpoint: &'static str,
) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() && status.as_u16() != 404 {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api { endpoint, status, body });
    }
    Ok(resp)
}
