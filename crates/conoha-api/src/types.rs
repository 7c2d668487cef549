use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Identity ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub auth: TokenAuth<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenAuth<'a> {
    pub password_credentials: PasswordCredentials<'a>,
    pub tenant_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PasswordCredentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access: Access,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Access {
    pub token: Token,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

// ── Servers ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServersResponse {
    pub servers: Vec<Server>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServerResponse {
    pub server: Server,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub image: ResourceRef,
    pub flavor: ResourceRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceRef {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateServerRequest<'a> {
    pub server: &'a NewServer,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewServer {
    #[serde(rename = "flavorRef")]
    pub flavor_ref: Uuid,
    #[serde(rename = "imageRef")]
    pub image_ref: Uuid,
    #[serde(rename = "adminPass")]
    pub admin_pass: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedServerResponse {
    pub server: CreatedServer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedServer {
    pub id: Uuid,
}

/// Body of `POST /servers/{id}/action`; serializes as `{"os-start": null}`
/// or `{"reboot": {"type": "SOFT"}}`.
#[derive(Debug, Clone, Serialize)]
pub enum ServerAction {
    #[serde(rename = "os-start")]
    Start(()),
    #[serde(rename = "os-stop")]
    Stop(()),
    #[serde(rename = "reboot")]
    Reboot(Reboot),
    #[serde(rename = "rebuild")]
    Rebuild(Rebuild),
    #[serde(rename = "resize")]
    Resize(Resize),
    #[serde(rename = "confirmResize")]
    ConfirmResize(()),
    #[serde(rename = "createImage")]
    CreateImage(CreateImage),
}

/// Reinstall a server from another image. The disk is wiped.
#[derive(Debug, Clone, Serialize)]
pub struct Rebuild {
    #[serde(rename = "imageRef")]
    pub image_ref: Uuid,
    #[serde(rename = "adminPass", skip_serializing_if = "Option::is_none")]
    pub admin_pass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Resize {
    #[serde(rename = "flavorRef")]
    pub flavor_ref: Uuid,
}

/// Snapshot of a server's disk, saved under `name`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateImage {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reboot {
    #[serde(rename = "type")]
    pub kind: RebootKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RebootKind {
    Soft,
    Hard,
}

// ── Flavors, images, keypairs ───────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FlavorsResponse {
    pub flavors: Vec<Flavor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flavor {
    pub id: Uuid,
    pub name: String,
    pub ram: u64,
    pub vcpus: u32,
    pub disk: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImagesResponse {
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    #[serde(default, rename = "minDisk")]
    pub min_disk: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct KeypairsResponse {
    pub keypairs: Vec<KeypairEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct KeypairEntry {
    pub keypair: Keypair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keypair {
    pub name: String,
    pub fingerprint: String,
    #[serde(default)]
    pub public_key: Option<String>,
}

// ── Account ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OrderItemsResponse {
    pub order_items: Vec<OrderItemSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemSummary {
    pub uu_id: Uuid,
    pub service_name: String,
    pub product_name: String,
    pub status: String,
    #[serde(default)]
    pub service_start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OrderItemResponse {
    pub order_item: OrderItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub uu_id: Uuid,
    pub service_name: String,
    pub product_name: String,
    pub bill_start_date: DateTime<Utc>,
    pub unit_price: i64,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PaymentHistoryResponse {
    pub payment_history: Vec<Payment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub deposit_amount: i64,
    pub money_type: String,
    pub received_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PaymentSummaryResponse {
    pub payment_summary: PaymentSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_deposit_amount: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InvoicesResponse {
    pub billing_invoices: Vec<Invoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: i64,
    pub payment_method_type: String,
    pub invoice_date: DateTime<Utc>,
    pub bill_plus_tax: i64,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InvoiceResponse {
    pub billing_invoice: InvoiceDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub invoice_id: i64,
    pub payment_method_type: String,
    pub invoice_date: DateTime<Utc>,
    pub bill_plus_tax: i64,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub invoice_detail_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: i64,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}
