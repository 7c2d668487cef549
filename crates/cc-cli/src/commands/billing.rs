//! `conoha billing`: orders, payments and invoices. Dates are shown in JST.

use cc_domain::billing::VpsOrder;
use cc_domain::vm::to_tokyo;
use chrono::{DateTime, Utc};
use conoha_api::{Invoice, InvoiceItem, OrderItemSummary, Payment};
use serde::Serialize;
use tabled::Tabled;

use super::connect;
use crate::cli::BillingCommands;
use crate::error::Result;
use crate::output::{self, Format};

fn jst(at: &DateTime<Utc>) -> String {
    output::timestamp(&to_tokyo(*at))
}

#[derive(Debug, Tabled, Serialize)]
struct OrderRow {
    #[tabled(rename = "order id")]
    order_id: String,
    service: String,
    product: String,
    status: String,
    since: String,
}

impl From<&OrderItemSummary> for OrderRow {
    fn from(item: &OrderItemSummary) -> Self {
        Self {
            order_id: item.uu_id.to_string(),
            service: item.service_name.clone(),
            product: item.product_name.clone(),
            status: item.status.clone(),
            since: item.service_start_date.as_ref().map_or_else(|| "-".into(), jst),
        }
    }
}

#[derive(Debug, Tabled, Serialize)]
struct OrderDetailRow {
    #[tabled(rename = "order id")]
    order_id: String,
    service: String,
    product: String,
    #[tabled(rename = "billing from")]
    billing_at: String,
    #[tabled(rename = "unit price")]
    unit_price: i64,
    status: String,
}

impl From<&VpsOrder> for OrderDetailRow {
    fn from(order: &VpsOrder) -> Self {
        Self {
            order_id: order.order_id.to_string(),
            service: order.service_name.clone(),
            product: order.product_name.clone(),
            billing_at: output::timestamp(&order.billing_at),
            unit_price: order.unit_price,
            status: order.status.clone(),
        }
    }
}

#[derive(Debug, Tabled, Serialize)]
struct PaymentRow {
    received: String,
    #[tabled(rename = "money type")]
    money_type: String,
    amount: i64,
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        Self {
            received: jst(&payment.received_date),
            money_type: payment.money_type.clone(),
            amount: payment.deposit_amount,
        }
    }
}

#[derive(Debug, Tabled, Serialize)]
struct TotalRow {
    #[tabled(rename = "total deposit")]
    total_deposit: i64,
}

#[derive(Debug, Tabled, Serialize)]
struct InvoiceRow {
    #[tabled(rename = "invoice id")]
    invoice_id: i64,
    #[tabled(rename = "invoice date")]
    invoice_date: String,
    #[tabled(rename = "due date")]
    due_date: String,
    method: String,
    #[tabled(rename = "amount (tax incl.)")]
    amount: i64,
}

impl From<&Invoice> for InvoiceRow {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice_id: invoice.invoice_id,
            invoice_date: jst(&invoice.invoice_date),
            due_date: jst(&invoice.due_date),
            method: invoice.payment_method_type.clone(),
            amount: invoice.bill_plus_tax,
        }
    }
}

#[derive(Debug, Tabled, Serialize)]
struct InvoiceItemRow {
    product: String,
    quantity: i64,
    #[tabled(rename = "unit price")]
    unit_price: i64,
    from: String,
    to: String,
}

impl From<&InvoiceItem> for InvoiceItemRow {
    fn from(item: &InvoiceItem) -> Self {
        Self {
            product: item.product_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            from: item.start_date.as_ref().map_or_else(|| "-".into(), jst),
            to: item.end_date.as_ref().map_or_else(|| "-".into(), jst),
        }
    }
}

pub async fn run(cmd: BillingCommands, format: Format) -> Result<()> {
    let provider = connect().await?;
    let client = provider.client();

    match cmd {
        BillingCommands::Order { order_id: None } => {
            let items = client.list_order_items().await?;
            let rows: Vec<OrderRow> = items.iter().map(OrderRow::from).collect();
            output::render(format, &rows)
        }
        BillingCommands::Order {
            order_id: Some(id),
        } => {
            let order = cc_infra::billing::vps_order(client, &id).await?;
            output::render(format, &[OrderDetailRow::from(&order)])
        }
        BillingCommands::Paid { summary: true } => {
            let summary = client.payment_summary().await?;
            output::render(
                format,
                &[TotalRow {
                    total_deposit: summary.total_deposit_amount,
                }],
            )
        }
        BillingCommands::Paid { summary: false } => {
            let payments = client.payment_history().await?;
            let rows: Vec<PaymentRow> = payments.iter().map(PaymentRow::from).collect();
            output::render(format, &rows)
        }
        BillingCommands::Invoice {
            invoice_id: Some(id),
            ..
        } => {
            let detail = client.get_invoice(id).await?;
            let rows: Vec<InvoiceItemRow> = detail.items.iter().map(InvoiceItemRow::from).collect();
            output::render(format, &rows)
        }
        BillingCommands::Invoice {
            invoice_id: None,
            offset,
            limit,
        } => {
            let invoices = client.list_invoices(offset, limit).await?;
            let rows: Vec<InvoiceRow> = invoices.iter().map(InvoiceRow::from).collect();
            output::render(format, &rows)
        }
    }
}
