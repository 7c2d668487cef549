use cc_domain::billing::VpsOrder;
use cc_domain::vm::to_tokyo;
use conoha_api::{ConohaClient, OrderItem};
use uuid::Uuid;

use crate::Result;

pub fn to_vps_order(item: OrderItem) -> VpsOrder {
    VpsOrder {
        order_id: item.uu_id,
        product_name: item.product_name,
        service_name: item.service_name,
        billing_at: to_tokyo(item.bill_start_date),
        unit_price: item.unit_price,
        status: item.status,
    }
}

/// Detail of one order, billing start shown in JST.
pub async fn vps_order(client: &ConohaClient, order_id: &Uuid) -> Result<VpsOrder> {
    let item = client.get_order_item(order_id).await?;
    Ok(to_vps_order(item))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike, Utc};

    use super::*;

    #[test]
    fn test_billing_start_in_jst() {
        let item = OrderItem {
            uu_id: Uuid::nil(),
            service_name: "VPS".into(),
            product_name: "g-c2m1d100".into(),
            bill_start_date: Utc.with_ymd_and_hms(2024, 3, 31, 20, 0, 0).unwrap(),
            unit_price: 1064,
            status: "Active".into(),
        };

        let order = to_vps_order(item);
        assert_eq!(order.billing_at.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(order.billing_at.hour(), 5);
        assert_eq!(order.billing_at.to_rfc3339(), "2024-04-01T05:00:00+09:00");
        assert_eq!(order.unit_price, 1064);
    }
}
