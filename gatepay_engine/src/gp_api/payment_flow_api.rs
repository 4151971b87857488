use std::fmt::Debug;

use gatepay_tools::{Credentials, Invoice};
use log::*;

use crate::{
    db::traits::{CartManagement, OrderManagement},
    db_types::{Order, OrderId, OrderStatusType},
    gp_api::{errors::PaymentFlowError, invoice_api::InvoiceApi, payment_objects::PaymentOutcome},
};

pub const AWAITING_PAYMENT_NOTE: &str = "Awaiting GatePay payment";

/// `PaymentFlowApi` is the checkout entry point. It creates the invoice, records it against the order and tells the
/// checkout page where to send the buyer.
pub struct PaymentFlowApi<B> {
    db: B,
    invoices: InvoiceApi,
    credentials: Credentials,
}

impl<B> Debug for PaymentFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<B> PaymentFlowApi<B> {
    /// Uses the credentials the GatePay client was configured with.
    pub fn new(db: B, invoices: InvoiceApi) -> Self {
        let credentials = invoices.gatepay().credentials().clone();
        Self { db, invoices, credentials }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> PaymentFlowApi<B>
where B: OrderManagement + CartManagement
{
    /// Runs the checkout for `order_id`.
    ///
    /// If the invoice cannot be created the outcome is a failure carrying the buyer-facing message, and the order is
    /// left exactly as it was. Otherwise the `prepayId` is stored on the order and the order is put on hold, in that
    /// order, before the cart is emptied. A cart that cannot be emptied is logged and does not fail the checkout.
    ///
    /// Errors are returned only for an unknown order or when the store refuses a write.
    pub async fn process_payment(&self, order_id: &OrderId) -> Result<PaymentOutcome, PaymentFlowError> {
        let order = self
            .db
            .fetch_order(order_id)
            .await
            .map_err(|e| PaymentFlowError::StoreError(e.to_string()))?
            .ok_or_else(|| PaymentFlowError::OrderNotFound(order_id.clone()))?;
        match self.record_invoice(&order).await {
            Ok((order, invoice)) => {
                if let Err(e) = self.db.empty_cart(&order.id).await {
                    warn!("🔄️🛒️ Order {} is awaiting payment, but the cart could not be emptied. {e}", order.id);
                }
                let redirect = invoice.location.unwrap_or_else(|| self.db.return_url(&order));
                debug!("🔄️🧾️ Sending the buyer for order {} to {redirect}", order.id);
                Ok(PaymentOutcome::success(redirect))
            },
            Err(PaymentFlowError::InvoiceError(e)) => {
                info!("🔄️🧾️ Checkout for order {order_id} failed. {e}");
                Ok(PaymentOutcome::failure(e.to_string()))
            },
            Err(e) => Err(e),
        }
    }

    async fn record_invoice(&self, order: &Order) -> Result<(Order, Invoice), PaymentFlowError> {
        let invoice = self.invoices.create_invoice(order, &self.credentials).await?;
        self.db
            .set_invoice(&order.id, &invoice.prepay_id)
            .await
            .map_err(|e| PaymentFlowError::StoreError(e.to_string()))?;
        let order = self
            .db
            .update_status(&order.id, OrderStatusType::OnHold, AWAITING_PAYMENT_NOTE)
            .await
            .map_err(|e| PaymentFlowError::StoreError(e.to_string()))?;
        Ok((order, invoice))
    }
}
