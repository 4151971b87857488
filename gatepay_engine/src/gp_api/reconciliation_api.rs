use std::fmt::Debug;

use gatepay_tools::{GatePayApi, GatePayResponse, InvoiceStatus};
use log::*;

use crate::{
    db::traits::{OrderManagement, OrderQuery},
    db_types::{Order, OrderStatusType},
    gp_api::{errors::ReconciliationError, payment_objects::ReconciliationResult},
};

/// At most this many orders are checked per pass, which bounds the number of calls made to GatePay.
pub const DEFAULT_BATCH_SIZE: usize = 3;
pub const PAID_NOTE: &str = "Paid";

enum Verdict {
    Completed,
    Released,
    Deferred,
}

/// `ReconciliationApi` polls GatePay for the invoices of orders that are awaiting payment.
pub struct ReconciliationApi<B> {
    db: B,
    api: GatePayApi,
    batch_size: usize,
}

impl<B> Debug for ReconciliationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi (batch size {})", self.batch_size)
    }
}

impl<B> ReconciliationApi<B> {
    pub fn new(db: B, api: GatePayApi) -> Self {
        Self { db, api, batch_size: DEFAULT_BATCH_SIZE }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn gatepay(&self) -> &GatePayApi {
        &self.api
    }
}

impl<B> ReconciliationApi<B>
where B: OrderManagement
{
    /// Checks up to `batch_size` on-hold orders that carry an invoice.
    ///
    /// * `PAID`: the order is completed. The invoice reference stays on the order.
    /// * `PENDING`: nothing changes.
    /// * Any other status: the invoice reference is removed and the order stays on hold, so the buyer can try again.
    /// * Both writes only happen while the order still carries the invoice that was checked. If a new checkout has
    ///   replaced it in the meantime, the order is left alone and reported as deferred.
    /// * No usable answer (transport failure, rejection, missing fields): nothing changes until the next pass.
    ///
    /// Only a failure to list the orders is returned as an error. A failed write to a single order is logged and the
    /// order is reported as deferred.
    pub async fn reconcile_pending_orders(&self) -> Result<ReconciliationResult, ReconciliationError> {
        let query = OrderQuery::default()
            .with_status(OrderStatusType::OnHold)
            .with_filter(|o| o.has_invoice())
            .with_limit(self.batch_size);
        let orders = self.db.fetch_orders(query).await.map_err(|e| ReconciliationError::StoreError(e.to_string()))?;
        trace!("🕰️ {} orders awaiting GatePay payment", orders.len());
        let mut result = ReconciliationResult::default();
        for order in orders {
            let id = order.id.clone();
            match self.reconcile_order(&order).await {
                Verdict::Completed => result.completed.push(id),
                Verdict::Released => result.released.push(id),
                Verdict::Deferred => result.deferred.push(id),
            }
        }
        Ok(result)
    }

    async fn reconcile_order(&self, order: &Order) -> Verdict {
        let Some(prepay_id) = order.invoice() else {
            return Verdict::Deferred;
        };
        let status = match self.api.query_order(prepay_id).await {
            Ok(GatePayResponse::Success(status)) => status,
            Ok(GatePayResponse::Rejected { status, message }) => {
                warn!("🕰️ GatePay would not report on invoice {prepay_id} of order {} [{status}]: {message}", order.id);
                return Verdict::Deferred;
            },
            Err(e) => {
                warn!("🕰️ Could not check invoice {prepay_id} of order {}. {e}", order.id);
                return Verdict::Deferred;
            },
        };
        match status {
            InvoiceStatus::Paid => {
                let completed =
                    self.db.update_status_for_invoice(&order.id, prepay_id, OrderStatusType::Completed, PAID_NOTE);
                match completed.await {
                    Ok(Some(_)) => {
                        info!("🕰️ Invoice {prepay_id} is paid. Order {} is complete", order.id);
                        Verdict::Completed
                    },
                    Ok(None) => {
                        error!(
                            "🕰️ Invoice {prepay_id} is paid, but order {} has moved on to another invoice. It needs \
                             manual attention",
                            order.id
                        );
                        Verdict::Deferred
                    },
                    Err(e) => {
                        error!("🕰️ Invoice {prepay_id} is paid, but order {} could not be completed. {e}", order.id);
                        Verdict::Deferred
                    },
                }
            },
            InvoiceStatus::Pending => {
                trace!("🕰️ Invoice {prepay_id} of order {} is still pending", order.id);
                Verdict::Deferred
            },
            InvoiceStatus::Created | InvoiceStatus::Terminal(_) => {
                match self.db.clear_invoice(&order.id, prepay_id).await {
                    Ok(Some(_)) => {
                        info!("🕰️ Invoice {prepay_id} ended as {status}. Order {} can be paid again", order.id);
                        Verdict::Released
                    },
                    Ok(None) => {
                        info!("🕰️ Invoice {prepay_id} ended as {status}, but order {} already has a new one", order.id);
                        Verdict::Deferred
                    },
                    Err(e) => {
                        error!("🕰️ Could not release invoice {prepay_id} from order {}. {e}", order.id);
                        Verdict::Deferred
                    },
                }
            },
        }
    }
}
