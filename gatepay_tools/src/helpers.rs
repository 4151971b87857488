/// GatePay settles fiat-denominated orders in the matching tether token, e.g. `USD` becomes `USDT`.
pub const SETTLEMENT_SUFFIX: &str = "T";

/// The GatePay currency for an order placed in the given ISO currency code.
pub fn settlement_currency(order_currency: &str) -> String {
    format!("{}{SETTLEMENT_SUFFIX}", order_currency.trim().to_uppercase())
}
