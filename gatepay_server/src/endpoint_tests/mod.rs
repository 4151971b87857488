mod checkout;
mod helpers;
mod orders;
mod reconcile;
