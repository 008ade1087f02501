mod checkout;
mod health_check;
mod helpers;
mod hooks;
mod options;
mod payment_events;
mod product_lists;
