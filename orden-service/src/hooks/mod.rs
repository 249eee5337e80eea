//! Side effects outside the request path
//!
//! The lifecycle manager queues events on the [`EventOutbox`]; the
//! [`EventDispatcher`] worker delivers notifications and runs the
//! [`IntegrationHookListener`] callbacks.

mod dispatcher;
mod listener;
mod outbox;
mod stripe;
mod webhook;

pub use dispatcher::{EventDispatcher, PlannedNotification, Recipient, plan_notifications};
pub use listener::{DeliveredOutcome, IntegrationHookListener};
pub use outbox::EventOutbox;
pub use stripe::StripeApiClient;
pub use webhook::HttpWebhookPoster;
