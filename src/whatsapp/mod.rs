//! Turns WhatsApp-style messages into transactions.
//!
//! The app does not talk to WhatsApp itself. Users send a message such as
//! `Gasto, comida, bembos, 22.90, 4-2-25` and whatever relays it posts the
//! text to the webhook.

mod parser;
mod test_endpoint;
mod webhook_endpoint;

pub use parser::{MESSAGE_FORMAT, ParseError, UnknownTypePolicy, parse_message};
pub use test_endpoint::{WhatsAppTestPayload, whatsapp_test_endpoint};
pub use webhook_endpoint::{WebhookPayload, whatsapp_webhook_endpoint};
