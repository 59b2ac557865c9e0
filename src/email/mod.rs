pub mod email_handlers;
pub mod email_service;
pub mod email_templates;
pub mod transport;

pub use email_service::{EmailEvent, EmailService};
pub use transport::{MailTransport, ResendTransport};
