//! Outgoing mail dispatch through Amazon SES with recipient rewriting
//! and optional queued delivery.
//!
//! See [`mail`] for the dispatch adapter and [`jobs`] for the queue that
//! backs deferred delivery.

pub mod jobs;
pub mod mail;

pub use mail::{
    DeliveryPolicy, Dispatch, Email, EmailBuilder, HasTransport, ImmediateDispatcher, MailError,
    Outbound, QueuedDispatcher, SendEmailJob, SesConfig, SesMailer, SesTransport, Transport,
};
