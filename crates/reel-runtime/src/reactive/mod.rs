#![forbid(unsafe_code)]

//! Change-notified state shared with the host UI.

pub mod observable;

pub use observable::{Observable, Subscription};
