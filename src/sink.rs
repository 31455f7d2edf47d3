use crate::prelude::*;

/// Delivers a rendered message somewhere a human will read it.
pub trait Notifier {
    /// The label gives the context of the message (the reported date), the message is sent as is.
    fn notify(&self, label: &str, message: &str) -> Result;
}

/// Prints to stdout instead of sending anywhere.
pub struct Console;

impl Notifier for Console {
    fn notify(&self, label: &str, message: &str) -> Result {
        info!(label, "not sending, printing instead");
        println!("{message}");
        Ok(())
    }
}
