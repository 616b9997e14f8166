use mathhint_backend::mail::{MailError, Mailer, Message};
use std::sync::{Arc, Mutex};

/// Keeps every message instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<Message>>>,
}

#[allow(unused)]
impl RecordingMailer {
    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[axum::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &Message) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("mailer lock poisoned")
            .push(message.clone());
        Ok(())
    }
}

/// A relay that is always down.
pub struct FailingMailer;

#[axum::async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &Message) -> Result<(), MailError> {
        Err(MailError::Disabled)
    }
}
