//! In-memory notification provider for tests.

use potli_common::services::{BoxFuture, BoxedError, Notification, NotificationProvider, NotificationResult};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
#[error("mock delivery failure")]
pub struct MockSendError;

/// Records every notification; `failing()` records and then errors.
#[derive(Default)]
pub struct MockNotifications {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl MockNotifications {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationProvider for MockNotifications {
    type Error = BoxedError;

    fn send(&self, notification: Notification) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            let count = {
                let mut sent = self.sent.lock().unwrap();
                sent.push(notification);
                sent.len()
            };
            if self.fail {
                return Err(BoxedError::new(MockSendError));
            }
            Ok(NotificationResult {
                id: Some(format!("msg_{count}")),
            })
        })
    }
}
