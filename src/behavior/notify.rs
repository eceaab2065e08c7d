use std::collections::HashMap;

use crate::consts;
use crate::dom::NodeId;
use crate::page::{Page, TimerAction};
use crate::Result;

/// Notification toast. At most one is visible at a time; this is a
/// replace-on-show presenter, not a queue.
#[derive(Debug, Default)]
pub(crate) struct ToastState {
    pub(crate) current: Option<NodeId>,
    pub(crate) dismiss_timer: Option<i64>,
}

impl Page {
    /// Shows a toast, replacing any visible one and rescheduling the
    /// auto-dismiss. `severity` is one of `success`, `info`, or `error` and
    /// only drives the styling class.
    pub fn show_notification(&mut self, message: &str, severity: &str) -> Result<()> {
        self.toast_show(message, severity)
    }

    pub(crate) fn toast_show(&mut self, message: &str, severity: &str) -> Result<()> {
        if let Some(existing) = self.toast.current.take() {
            self.dom.detach(existing);
        }
        if let Some(id) = self.toast.dismiss_timer.take() {
            self.clear_timer(id);
        }

        let toast = self.dom.create_detached_element(
            "div".into(),
            HashMap::from([
                (
                    "class".to_string(),
                    format!("notification notification-{severity}"),
                ),
                ("role".to_string(), "alert".to_string()),
                ("aria-live".to_string(), "polite".to_string()),
            ]),
        );
        let body = self.dom.create_element(
            toast,
            "span".into(),
            HashMap::from([("class".to_string(), "notification-message".to_string())]),
        );
        self.dom.create_text(body, message.to_string());
        let close = self.dom.create_element(
            toast,
            "button".into(),
            HashMap::from([
                ("class".to_string(), "notification-close".to_string()),
                ("type".to_string(), "button".to_string()),
                (
                    "aria-label".to_string(),
                    "Close notification".to_string(),
                ),
            ]),
        );
        self.dom.create_text(close, "\u{d7}".to_string());

        self.dom.append_child(self.mount, toast);
        self.toast.current = Some(toast);

        let id = self.schedule(consts::TOAST_DISMISS_MS, TimerAction::DismissToast(toast));
        self.toast.dismiss_timer = Some(id);
        Ok(())
    }

    pub(crate) fn toast_dismiss_current(&mut self) -> Result<()> {
        match self.toast.current {
            Some(toast) => self.toast_dismiss_node(toast),
            None => Ok(()),
        }
    }

    /// Removal must be safe against double-dismissal: a stale auto-dismiss
    /// firing after a manual close (or after a replacement toast) no-ops.
    pub(crate) fn toast_dismiss_node(&mut self, node: NodeId) -> Result<()> {
        if self.toast.current != Some(node) {
            return Ok(());
        }
        self.dom.detach(node);
        self.toast.current = None;
        if let Some(id) = self.toast.dismiss_timer.take() {
            self.clear_timer(id);
        }
        Ok(())
    }
}
