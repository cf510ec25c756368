//! Alerts for showing diagnostics and hints to users.

use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertType {
    Error,
    Info,
}

/// A boxed message with styling that matches its type.
pub struct Alert<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new error alert
    pub fn error(message: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
        }
    }

    /// Create a new info alert, used for remediation hints
    pub fn info(message: &'a str) -> Self {
        Self {
            alert_type: AlertType::Info,
            message,
        }
    }

    pub fn into_html(self) -> Markup {
        let (style, icon, role, kind) = match self.alert_type {
            AlertType::Error => (
                "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
                dark:text-red-400 dark:border-red-800",
                "⚠️",
                "alert",
                "error",
            ),
            AlertType::Info => (
                "text-blue-800 border-blue-300 bg-blue-50 dark:bg-gray-800 \
                dark:text-blue-400 dark:border-blue-800",
                "💡",
                "status",
                "info",
            ),
        };

        html! {
            div
                class={"flex items-center p-4 text-sm border rounded-lg " (style)}
                role=(role)
                data-alert-type=(kind)
            {
                span class="me-3" aria-hidden="true" { (icon) }
                p { (self.message) }
            }
        }
    }
}
