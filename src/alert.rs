//! Alert partials for displaying success and error messages to users.
//!
//! Alerts are swapped into the fixed `#alert-container` element by HTMX,
//! either as an error target (`hx-target-error`) or an out-of-band swap.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A message to display to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action worked; `details` says what happened.
    Success {
        /// Short headline, e.g. "Bill saved".
        message: String,
        /// Supporting detail below the headline.
        details: String,
    },
    /// The action failed; `details` says what the user can do about it.
    Error {
        /// Short headline, e.g. "Could not delete bill".
        message: String,
        /// Supporting detail below the headline.
        details: String,
    },
}

impl Alert {
    /// Create an error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Alert::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a success alert.
    pub fn success(message: &str, details: &str) -> Self {
        Alert::Success {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as markup.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (
                "p-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 border border-green-300 \
                dark:border-green-800 shadow-lg",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "p-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 border border-red-300 \
                dark:border-red-800 shadow-lg",
                message,
                details,
            ),
        };

        html! {
            div class=(container_style) role="alert" {
                p class="font-medium" { (message) }

                @if !details.is_empty() {
                    p { (details) }
                }

                button
                    type="button"
                    class="mt-1 text-xs underline"
                    onclick="this.parentElement.remove()"
                {
                    "Dismiss"
                }
            }
        }
    }

    /// Render the alert as a response with the given status code.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}
