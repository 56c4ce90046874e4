//! Click-to-navigation.
//!
//! Clicking a tagged label jumps to that unit's page in the services view.
//! Only the directly targeted element is inspected: the marker class lives on
//! leaf `<text>` nodes, which are what a click on rendered text lands on.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::parsers::{Element, ATTR_SERVICE};

/// Base path of the services view.
pub const SERVICES_PATH: &str = "/system/services";

/// Anything a click can land on.
pub trait ClickTarget {
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl ClickTarget for Element {
    fn attribute(&self, name: &str) -> Option<&str> {
        Element::attribute(self, name)
    }
}

/// Where to go, and on which host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub path: String,
    pub host: String,
}

impl NavigationRequest {
    pub fn service(service: &str, host: &str) -> Self {
        Self {
            path: format!("{}#/{}", SERVICES_PATH, service),
            host: host.to_string(),
        }
    }
}

/// Resolve a click into a navigation request. Untagged targets resolve to None.
pub fn resolve_click<T: ClickTarget + ?Sized>(target: &T, host: &str) -> Option<NavigationRequest> {
    let service = target.attribute(ATTR_SERVICE)?;
    if service.is_empty() {
        return None;
    }
    Some(NavigationRequest::service(service, host))
}

/// Host navigation mechanism. Fire and forget.
pub trait Navigator {
    fn jump(&self, request: NavigationRequest);
}

/// Keeps every request it is given. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    requests: Mutex<Vec<NavigationRequest>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<NavigationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn jump(&self, request: NavigationRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }
}
