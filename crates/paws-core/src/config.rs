//! Tunable limits for the discovery endpoints.

use serde::Deserialize;

/// Request-size limits applied during validation.
///
/// Deserialised from the `[discovery]` table of the server configuration;
/// every field falls back to its default when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
  /// Queue size when the caller does not ask for one.
  pub default_queue_limit: usize,
  /// Largest queue a caller may request.
  pub max_queue_limit:     usize,
  /// Continuation page size when the caller does not ask for one.
  pub default_page_limit:  usize,
  /// Largest continuation page a caller may request.
  pub max_page_limit:      usize,
}

impl Default for DiscoveryConfig {
  fn default() -> Self {
    Self {
      default_queue_limit: 20,
      max_queue_limit:     50,
      default_page_limit:  10,
      max_page_limit:      20,
    }
  }
}
