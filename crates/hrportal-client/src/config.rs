//! Base URL resolution
//!
//! Pure function of the page origin. Local hostnames always map to the
//! fixed dev URL; anything else derives a same-host URL on the API port.

use std::time::Duration;

/// Port the portal API listens on, local and deployed alike.
pub const DEFAULT_API_PORT: u16 = 3001;

/// Client-side bound on the health probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scheme {
    type Err = String;

    // Accepts a trailing colon so browser-style protocol strings
    // ("https:") parse as-is.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches(':') {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(format!("unknown scheme: {}", other)),
        }
    }
}

/// Derive the API base URL from an explicit origin.
///
/// `localhost` and `127.0.0.1` pin to plain http on `localhost` so the
/// dev setup works regardless of how the page itself was served.
pub fn resolve_base_url(scheme: Scheme, hostname: &str, port: u16) -> String {
    if hostname == "localhost" || hostname == "127.0.0.1" {
        return format!("http://localhost:{}/api", port);
    }
    format!("{}://{}:{}/api", scheme, hostname, port)
}
