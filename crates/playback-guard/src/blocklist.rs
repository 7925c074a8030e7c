use tracing::debug;

/// Advertising and tracking hosts the surface is never allowed to talk to.
/// Enumerated once; never fetched or updated at runtime.
pub const BLOCKED_DOMAINS: [&str; 10] = [
    "googlesyndication.com",
    "doubleclick.net",
    "ads-twitter.com",
    "adservice.google.com",
    "pagead2.googlesyndication.com",
    "popads.net",
    "popcash.net",
    "clickadu.com",
    "propellerads.com",
    "adsterra.com",
];

/// Outcome of the pre-load check on a top-level navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allowed,
    Blocked,
}

/// Domain-substring block list shared by all four filter defenses.
#[derive(Debug, Clone)]
pub struct BlockList {
    domains: Vec<String>,
}

impl BlockList {
    /// The standard list baked into the app.
    pub fn standard() -> Self {
        Self::from_domains(BLOCKED_DOMAINS.iter().map(|d| d.to_string()))
    }

    pub fn from_domains(domains: impl IntoIterator<Item = String>) -> Self {
        Self {
            domains: domains.into_iter().collect(),
        }
    }

    /// Substring match against the raw URL; the URL is otherwise opaque.
    pub fn is_blocked(&self, url: &str) -> bool {
        self.domains.iter().any(|d| url.contains(d.as_str()))
    }

    /// First line of defense: gate a top-level navigation before it loads.
    pub fn gate_navigation(&self, url: &str) -> NavigationDecision {
        if self.is_blocked(url) {
            debug!(url, "navigation gate blocked target");
            NavigationDecision::Blocked
        } else {
            NavigationDecision::Allowed
        }
    }
}

impl Default for BlockList {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_gate_blocks_ad_domains() {
        let list = BlockList::standard();
        assert_eq!(
            list.gate_navigation("https://ad.doubleclick.net/click?id=1"),
            NavigationDecision::Blocked
        );
        assert_eq!(
            list.gate_navigation("https://example.com/video.mp4"),
            NavigationDecision::Allowed
        );
    }

    #[test]
    fn test_substring_match_covers_subdomains_and_paths() {
        let list = BlockList::standard();
        assert!(list.is_blocked("https://pagead2.googlesyndication.com/pagead/js"));
        assert!(list.is_blocked("https://cdn.popads.net/pop.js"));
        assert!(!list.is_blocked("https://player.videasy.net/movie/550"));
    }

    #[test]
    fn test_custom_list() {
        let list = BlockList::from_domains(["tracker.example".to_string()]);
        assert!(list.is_blocked("https://tracker.example/beacon"));
        assert!(!list.is_blocked("https://doubleclick.net/x"));
    }
}
