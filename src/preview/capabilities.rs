/// What the embedding platform can be trusted to do.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlatformCapabilities {
    /// Displacement filter graphs render correctly. When `false` the mockup is composited
    /// without warp.
    pub reliable_filters: bool,
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self {
            reliable_filters: true,
        }
    }
}

impl PlatformCapabilities {
    /// Detect capabilities from a browser user-agent string.
    ///
    /// Mobile WebKit (every iOS browser, including Chrome and Firefox skins) is flagged as having
    /// unreliable filters.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        let ios_device = ["iphone", "ipad", "ipod"].iter().any(|d| ua.contains(d));
        let mobile_safari = ua.contains("applewebkit")
            && ua.contains("mobile")
            && !ua.contains("android");
        let unreliable = ios_device || mobile_safari;
        if unreliable {
            tracing::debug!("disabling displacement warp for mobile webkit");
        }
        Self {
            reliable_filters: !unreliable,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/capabilities.rs"]
mod tests;
