//! Header reading configuration

/// Policy applied while unfolding a header block
///
/// The default keeps the last occurrence of a repeated header name and
/// strips the angle brackets around `Message-Id` values.
///
/// # Example
///
/// ```
/// use mbox_rs::HeaderConfig;
///
/// // Last occurrence wins for every header
/// let config = HeaderConfig::default();
/// assert!(config.unwrap_message_id);
///
/// // First occurrence wins for the per-hop delivery headers
/// let config = HeaderConfig::delivery();
/// assert!(config.keeps_first("delivered-to"));
///
/// // Or construct manually
/// let config = HeaderConfig {
///     unwrap_message_id: false,
///     keep_first: vec!["Received".to_string()],
/// };
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderConfig {
    /// Strip one enclosing `<`/`>` pair from `Message-Id` values
    ///
    /// The header name is matched ignoring ASCII case, so `Message-ID` is
    /// unwrapped too.
    #[cfg_attr(feature = "serde", serde(default = "default_unwrap_message_id"))]
    pub unwrap_message_id: bool,

    /// Header names whose first occurrence is kept when repeated
    ///
    /// Names are compared ASCII case-insensitively. Headers not listed
    /// here are last-write-wins.
    #[cfg_attr(feature = "serde", serde(default))]
    pub keep_first: Vec<String>,
}

#[cfg(feature = "serde")]
fn default_unwrap_message_id() -> bool {
    true
}

impl HeaderConfig {
    /// Keep the first value of the delivery trace headers
    ///
    /// `Delivered-To`, `X-Original-To` and `Envelope-To` are prepended at each
    /// hop, so the first one in the block names the final recipient.
    pub fn delivery() -> Self {
        Self {
            keep_first: ["Delivered-To", "X-Original-To", "Envelope-To"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..Self::default()
        }
    }

    /// Add a header name to the first-occurrence-wins list
    pub fn keep_first(mut self, name: impl Into<String>) -> Self {
        self.keep_first.push(name.into());
        self
    }

    /// Whether the first occurrence of `name` should be kept
    #[must_use]
    pub fn keeps_first(&self, name: &str) -> bool {
        self.keep_first.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            unwrap_message_id: true,
            keep_first: Vec::new(),
        }
    }
}
