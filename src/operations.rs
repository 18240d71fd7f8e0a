/// Channel list operations: the page path encodes the open channels

use crate::channel::ChannelName;
use url::Url;

/// The current page URL, viewed as an ordered list of channel segments
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPath {
    url: Url,
}

impl ChannelPath {
    pub fn parse(href: &str) -> Result<ChannelPath, String> {
        let url = Url::parse(href).map_err(|e| format!("Invalid page URL {}: {}", href, e))?;
        Ok(ChannelPath { url })
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Non-empty path segments, in order
    pub fn segments(&self) -> Vec<String> {
        self.url
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Append `name` unless it is already one of the segments
    pub fn with_appended(&self, name: &ChannelName) -> Url {
        let mut segments = self.segments();
        if !segments.iter().any(|s| s == name.as_str()) {
            segments.push(name.to_string());
        }
        self.with_segments(&segments)
    }

    /// Drop the segment at `index`; `None` if out of range
    pub fn with_removed(&self, index: usize) -> Option<Url> {
        let mut segments = self.segments();
        if index >= segments.len() {
            return None;
        }
        segments.remove(index);
        Some(self.with_segments(&segments))
    }

    /// Replace the segment at `index`; `None` if out of range
    pub fn with_renamed(&self, index: usize, name: &ChannelName) -> Option<Url> {
        let mut segments = self.segments();
        let slot = segments.get_mut(index)?;
        *slot = name.to_string();
        Some(self.with_segments(&segments))
    }

    // Query and fragment are carried over untouched
    fn with_segments(&self, segments: &[String]) -> Url {
        let mut url = self.url.clone();
        url.set_path(&format!("/{}", segments.join("/")));
        url
    }
}
