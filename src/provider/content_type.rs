use std::fmt;
use std::str::FromStr;

use crate::error::{ApiError, Result};

const VENDOR_PREFIX: &str = "vnd.";
const VERSION_MARKER: &str = "-v";

/// A MIME type with optional vendor and version qualifiers.
///
/// `application/vnd.acme-v1.0+json` is held as mime type `application/json`,
/// vendor `acme` and version `1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    mime_type: String,
    vendor: Option<String>,
    version: Option<String>,
}

impl ContentType {
    pub fn new(mime_type: impl AsRef<str>) -> Self {
        Self {
            mime_type: mime_type.as_ref().trim().to_ascii_lowercase(),
            vendor: None,
            version: None,
        }
    }

    pub fn with_vendor(mut self, vendor: impl AsRef<str>) -> Self {
        self.vendor = Some(vendor.as_ref().trim().to_ascii_lowercase());
        self
    }

    pub fn with_version(mut self, version: impl AsRef<str>) -> Self {
        self.version = Some(version.as_ref().trim().to_string());
        self
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Same content type with the version dropped.
    pub fn without_version(&self) -> Self {
        Self {
            mime_type: self.mime_type.clone(),
            vendor: self.vendor.clone(),
            version: None,
        }
    }

    /// The bare MIME type, without vendor or version.
    pub fn bare(&self) -> Self {
        Self::new(&self.mime_type)
    }

    pub fn is_bare(&self) -> bool {
        self.vendor.is_none() && self.version.is_none()
    }

    /// Parses a `Content-Type` or single `Accept` entry.
    ///
    /// Media type parameters (`; charset=utf-8`, `; q=0.5`) are ignored.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || ApiError::InvalidContentType(value.to_string());

        let essence = value.split(';').next().unwrap_or_default().trim();
        let (kind, subtype) = essence.split_once('/').ok_or_else(invalid)?;
        let kind = kind.trim();
        let subtype = subtype.trim();
        if kind.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return Err(invalid());
        }

        let qualified = match subtype.get(..VENDOR_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(VENDOR_PREFIX) => {
                &subtype[VENDOR_PREFIX.len()..]
            }
            _ => return Ok(Self::new(format!("{}/{}", kind, subtype))),
        };

        // vnd.<vendor>[-v<version>]+<suffix>; registered vnd types without a
        // structured suffix (vnd.ms-excel) stay bare.
        let Some((vendor, suffix)) = qualified.rsplit_once('+') else {
            return Ok(Self::new(format!("{}/{}", kind, subtype)));
        };
        if suffix.is_empty() {
            return Err(invalid());
        }

        // ASCII lowercasing keeps byte offsets, so indices carry over to `vendor`
        let (vendor, version) = match vendor.to_ascii_lowercase().rfind(VERSION_MARKER) {
            Some(idx) => {
                let version = &vendor[idx + VERSION_MARKER.len()..];
                if version.starts_with(|c: char| c.is_ascii_digit()) {
                    (&vendor[..idx], Some(version))
                } else {
                    (vendor, None)
                }
            }
            None => (vendor, None),
        };
        if vendor.is_empty() {
            return Err(invalid());
        }

        let mut content_type = Self::new(format!("{}/{}", kind, suffix)).with_vendor(vendor);
        if let Some(version) = version {
            content_type = content_type.with_version(version);
        }
        Ok(content_type)
    }
}

impl FromStr for ContentType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(vendor) = &self.vendor else {
            return f.write_str(&self.mime_type);
        };

        let (kind, subtype) = self
            .mime_type
            .split_once('/')
            .unwrap_or((self.mime_type.as_str(), ""));
        write!(f, "{}/{}{}", kind, VENDOR_PREFIX, vendor)?;
        if let Some(version) = &self.version {
            write!(f, "{}{}", VERSION_MARKER, version)?;
        }
        write!(f, "+{}", subtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare() {
        let ct = ContentType::parse("application/json").unwrap();
        assert_eq!(ct, ContentType::new("application/json"));
        assert!(ct.is_bare());
    }

    #[test]
    fn test_parse_vendor() {
        let ct = ContentType::parse("application/vnd.supercell+json").unwrap();
        assert_eq!(ct.mime_type(), "application/json");
        assert_eq!(ct.vendor(), Some("supercell"));
        assert_eq!(ct.version(), None);
    }

    #[test]
    fn test_parse_vendor_and_version() {
        let ct = ContentType::parse("application/vnd.supercell-v1.0+json").unwrap();
        assert_eq!(
            ct,
            ContentType::new("application/json")
                .with_vendor("supercell")
                .with_version("1.0")
        );
    }

    #[test]
    fn test_parse_hyphenated_vendor() {
        let ct = ContentType::parse("application/vnd.acme-corp-v2+json").unwrap();
        assert_eq!(ct.vendor(), Some("acme-corp"));
        assert_eq!(ct.version(), Some("2"));

        let ct = ContentType::parse("application/vnd.acme-corp+json").unwrap();
        assert_eq!(ct.vendor(), Some("acme-corp"));
        assert_eq!(ct.version(), None);
    }

    #[test]
    fn test_parse_ignores_parameters_and_case() {
        let ct = ContentType::parse(" Application/JSON; charset=utf-8").unwrap();
        assert_eq!(ct, ContentType::new("application/json"));

        let ct = ContentType::parse("application/VND.Supercell+json;q=0.8").unwrap();
        assert_eq!(ct.vendor(), Some("supercell"));
    }

    #[test]
    fn test_parse_uppercase_version_marker() {
        let ct = ContentType::parse("application/VND.SUPERCELL-V1.0+JSON").unwrap();
        assert_eq!(
            ct,
            ContentType::new("application/json")
                .with_vendor("supercell")
                .with_version("1.0")
        );
    }

    #[test]
    fn test_parse_vnd_without_suffix_stays_bare() {
        let ct = ContentType::parse("application/vnd.ms-excel").unwrap();
        assert_eq!(ct.mime_type(), "application/vnd.ms-excel");
        assert!(ct.is_bare());
    }

    #[test]
    fn test_version_needs_leading_digit() {
        let ct = ContentType::parse("application/vnd.acme-vision+json").unwrap();
        assert_eq!(ct.vendor(), Some("acme-vision"));
        assert_eq!(ct.version(), None);
    }

    #[test]
    fn test_parse_invalid() {
        for value in [
            "",
            "json",
            "/json",
            "application/",
            "application/vnd.+json",
            "application/vnd.acme+",
            "a/b/c",
        ] {
            assert!(
                matches!(ContentType::parse(value), Err(ApiError::InvalidContentType(_))),
                "{:?} should not parse",
                value
            );
        }
    }

    #[test]
    fn test_display_round_trips_header_forms() {
        for value in [
            "application/json",
            "application/vnd.supercell+json",
            "application/vnd.supercell-v1.0+json",
        ] {
            assert_eq!(value.parse::<ContentType>().unwrap().to_string(), value);
        }
    }

    #[test]
    fn test_reductions() {
        let ct = ContentType::parse("application/vnd.supercell-v1.0+json").unwrap();
        assert_eq!(
            ct.without_version(),
            ContentType::new("application/json").with_vendor("supercell")
        );
        assert_eq!(ct.bare(), ContentType::new("application/json"));
    }
}
