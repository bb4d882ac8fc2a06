//! Location catalog reference type.

use std::fmt;

/// Error returned when constructing an invalid location reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location reference: {reason}")]
pub struct InvalidLocationRef {
    reason: &'static str,
}

/// An opaque identifier into the external location catalog.
///
/// The console never owns locations; it only stores the reference the
/// operator picked. The only validation is that the identifier is not blank.
///
/// # Examples
///
/// ```
/// use route_console::domain::LocationRef;
///
/// let loc = LocationRef::new("loc-nairobi-cbd".to_string()).unwrap();
/// assert_eq!(loc.as_str(), "loc-nairobi-cbd");
///
/// assert!(LocationRef::new("".to_string()).is_err());
/// assert!(LocationRef::new("   ".to_string()).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationRef(String);

impl LocationRef {
    /// Create a location reference, rejecting blank identifiers.
    pub fn new(s: String) -> Result<Self, InvalidLocationRef> {
        if s.trim().is_empty() {
            return Err(InvalidLocationRef {
                reason: "location reference cannot be blank",
            });
        }
        Ok(LocationRef(s))
    }

    /// Parse an optional form value: blank or absent input means "not chosen yet".
    pub fn from_form(value: Option<String>) -> Option<Self> {
        value.and_then(|s| Self::new(s).ok())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocationRef {
    type Error = InvalidLocationRef;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LocationRef> for String {
    fn from(loc: LocationRef) -> Self {
        loc.0
    }
}

impl fmt::Debug for LocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationRef({})", self.0)
    }
}

impl fmt::Display for LocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_opaque_ids() {
        assert!(LocationRef::new("42".to_string()).is_ok());
        assert!(LocationRef::new("loc_mombasa".to_string()).is_ok());
        assert!(LocationRef::new("a b".to_string()).is_ok());
    }

    #[test]
    fn rejects_blank() {
        assert!(LocationRef::new(String::new()).is_err());
        assert!(LocationRef::new(" \t".to_string()).is_err());
    }

    #[test]
    fn from_form_treats_blank_as_unset() {
        assert_eq!(LocationRef::from_form(None), None);
        assert_eq!(LocationRef::from_form(Some(String::new())), None);
        assert_eq!(
            LocationRef::from_form(Some("nbo".into())),
            Some(LocationRef::new("nbo".into()).unwrap())
        );
    }

    #[test]
    fn serde_roundtrip_as_plain_string() {
        let loc = LocationRef::new("nbo".into()).unwrap();
        let json = serde_json::to_string(&loc).unwrap();
        assert_eq!(json, "\"nbo\"");
        let back: LocationRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, loc);
        assert!(serde_json::from_str::<LocationRef>("\"\"").is_err());
    }

    #[test]
    fn debug() {
        let loc = LocationRef::new("nbo".into()).unwrap();
        assert_eq!(format!("{:?}", loc), "LocationRef(nbo)");
    }
}
