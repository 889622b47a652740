//! WhatsApp addressing types.
//!
//! A JID identifies a user, group, or broadcast list. Users appear under
//! two schemes: phone-number JIDs (`254700000001@s.whatsapp.net`), which
//! are globally meaningful, and linked-device LIDs (`8123456@lid`), which
//! are pseudonymous and only correlate to a phone through metadata the
//! transport hands us. The [`resolver`] maps the latter onto the former.

pub mod resolver;

pub use resolver::IdentityResolver;

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Known JID servers.
pub mod servers {
    pub const USER: &str = "s.whatsapp.net";
    pub const LEGACY_USER: &str = "c.us";
    pub const GROUP: &str = "g.us";
    pub const LID: &str = "lid";
    pub const BROADCAST: &str = "broadcast";
    pub const NEWSLETTER: &str = "newsletter";
}

/// A WhatsApp JID: `user[:device]@server`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Jid {
    pub user: String,
    pub device: u16,
    pub server: String,
}

impl Jid {
    /// Create a JID from a user part and server.
    pub fn new(user: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            device: 0,
            server: server.into(),
        }
    }

    /// A phone-number user JID on the default server.
    pub fn phone(number: impl Into<String>) -> Self {
        Self::new(number, servers::USER)
    }

    /// A linked-device JID.
    pub fn lid(user: impl Into<String>) -> Self {
        Self::new(user, servers::LID)
    }

    /// A group JID.
    pub fn group(id: impl Into<String>) -> Self {
        Self::new(id, servers::GROUP)
    }

    /// True for phone-style user JIDs (current or legacy server).
    pub fn is_user(&self) -> bool {
        self.server == servers::USER || self.server == servers::LEGACY_USER
    }

    /// True for linked-device JIDs.
    pub fn is_lid(&self) -> bool {
        self.server == servers::LID
    }

    /// True for group JIDs.
    pub fn is_group(&self) -> bool {
        self.server == servers::GROUP
    }

    /// True for broadcast lists and status broadcasts.
    pub fn is_broadcast(&self) -> bool {
        self.server == servers::BROADCAST
    }

    /// The JID without its device part.
    pub fn bare(&self) -> Self {
        Self {
            user: self.user.clone(),
            device: 0,
            server: self.server.clone(),
        }
    }

    /// The phone number for phone-style JIDs, `None` otherwise.
    ///
    /// LIDs deliberately return `None`: their user part is not a phone
    /// number and must never be treated as one.
    pub fn phone_number(&self) -> Option<&str> {
        if self.is_user() { Some(&self.user) } else { None }
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.device > 0 {
            write!(f, "{}:{}@{}", self.user, self.device, self.server)
        } else if !self.user.is_empty() {
            write!(f, "{}@{}", self.user, self.server)
        } else {
            write!(f, "{}", self.server)
        }
    }
}

/// Error type for JID parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to parse JID: {0}")]
pub struct ParseJidError(pub String);

impl FromStr for Jid {
    type Err = ParseJidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user_part, server) = match s.split_once('@') {
            Some((u, srv)) => (u, srv),
            None => return Ok(Jid::new("", s)),
        };

        if server.is_empty() {
            return Err(ParseJidError("empty server".to_string()));
        }

        let mut jid = Jid::new(user_part, server);

        if let Some((user, device)) = user_part.split_once(':') {
            jid.user = user.to_string();
            jid.device = device
                .parse()
                .map_err(|_| ParseJidError(format!("bad device part in '{s}'")))?;
        }

        Ok(jid)
    }
}

impl Serialize for Jid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Jid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_phone_jid() {
        let jid: Jid = "254700000001@s.whatsapp.net".parse().unwrap();
        assert_eq!(jid.user, "254700000001");
        assert_eq!(jid.server, servers::USER);
        assert_eq!(jid.device, 0);
        assert!(jid.is_user());
        assert_eq!(jid.phone_number(), Some("254700000001"));
    }

    #[test]
    fn parse_device_jid() {
        let jid: Jid = "254700000001:12@s.whatsapp.net".parse().unwrap();
        assert_eq!(jid.device, 12);
        assert_eq!(jid.bare().to_string(), "254700000001@s.whatsapp.net");
    }

    #[test]
    fn parse_group_jid() {
        let jid: Jid = "120363021234567890@g.us".parse().unwrap();
        assert!(jid.is_group());
        assert!(!jid.is_user());
    }

    #[test]
    fn lid_has_no_phone_number() {
        let jid: Jid = "81234567890123@lid".parse().unwrap();
        assert!(jid.is_lid());
        assert_eq!(jid.phone_number(), None);
    }

    #[test]
    fn display_round_trip() {
        for raw in [
            "254700000001@s.whatsapp.net",
            "254700000001:3@s.whatsapp.net",
            "120363021234567890@g.us",
            "81234567890123@lid",
        ] {
            let jid: Jid = raw.parse().unwrap();
            assert_eq!(jid.to_string(), raw);
        }
    }

    #[test]
    fn bad_device_rejected() {
        assert!("abc:xyz@s.whatsapp.net".parse::<Jid>().is_err());
    }

    #[test]
    fn serde_as_string() {
        let jid = Jid::phone("254700000001");
        let json = serde_json::to_string(&jid).unwrap();
        assert_eq!(json, "\"254700000001@s.whatsapp.net\"");
        let back: Jid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, jid);
    }
}
