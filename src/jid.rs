use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_USER_SERVER: &str = "s.whatsapp.net";
pub const GROUP_SERVER: &str = "g.us";

pub type MessageId = String;

static MENTIONED_JID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]+(?:-[0-9]+)?@(?:g\.us|s\.whatsapp\.net)").expect("static regex is valid")
});

#[derive(Debug, Error)]
pub enum JidError {
    #[error("Invalid JID format: {0}")]
    InvalidFormat(String),
    #[error("Failed to parse component: {0}")]
    Parse(#[from] std::num::ParseIntError),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Jid {
    pub user: String,
    pub server: String,
    pub agent: u8,
    pub device: u16,
}

impl Jid {
    pub fn new(user: &str, server: &str) -> Self {
        Self {
            user: user.to_string(),
            server: server.to_string(),
            ..Default::default()
        }
    }

    /// Builds a phone-number user JID on the default server.
    pub fn user(user: &str) -> Self {
        Self::new(user, DEFAULT_USER_SERVER)
    }

    pub fn to_non_ad(&self) -> Self {
        Self {
            user: self.user.clone(),
            server: self.server.clone(),
            ..Default::default()
        }
    }

    pub fn is_group(&self) -> bool {
        self.server == GROUP_SERVER
    }
}

impl FromStr for Jid {
    type Err = JidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user_part, server) = match s.split_once('@') {
            Some((u, s)) => (u, s),
            None => ("", s),
        };

        if server.is_empty() || server.contains('@') {
            return Err(JidError::InvalidFormat(s.to_string()));
        }

        if user_part.is_empty() {
            return Ok(Jid::new("", server));
        }

        let (user_base, device_str) = match user_part.rsplit_once(':') {
            Some((u, d)) => (u, Some(d)),
            None => (user_part, None),
        };

        let (user, agent_str) = match user_base.rsplit_once('.') {
            Some((u, a)) => (u, Some(a)),
            None => (user_base, None),
        };

        let agent = match agent_str {
            Some(a) => a.parse()?,
            None => 0,
        };
        let device = match device_str {
            Some(d) => d.parse()?,
            None => 0,
        };

        Ok(Jid {
            user: user.to_string(),
            server: server.to_string(),
            agent,
            device,
        })
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.user.is_empty() {
            return write!(f, "{}", self.server);
        }
        write!(f, "{}", self.user)?;
        if self.agent > 0 {
            write!(f, ".{}", self.agent)?;
        }
        if self.device > 0 {
            write!(f, ":{}", self.device)?;
        }
        write!(f, "@{}", self.server)
    }
}

impl From<Jid> for String {
    fn from(jid: Jid) -> Self {
        jid.to_string()
    }
}

impl TryFrom<String> for Jid {
    type Error = JidError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Jid::from_str(&value)
    }
}

/// Strips the `:device` suffix from a JID string, leaving anything else untouched.
pub fn decode_jid(jid: &str) -> String {
    match jid.split_once('@') {
        Some((user, server)) => match user.split_once(':') {
            Some((base, _device)) => format!("{base}@{server}"),
            None => jid.to_string(),
        },
        None => jid.to_string(),
    }
}

/// Extracts every user or group JID mentioned in `text`, in order of appearance.
pub fn parsed_jid(text: &str) -> Vec<Jid> {
    MENTIONED_JID
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// The part of a raw sender string before the first `@`.
pub fn sender_local_part(sender: &str) -> &str {
    sender.split('@').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_device_jid() {
        let jid: Jid = "1234:12@s.whatsapp.net".parse().unwrap();
        assert_eq!(jid.user, "1234");
        assert_eq!(jid.device, 12);
        assert_eq!(jid.to_string(), "1234:12@s.whatsapp.net");
        assert_eq!(jid.to_non_ad().to_string(), "1234@s.whatsapp.net");
    }

    #[test]
    fn test_parse_server_only_jid() {
        let jid: Jid = "s.whatsapp.net".parse().unwrap();
        assert!(jid.user.is_empty());
        assert_eq!(jid.to_string(), "s.whatsapp.net");
    }

    #[test]
    fn test_parse_rejects_double_at() {
        assert!("a@b@c".parse::<Jid>().is_err());
        assert!("1234@".parse::<Jid>().is_err());
    }

    #[test]
    fn test_group_jid() {
        let jid: Jid = "1203630-1555@g.us".parse().unwrap();
        assert!(jid.is_group());
        assert!(!Jid::user("1").is_group());
    }

    #[test]
    fn test_decode_jid() {
        assert_eq!(decode_jid("1234:5@s.whatsapp.net"), "1234@s.whatsapp.net");
        assert_eq!(decode_jid("1234@s.whatsapp.net"), "1234@s.whatsapp.net");
        assert_eq!(decode_jid("plain"), "plain");
    }

    #[test]
    fn test_parsed_jid_finds_all_mentions() {
        let found = parsed_jid("hi 111@s.whatsapp.net and 222-333@g.us, not 444@lid");
        let rendered: Vec<String> = found.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["111@s.whatsapp.net", "222-333@g.us"]);
    }

    #[test]
    fn test_parsed_jid_on_device_sender() {
        let found = parsed_jid("1234:7@s.whatsapp.net");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].to_string(), "7@s.whatsapp.net");
    }

    #[test]
    fn test_sender_local_part() {
        assert_eq!(sender_local_part("1234@s.whatsapp.net"), "1234");
        assert_eq!(sender_local_part("nobody"), "nobody");
        assert_eq!(sender_local_part(""), "");
    }
}
