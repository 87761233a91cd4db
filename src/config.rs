use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFIX: &str = ".";

/// A comma-separated list of phone numbers allowed to run privileged commands.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AllowList(Vec<String>);

impl AllowList {
    pub fn parse(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, local_part: &str) -> bool {
        !local_part.is_empty() && self.0.iter().any(|entry| entry == local_part)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }
}

impl From<String> for AllowList {
    fn from(list: String) -> Self {
        Self::parse(&list)
    }
}

impl From<AllowList> for String {
    fn from(list: AllowList) -> Self {
        list.0.join(",")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerMetadata {
    pub pack_name: String,
    pub author: String,
}

impl StickerMetadata {
    pub fn new(pack_name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            pack_name: pack_name.into(),
            author: author.into(),
        }
    }

    /// Pack metadata stamped on stickers sent through `Message::send`.
    pub fn send_default() -> Self {
        Self::new("ᴀsᴛʀᴏ", "ғxᴏᴘ-ᴍᴅ")
    }

    /// Pack metadata used by `Message::send_message` when no options are given.
    pub fn dispatch_default() -> Self {
        Self::new("fx", "Astro")
    }
}

pub const DISPATCH_DEFAULT_FILE_NAME: &str = "fxop-md";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageConfig {
    pub sudo: AllowList,
    pub devs: AllowList,
    /// Command prefix handed to command handlers untouched.
    pub prefix: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            sudo: AllowList::default(),
            devs: AllowList::default(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl MessageConfig {
    pub fn new(sudo: &str, devs: &str, prefix: impl Into<String>) -> Self {
        Self {
            sudo: AllowList::parse(sudo),
            devs: AllowList::parse(devs),
            prefix: prefix.into(),
        }
    }

    /// Reads `SUDO`, `DEVS` and `HANDLERS` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            sudo: AllowList::parse(&lookup("SUDO").unwrap_or_default()),
            devs: AllowList::parse(&lookup("DEVS").unwrap_or_default()),
            prefix: lookup("HANDLERS").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_allow_list_trims_and_skips_empty_entries() {
        let list = AllowList::parse(" 111, ,222,");
        assert_eq!(list.entries(), ["111", "222"]);
        assert!(list.contains("222"));
        assert!(!list.contains("333"));
    }

    #[test]
    fn test_empty_allow_list_matches_nobody() {
        let list = AllowList::parse("");
        assert!(list.is_empty());
        assert!(!list.contains(""));
        assert!(!list.contains("111"));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = MessageConfig::from_lookup(|_| None);
        assert!(config.sudo.is_empty());
        assert!(config.devs.is_empty());
        assert_eq!(config.prefix, DEFAULT_PREFIX);
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let env: HashMap<&str, &str> =
            HashMap::from([("SUDO", "1,2"), ("DEVS", "3"), ("HANDLERS", "^[!]")]);
        let config = MessageConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert!(config.sudo.contains("2"));
        assert!(config.devs.contains("3"));
        assert_eq!(config.prefix, "^[!]");
    }

    #[test]
    fn test_allow_list_serde_as_string() {
        let config = MessageConfig::new("1,2", "", ".");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"sudo\":\"1,2\""));
        let back: MessageConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
