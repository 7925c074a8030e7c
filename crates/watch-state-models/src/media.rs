use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Media kind as the catalog API and the durable records spell it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaType {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Series => write!(f, "tv"),
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" | "series" | "show" => Ok(MediaType::Series),
            other => Err(format!("unknown media type: {}", other)),
        }
    }
}

/// The `(id, type)` pair that identifies a title across both tracked
/// collections. Two entries with the same key are the same title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub id: u64,
    pub media_type: MediaType,
}

impl MediaKey {
    pub fn new(id: u64, media_type: MediaType) -> Self {
        Self { id, media_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_wire_format() {
        assert_eq!(serde_json::to_string(&MediaType::Movie).unwrap(), "\"movie\"");
        assert_eq!(serde_json::to_string(&MediaType::Series).unwrap(), "\"tv\"");
        assert_eq!(
            serde_json::from_str::<MediaType>("\"tv\"").unwrap(),
            MediaType::Series
        );
    }

    #[test]
    fn test_media_type_from_str_aliases() {
        assert_eq!("movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("tv".parse::<MediaType>().unwrap(), MediaType::Series);
        assert_eq!("series".parse::<MediaType>().unwrap(), MediaType::Series);
        assert!("book".parse::<MediaType>().is_err());
    }
}
