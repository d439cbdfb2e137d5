use crate::error::AppError;
use std::fmt;
use std::str::FromStr;

/// 列表类型（Reddit 的排序接口）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingType {
    #[default]
    Hot,
    New,
    Top,
    Rising,
}

impl ListingType {
    /// 所有支持的类型
    pub const ALL: [ListingType; 4] = [
        ListingType::Hot,
        ListingType::New,
        ListingType::Top,
        ListingType::Rising,
    ];

    /// 对应的接口路径片段
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Hot => "hot",
            ListingType::New => "new",
            ListingType::Top => "top",
            ListingType::Rising => "rising",
        }
    }
}

impl FromStr for ListingType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ListingType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| AppError::InvalidListingType(s.to_string()))
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types_case_insensitively() {
        assert_eq!("hot".parse::<ListingType>().unwrap(), ListingType::Hot);
        assert_eq!("NEW".parse::<ListingType>().unwrap(), ListingType::New);
        assert_eq!(" top ".parse::<ListingType>().unwrap(), ListingType::Top);
        assert_eq!("Rising".parse::<ListingType>().unwrap(), ListingType::Rising);
    }

    #[test]
    fn rejects_controversial() {
        let err = "controversial".parse::<ListingType>().unwrap_err();
        assert!(matches!(err, AppError::InvalidListingType(ref t) if t == "controversial"));
    }

    #[test]
    fn display_matches_endpoint_segment() {
        for t in ListingType::ALL {
            assert_eq!(t.to_string(), t.as_str());
        }
        assert_eq!(ListingType::default(), ListingType::Hot);
    }
}
