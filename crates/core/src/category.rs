//! Product categories
//!
//! The catalog sells products under a fixed set of categories. Their order is
//! significant: aggregate reads list one product per category in this order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// 상의
    #[serde(rename = "상의")]
    Top,
    /// 아우터
    #[serde(rename = "아우터")]
    Outer,
    /// 바지
    #[serde(rename = "바지")]
    Pants,
    /// 스니커즈
    #[serde(rename = "스니커즈")]
    Sneakers,
    /// 가방
    #[serde(rename = "가방")]
    Bag,
    /// 모자
    #[serde(rename = "모자")]
    Hat,
    /// 양말
    #[serde(rename = "양말")]
    Socks,
    /// 액세서리
    #[serde(rename = "액세서리")]
    Accessory,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 8] = [
        Category::Top,
        Category::Outer,
        Category::Pants,
        Category::Sneakers,
        Category::Bag,
        Category::Hat,
        Category::Socks,
        Category::Accessory,
    ];

    /// Korean label used in listings
    pub const fn label(&self) -> &'static str {
        match self {
            Category::Top => "상의",
            Category::Outer => "아우터",
            Category::Pants => "바지",
            Category::Sneakers => "스니커즈",
            Category::Bag => "가방",
            Category::Hat => "모자",
            Category::Socks => "양말",
            Category::Accessory => "액세서리",
        }
    }

    /// English name, lowercase
    pub const fn name(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Outer => "outer",
            Category::Pants => "pants",
            Category::Sneakers => "sneakers",
            Category::Bag => "bag",
            Category::Hat => "hat",
            Category::Socks => "socks",
            Category::Accessory => "accessory",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Accepts the Korean label or the English name (any case)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label() == s || c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
                Error::invalid_input(format!(
                    "category must be one of {}, got '{}'",
                    labels.join(","),
                    s
                ))
            })
    }
}
