//! 画幅比例枚举

/// 输出画幅比例
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    /// 1:1
    Square,
    /// 4:3
    Landscape,
    /// 3:4
    Portrait,
    /// 16:9
    Widescreen,
    /// 9:16
    Vertical,
}

impl AspectRatio {
    /// 传给编辑服务的标识，同时也是展示用的标签
    pub fn id(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Vertical => "9:16",
        }
    }

    /// 从标识解析画幅比例
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1:1" => Some(AspectRatio::Square),
            "4:3" => Some(AspectRatio::Landscape),
            "3:4" => Some(AspectRatio::Portrait),
            "16:9" => Some(AspectRatio::Widescreen),
            "9:16" => Some(AspectRatio::Vertical),
            _ => None,
        }
    }

    /// 全部可选比例，按展示顺序
    pub fn all() -> [AspectRatio; 5] {
        [
            AspectRatio::Square,
            AspectRatio::Landscape,
            AspectRatio::Portrait,
            AspectRatio::Widescreen,
            AspectRatio::Vertical,
        ]
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_roundtrip() {
        for ratio in AspectRatio::all() {
            assert_eq!(AspectRatio::from_str(ratio.id()), Some(ratio));
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!(AspectRatio::from_str("2:1"), None);
        assert_eq!(AspectRatio::from_str(""), None);
    }
}
