use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The four stages of Polya's problem-solving method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PolyaStep {
    #[default]
    Understand,
    Plan,
    Execute,
    Review,
}

impl PolyaStep {
    pub const ALL: [PolyaStep; 4] = [
        PolyaStep::Understand,
        PolyaStep::Plan,
        PolyaStep::Execute,
        PolyaStep::Review,
    ];

    /// Maps the server's 1-based step number; out-of-range values are clamped.
    #[must_use]
    pub fn from_number(number: u8) -> Self {
        match number {
            0 | 1 => PolyaStep::Understand,
            2 => PolyaStep::Plan,
            3 => PolyaStep::Execute,
            _ => PolyaStep::Review,
        }
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            PolyaStep::Understand => 1,
            PolyaStep::Plan => 2,
            PolyaStep::Execute => 3,
            PolyaStep::Review => 4,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PolyaStep::Understand => "Hiểu bài toán",
            PolyaStep::Plan => "Lập kế hoạch",
            PolyaStep::Execute => "Thực hiện",
            PolyaStep::Review => "Kiểm tra",
        }
    }

    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            PolyaStep::Understand => "Hiểu đề",
            PolyaStep::Plan => "Kế hoạch",
            PolyaStep::Execute => "Thực hiện",
            PolyaStep::Review => "Kiểm tra",
        }
    }
}

impl fmt::Display for PolyaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

impl Serialize for PolyaStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for PolyaStep {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = u8::deserialize(deserializer)?;
        Ok(Self::from_number(number))
    }
}
