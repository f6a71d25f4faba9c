//! Overflow Property Definitions
//!
//! The overflow property family the fallback pass listens to, and the
//! keywords it rewrites. Uses enums for fixed values instead of strings.

/// Property identifier for the overflow family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OverflowProperty {
    /// `overflow` shorthand (one or two keywords)
    Overflow,
    OverflowX,
    OverflowY,
    OverflowBlock,
    OverflowInline,
}

impl OverflowProperty {
    /// Every property handled by the fallback pass, in dispatch order
    pub const ALL: [OverflowProperty; 5] = [
        OverflowProperty::Overflow,
        OverflowProperty::OverflowBlock,
        OverflowProperty::OverflowInline,
        OverflowProperty::OverflowX,
        OverflowProperty::OverflowY,
    ];

    /// Parse a property name into an OverflowProperty.
    ///
    /// Names are matched exactly. Unrelated members of the `overflow-*`
    /// namespace such as `overflow-wrap` or `overflow-clip-margin` are not
    /// part of the family.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "overflow" => Self::Overflow,
            "overflow-x" => Self::OverflowX,
            "overflow-y" => Self::OverflowY,
            "overflow-block" => Self::OverflowBlock,
            "overflow-inline" => Self::OverflowInline,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Overflow => "overflow",
            Self::OverflowX => "overflow-x",
            Self::OverflowY => "overflow-y",
            Self::OverflowBlock => "overflow-block",
            Self::OverflowInline => "overflow-inline",
        }
    }

    /// Only the shorthand accepts the two-keyword syntax
    pub fn is_shorthand(self) -> bool {
        matches!(self, Self::Overflow)
    }
}

/// Overflow keywords involved in fallback generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowKeyword {
    // Modern keywords
    Clip,
    Overlay,

    // Widely supported replacements
    Hidden,
    Auto,
}

impl OverflowKeyword {
    pub fn from_keyword(value: &str) -> Option<Self> {
        Some(match value {
            "clip" => Self::Clip,
            "overlay" => Self::Overlay,
            "hidden" => Self::Hidden,
            "auto" => Self::Auto,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clip => "clip",
            Self::Overlay => "overlay",
            Self::Hidden => "hidden",
            Self::Auto => "auto",
        }
    }

    /// The keyword older engines understand in place of this one.
    ///
    /// `None` for keywords that are already universally supported.
    pub fn fallback(self) -> Option<Self> {
        match self {
            Self::Clip => Some(Self::Hidden),
            Self::Overlay => Some(Self::Auto),
            Self::Hidden | Self::Auto => None,
        }
    }
}
