//! Resource identities drawn from the shared pool.
//!
//! A `ResourceKey` is compared by identity: the same connector in two
//! different colors is two different keys.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ResourceKind {
    Item,
    Fluid,
}

/// Identity of one fungible resource type in a ledger.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ResourceKey {
    #[serde(rename = "k")]
    kind: ResourceKind,
    #[serde(rename = "i")]
    id: String,
    /// Auxiliary data distinguishing otherwise identical resources.
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
}

impl ResourceKey {
    pub fn item(id: impl Into<String>) -> Self {
        ResourceKey {
            kind: ResourceKind::Item,
            id: id.into(),
            tag: None,
        }
    }

    pub fn fluid(id: impl Into<String>) -> Self {
        ResourceKey {
            kind: ResourceKind::Fluid,
            id: id.into(),
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{}[{}]", self.id, tag),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Connector color. `Neutral` is the uncolored default and has no dye.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Color {
    Neutral,
    White,
    Orange,
    Magenta,
    LightBlue,
    Yellow,
    Lime,
    Pink,
    Gray,
    LightGray,
    Cyan,
    Purple,
    Blue,
    Brown,
    Green,
    Red,
    Black,
}

impl Color {
    /// Palette order, used when falling back to "any available color".
    pub const ALL: [Color; 17] = [
        Color::Neutral,
        Color::White,
        Color::Orange,
        Color::Magenta,
        Color::LightBlue,
        Color::Yellow,
        Color::Lime,
        Color::Pink,
        Color::Gray,
        Color::LightGray,
        Color::Cyan,
        Color::Purple,
        Color::Blue,
        Color::Brown,
        Color::Green,
        Color::Red,
        Color::Black,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Color::Neutral => "neutral",
            Color::White => "white",
            Color::Orange => "orange",
            Color::Magenta => "magenta",
            Color::LightBlue => "light_blue",
            Color::Yellow => "yellow",
            Color::Lime => "lime",
            Color::Pink => "pink",
            Color::Gray => "gray",
            Color::LightGray => "light_gray",
            Color::Cyan => "cyan",
            Color::Purple => "purple",
            Color::Blue => "blue",
            Color::Brown => "brown",
            Color::Green => "green",
            Color::Red => "red",
            Color::Black => "black",
        }
    }

    pub fn from_name(name: &str) -> Option<Color> {
        Color::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Next color in palette order, wrapping around.
    pub fn next(self) -> Color {
        let index = Color::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Color::ALL[(index + 1) % Color::ALL.len()]
    }

    /// Key of the dye that recolors a connector to this color.
    pub fn dye_key(self) -> Option<ResourceKey> {
        match self {
            Color::Neutral => None,
            c => Some(ResourceKey::item("dye").with_tag(c.name())),
        }
    }
}

/// A family of connector resources that differ only by color.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct ConnectorFamily {
    base: String,
}

impl ConnectorFamily {
    pub fn new(base: impl Into<String>) -> Self {
        ConnectorFamily { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn key(&self, color: Color) -> ResourceKey {
        match color {
            Color::Neutral => ResourceKey::item(self.base.as_str()),
            c => ResourceKey::item(self.base.as_str()).with_tag(c.name()),
        }
    }

    /// The color of `key` if it belongs to this family.
    pub fn color_of(&self, key: &ResourceKey) -> Option<Color> {
        if key.kind() != ResourceKind::Item || key.id() != self.base {
            return None;
        }
        match key.tag() {
            None => Some(Color::Neutral),
            Some(tag) => Color::from_name(tag).filter(|c| *c != Color::Neutral),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = (Color, ResourceKey)> + '_ {
        Color::ALL.iter().map(move |c| (*c, self.key(*c)))
    }
}
