#![forbid(unsafe_code)]

//! The closed gesture taxonomy.
//!
//! A [`Gesture`] is either one of a handful of atomic symbols (long click,
//! double click, hardware keys, clock taps) or a [`Swipe`]: a base
//! [`Direction`] plus at most one [`Modifier`].
//!
//! # Composition
//!
//! Modifiers are orthogonal to the direction and are expressed relative to
//! the swipe's *free axis* (the axis perpendicular to the motion) via
//! [`Side`], so every `(Direction, Modifier)` pair is a valid symbol and all
//! lookups are exhaustive matches. The composition functions
//! ([`Swipe::doubled`], [`Swipe::with_edge`], [`Swipe::with_bulge`],
//! [`Swipe::with_tap_combo`]) only ever refine a plain swipe; applied to an
//! already-modified swipe they return it unchanged.
//!
//! # Identifiers
//!
//! Every symbol has a stable string id (`action.up`, `action.double_left`,
//! ...) used as a preference key by the action binding layer, and a
//! `SCREAMING_CASE` display name.

use std::fmt;

use crate::config::GesturePreferences;

// ---------------------------------------------------------------------------
// Direction / Side / Edge
// ---------------------------------------------------------------------------

/// Cardinal base direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in taxonomy order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns true for vertical directions.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Returns true for horizontal directions.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Returns true for directions pointing towards smaller coordinates.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::Up | Self::Left)
    }
}

/// A side of the free axis of a swipe.
///
/// For vertical swipes the free axis is `x` (`Low` = left, `High` = right);
/// for horizontal swipes it is `y` (`Low` = top, `High` = bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Low,
    High,
}

/// A screen edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Side of the free axis of `direction` this edge lies on, if the edge is
    /// parallel to the motion.
    #[must_use]
    pub const fn side_for(self, direction: Direction) -> Option<Side> {
        match (self, direction.is_vertical()) {
            (Self::Left, true) | (Self::Top, false) => Some(Side::Low),
            (Self::Right, true) | (Self::Bottom, false) => Some(Side::High),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Swipe
// ---------------------------------------------------------------------------

/// Refinement applied to a base swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// A plain one-finger swipe.
    Plain,
    /// Two or more fingers moving the same way.
    Double,
    /// Performed entirely within the edge band on the given side.
    Edge(Side),
    /// Performed shortly after a tap.
    TapCombo,
    /// The path bulged away from its chord towards the given side.
    Bulge(Side),
}

/// A swipe symbol: base direction plus modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swipe {
    direction: Direction,
    modifier: Modifier,
}

impl Swipe {
    /// A plain swipe in `direction`.
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self::from_parts(direction, Modifier::Plain)
    }

    /// Build a swipe from its parts. Every combination is a valid symbol.
    #[must_use]
    pub const fn from_parts(direction: Direction, modifier: Modifier) -> Self {
        Self {
            direction,
            modifier,
        }
    }

    #[must_use]
    pub const fn direction(self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn modifier(self) -> Modifier {
        self.modifier
    }

    #[must_use]
    pub const fn is_plain(self) -> bool {
        matches!(self.modifier, Modifier::Plain)
    }

    /// Apply `modifier` if this swipe is still plain.
    #[must_use]
    pub const fn compose(self, modifier: Modifier) -> Self {
        if self.is_plain() {
            Self::from_parts(self.direction, modifier)
        } else {
            self
        }
    }

    /// The two-finger variant.
    #[must_use]
    pub const fn doubled(self) -> Self {
        self.compose(Modifier::Double)
    }

    /// The edge variant for `edge`; unchanged when the edge is perpendicular
    /// to the motion (an upward swipe has no top-edge variant).
    #[must_use]
    pub const fn with_edge(self, edge: Edge) -> Self {
        match edge.side_for(self.direction) {
            Some(side) => self.compose(Modifier::Edge(side)),
            None => self,
        }
    }

    /// The triangle variant bulging towards `side`.
    #[must_use]
    pub const fn with_bulge(self, side: Side) -> Self {
        self.compose(Modifier::Bulge(side))
    }

    /// The tap-and-swipe variant.
    #[must_use]
    pub const fn with_tap_combo(self) -> Self {
        self.compose(Modifier::TapCombo)
    }

    const fn descriptor(self) -> (&'static str, &'static str) {
        use Direction::{Down, Left, Right, Up};
        use Modifier::{Bulge, Double, Edge, Plain, TapCombo};
        use Side::{High, Low};

        match (self.direction, self.modifier) {
            (Up, Plain) => ("action.up", "SWIPE_UP"),
            (Up, Edge(Low)) => ("action.up_left", "SWIPE_UP_LEFT_EDGE"),
            (Up, Edge(High)) => ("action.up_right", "SWIPE_UP_RIGHT_EDGE"),
            (Up, TapCombo) => ("action.tap_up", "TAP_AND_SWIPE_UP"),
            (Up, Double) => ("action.double_up", "SWIPE_UP_DOUBLE"),
            (Up, Bulge(High)) => ("action.larger_reverse", "SWIPE_LARGER_REVERSE"),
            (Up, Bulge(Low)) => ("action.smaller_reverse", "SWIPE_SMALLER_REVERSE"),

            (Down, Plain) => ("action.down", "SWIPE_DOWN"),
            (Down, Edge(Low)) => ("action.down_left", "SWIPE_DOWN_LEFT_EDGE"),
            (Down, Edge(High)) => ("action.down_right", "SWIPE_DOWN_RIGHT_EDGE"),
            (Down, TapCombo) => ("action.tap_down", "TAP_AND_SWIPE_DOWN"),
            (Down, Double) => ("action.double_down", "SWIPE_DOWN_DOUBLE"),
            (Down, Bulge(High)) => ("action.larger", "SWIPE_LARGER"),
            (Down, Bulge(Low)) => ("action.smaller", "SWIPE_SMALLER"),

            (Left, Plain) => ("action.left", "SWIPE_LEFT"),
            (Left, Edge(Low)) => ("action.left_top", "SWIPE_LEFT_TOP_EDGE"),
            (Left, Edge(High)) => ("action.left_bottom", "SWIPE_LEFT_BOTTOM_EDGE"),
            (Left, TapCombo) => ("action.tap_left", "TAP_AND_SWIPE_LEFT"),
            (Left, Double) => ("action.double_left", "SWIPE_LEFT_DOUBLE"),
            (Left, Bulge(High)) => ("action.v_reverse", "SWIPE_V_REVERSE"),
            (Left, Bulge(Low)) => ("action.lambda_reverse", "SWIPE_LAMBDA_REVERSE"),

            (Right, Plain) => ("action.right", "SWIPE_RIGHT"),
            (Right, Edge(Low)) => ("action.right_top", "SWIPE_RIGHT_TOP_EDGE"),
            (Right, Edge(High)) => ("action.right_bottom", "SWIPE_RIGHT_BOTTOM_EDGE"),
            (Right, TapCombo) => ("action.tap_right", "TAP_AND_SWIPE_RIGHT"),
            (Right, Double) => ("action.double_right", "SWIPE_RIGHT_DOUBLE"),
            (Right, Bulge(High)) => ("action.v", "SWIPE_V"),
            (Right, Bulge(Low)) => ("action.lambda", "SWIPE_LAMBDA"),
        }
    }
}

// ---------------------------------------------------------------------------
// Gesture
// ---------------------------------------------------------------------------

/// A resolved gesture symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Hardware volume-up key.
    VolumeUp,
    /// Hardware volume-down key.
    VolumeDown,
    /// Tap on the clock's time.
    Time,
    /// Tap on the clock's date.
    Date,
    /// Back key or back gesture.
    Back,
    /// One finger held still beyond the long-press timeout.
    LongClick,
    /// Two taps in quick succession at the same place.
    DoubleClick,
    Swipe(Swipe),
}

macro_rules! swipe_row {
    ($dir:expr) => {
        [
            Gesture::Swipe(Swipe::from_parts($dir, Modifier::Plain)),
            Gesture::Swipe(Swipe::from_parts($dir, Modifier::Edge(Side::Low))),
            Gesture::Swipe(Swipe::from_parts($dir, Modifier::Edge(Side::High))),
            Gesture::Swipe(Swipe::from_parts($dir, Modifier::TapCombo)),
            Gesture::Swipe(Swipe::from_parts($dir, Modifier::Double)),
        ]
    };
}

const fn bulge(direction: Direction, side: Side) -> Gesture {
    Gesture::Swipe(Swipe::from_parts(direction, Modifier::Bulge(side)))
}

const UP_ROW: [Gesture; 5] = swipe_row!(Direction::Up);
const DOWN_ROW: [Gesture; 5] = swipe_row!(Direction::Down);
const LEFT_ROW: [Gesture; 5] = swipe_row!(Direction::Left);
const RIGHT_ROW: [Gesture; 5] = swipe_row!(Direction::Right);

impl Gesture {
    /// Every symbol of the taxonomy, in canonical order.
    pub const ALL: [Self; 35] = [
        Self::VolumeUp,
        Self::VolumeDown,
        Self::Time,
        Self::Date,
        Self::Back,
        Self::LongClick,
        Self::DoubleClick,
        UP_ROW[0],
        UP_ROW[1],
        UP_ROW[2],
        UP_ROW[3],
        UP_ROW[4],
        DOWN_ROW[0],
        DOWN_ROW[1],
        DOWN_ROW[2],
        DOWN_ROW[3],
        DOWN_ROW[4],
        LEFT_ROW[0],
        LEFT_ROW[1],
        LEFT_ROW[2],
        LEFT_ROW[3],
        LEFT_ROW[4],
        RIGHT_ROW[0],
        RIGHT_ROW[1],
        RIGHT_ROW[2],
        RIGHT_ROW[3],
        RIGHT_ROW[4],
        bulge(Direction::Down, Side::High),
        bulge(Direction::Up, Side::High),
        bulge(Direction::Down, Side::Low),
        bulge(Direction::Up, Side::Low),
        bulge(Direction::Right, Side::Low),
        bulge(Direction::Left, Side::Low),
        bulge(Direction::Right, Side::High),
        bulge(Direction::Left, Side::High),
    ];

    /// A plain swipe in `direction`.
    #[must_use]
    pub const fn swipe(direction: Direction) -> Self {
        Self::Swipe(Swipe::new(direction))
    }

    /// Stable identifier used as a preference key.
    #[must_use]
    pub const fn id(self) -> &'static str {
        self.descriptor().0
    }

    /// `SCREAMING_CASE` name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.descriptor().1
    }

    /// Look a gesture up by its [`id`](Self::id).
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|gesture| gesture.id() == id)
    }

    /// The swipe payload, if this is a swipe.
    #[must_use]
    pub const fn as_swipe(self) -> Option<Swipe> {
        match self {
            Self::Swipe(swipe) => Some(swipe),
            _ => None,
        }
    }

    /// Apply `f` to swipes; atomic symbols pass through.
    #[must_use]
    pub fn map_swipe(self, f: impl FnOnce(Swipe) -> Swipe) -> Self {
        match self {
            Self::Swipe(swipe) => Self::Swipe(f(swipe)),
            other => other,
        }
    }

    #[must_use]
    pub const fn is_double_variant(self) -> bool {
        matches!(self.as_swipe(), Some(s) if matches!(s.modifier, Modifier::Double))
    }

    #[must_use]
    pub const fn is_edge_variant(self) -> bool {
        matches!(self.as_swipe(), Some(s) if matches!(s.modifier, Modifier::Edge(_)))
    }

    /// Whether the gesture can currently be produced under `preferences`.
    #[must_use]
    pub const fn is_enabled(self, preferences: &GesturePreferences) -> bool {
        if self.is_edge_variant() {
            return preferences.edge_swipe;
        }
        if self.is_double_variant() {
            return preferences.double_swipe;
        }
        true
    }

    const fn descriptor(self) -> (&'static str, &'static str) {
        match self {
            Self::VolumeUp => ("action.volume_up", "VOLUME_UP"),
            Self::VolumeDown => ("action.volume_down", "VOLUME_DOWN"),
            Self::Time => ("action.time", "TIME"),
            Self::Date => ("action.date", "DATE"),
            Self::Back => ("action.back", "BACK"),
            Self::LongClick => ("action.long_click", "LONG_CLICK"),
            Self::DoubleClick => ("action.double_click", "DOUBLE_CLICK"),
            Self::Swipe(swipe) => swipe.descriptor(),
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Swipe> for Gesture {
    fn from(swipe: Swipe) -> Self {
        Self::Swipe(swipe)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Gesture {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Gesture {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::from_id(&id)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown gesture id `{id}`")))
    }
}
