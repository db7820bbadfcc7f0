//! Small newtype identifiers shared across the crate.
//!
//! These are deliberately thin: the solver's hot paths compare items and
//! options by index equality, which is the moral equivalent of the pointer
//! equality the original C++ implementation relies on once names have been
//! interned at setup time.

/// Identifies an option (a "sequence" in Knuth's terminology) by its
/// 0-based insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(pub(crate) u32);

impl OptionId {
    #[must_use]
    pub(crate) fn new(id: u32) -> Self {
        OptionId(id)
    }

    /// Returns the 0-based index of this option among all options added to
    /// the builder, in insertion order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies an item (primary or secondary) by its position in the
/// compiled [`Problem`](crate::problem::Problem): primary items first, then
/// secondary items, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    /// Creates an `ItemId` directly. Mainly useful for doctests and for
    /// collaborators that already know the compiled item order.
    #[must_use]
    pub fn new(id: u32) -> Self {
        ItemId(id)
    }

    #[must_use]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies one of the problem's declared color names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorId(pub(crate) u32);

impl ColorId {
    /// Creates a `ColorId` directly. See [`ItemId::new`].
    #[must_use]
    pub fn new(id: u32) -> Self {
        ColorId(id)
    }

    #[must_use]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The lower (`u`) and upper (`v`) multiplicity bounds of a primary item:
/// it must be used at least `u` times and at most `v` times in a solution.
///
/// Invariant: `1 <= u <= v`. A plain exact-cover item (used exactly once)
/// is `Bounds { u: 1, v: 1 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub u: u32,
    pub v: u32,
}

impl Bounds {
    #[must_use]
    pub fn new(u: u32, v: u32) -> Self {
        Bounds { u, v }
    }

    #[must_use]
    pub fn exactly_one() -> Self {
        Bounds { u: 1, v: 1 }
    }
}

/// A reference to an item within an option: either a bare item, or (for
/// secondary items only) an item annotated with a color.
///
/// # Examples
///
/// ```
/// use dlx_m::{ColoredItem, ItemId};
///
/// let item = ColoredItem::new(ItemId::new(1));
/// assert_eq!(item.color(), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ColoredItem {
    item_id: ItemId,
    color: Option<ColorId>,
}

impl ColoredItem {
    /// Creates a reference to an uncolored item (valid for both primary and
    /// secondary items).
    #[must_use]
    pub fn new(item_id: ItemId) -> Self {
        ColoredItem {
            item_id,
            color: None,
        }
    }

    /// Creates a reference to a secondary item with a color attached.
    #[must_use]
    pub fn with_color(item_id: ItemId, color: ColorId) -> Self {
        ColoredItem {
            item_id,
            color: Some(color),
        }
    }

    #[must_use]
    pub fn item(&self) -> ItemId {
        self.item_id
    }

    #[must_use]
    pub fn color(&self) -> Option<ColorId> {
        self.color
    }
}
