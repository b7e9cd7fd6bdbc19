use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in device pixels.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// X coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether `inner` lies within this rectangle, allowing `epsilon`
    /// slack per edge for rounding.
    #[must_use]
    pub fn contains(&self, inner: &Rect, epsilon: f64) -> bool {
        inner.x >= self.x - epsilon
            && inner.y >= self.y - epsilon
            && inner.right() <= self.right() + epsilon
            && inner.bottom() <= self.bottom() + epsilon
    }
}

/// The closed color palette of the target surface.
///
/// Arbitrary sheet colors are approximated onto these entries; the mapping
/// is lossy by design.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SceneColor {
    Black,
    Grey,
    LightViolet,
    Violet,
    Blue,
    LightBlue,
    Yellow,
    Orange,
    Green,
    LightGreen,
    LightRed,
    Red,
    White,
}

impl SceneColor {
    /// Stable name as used by the target surface.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Grey => "grey",
            Self::LightViolet => "light-violet",
            Self::Violet => "violet",
            Self::Blue => "blue",
            Self::LightBlue => "light-blue",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Green => "green",
            Self::LightGreen => "light-green",
            Self::LightRed => "light-red",
            Self::Red => "red",
            Self::White => "white",
        }
    }
}

/// The four font families the target surface can render.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
    Decorative,
}

/// The four discrete font size tiers of the target surface.
///
/// Continuous point sizes are bucketed; the mapping is lossy by design.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontSize {
    #[serde(rename = "s")]
    S,
    #[serde(rename = "m")]
    M,
    #[serde(rename = "l")]
    L,
    #[serde(rename = "xl")]
    Xl,
}

/// Stroke dash pattern.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DashStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Whether a rectangle is filled or outline-only.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    None,
    Solid,
}

/// Identifier of a created scene object, issued by the scene store.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// Identifier of a registered pixel asset, issued by the scene store.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub u64);

/// Primitive object kind, for reporting and store bookkeeping.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Rectangle,
    Text,
    Image,
}

/// One drawable-object creation command, fully resolved.
///
/// Commands are emitted to the scene store in a strict order; the enum is
/// matched exhaustively wherever commands are consumed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DrawableObject {
    Rectangle(RectangleObject),
    Text(TextObject),
    Image(ImageObject),
}

impl DrawableObject {
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        match self {
            Self::Rectangle(_) => ObjectKind::Rectangle,
            Self::Text(_) => ObjectKind::Text,
            Self::Image(_) => ObjectKind::Image,
        }
    }

    #[must_use]
    pub const fn geometry(&self) -> &Rect {
        match self {
            Self::Rectangle(r) => &r.geometry,
            Self::Text(t) => &t.geometry,
            Self::Image(i) => &i.geometry,
        }
    }
}

/// A rectangle primitive: cell fill, cell border, textbox background, or
/// image placeholder.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RectangleObject {
    pub geometry: Rect,
    pub fill: FillMode,
    pub color: SceneColor,
    pub dash: DashStyle,
}

/// A text primitive with fixed wrap width.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextObject {
    /// Position plus wrap width; height is the estimated wrapped height.
    pub geometry: Rect,
    pub content: String,
    pub color: SceneColor,
    pub font: FontFamily,
    pub size: FontSize,
}

/// An image primitive referencing a registered pixel asset.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageObject {
    pub geometry: Rect,
    pub asset: AssetId,
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.area(), 1200.0);
    }

    #[test]
    fn test_rect_contains_with_epsilon() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&Rect::new(10.0, 10.0, 80.0, 80.0), 0.0));
        // 1px overshoot is tolerated at epsilon 1
        assert!(outer.contains(&Rect::new(0.0, 0.0, 101.0, 100.0), 1.0));
        assert!(!outer.contains(&Rect::new(0.0, 0.0, 102.0, 100.0), 1.0));
    }

    #[test]
    fn test_scene_color_names() {
        assert_eq!(SceneColor::LightBlue.name(), "light-blue");
        assert_eq!(SceneColor::Black.name(), "black");
    }

    #[test]
    fn test_font_size_ordering() {
        assert!(FontSize::S < FontSize::M);
        assert!(FontSize::L < FontSize::Xl);
    }

    #[test]
    fn test_drawable_serde_tagging() {
        let object = DrawableObject::Rectangle(RectangleObject {
            geometry: Rect::new(0.0, 0.0, 10.0, 10.0),
            fill: FillMode::Solid,
            color: SceneColor::Red,
            dash: DashStyle::Solid,
        });
        let json = serde_json::to_string(&object).unwrap();
        assert!(json.contains(r#""kind":"rectangle"#));
        let back: DrawableObject = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), ObjectKind::Rectangle);
    }
}
