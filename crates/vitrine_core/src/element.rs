use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

// ---------------------------------------------------------------------------
// Element type
// ---------------------------------------------------------------------------

/// The kind of block placed on a page.
///
/// Only the three product blocks have dedicated rendering; any other tag is
/// kept verbatim in [`ElementType::Other`] and rendered as a generic block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementType {
    ProductSection,
    SpecsSection,
    CtaButton,
    Other(String),
}

impl ElementType {
    /// Wire tag used in persisted JSON and the component catalog.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ProductSection => "product-section",
            Self::SpecsSection => "specs-section",
            Self::CtaButton => "cta-button",
            Self::Other(tag) => tag,
        }
    }

    pub fn parse(tag: &str) -> Self {
        match tag {
            "product-section" => Self::ProductSection,
            "specs-section" => Self::SpecsSection,
            "cta-button" => Self::CtaButton,
            other => Self::Other(other.to_string()),
        }
    }

    /// Human-readable label for the element type.
    pub fn label(&self) -> &str {
        match self {
            Self::ProductSection => "Seção do Produto",
            Self::SpecsSection => "Especificações Técnicas",
            Self::CtaButton => "Botão de Ação",
            Self::Other(tag) => tag,
        }
    }

    /// All types with dedicated rendering, in catalog order.
    pub fn known() -> [Self; 3] {
        [Self::ProductSection, Self::SpecsSection, Self::CtaButton]
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

impl From<ElementType> for String {
    fn from(kind: ElementType) -> Self {
        match kind {
            ElementType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Per-edge pixel spacing used for padding and margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<i32>,
}

impl Spacing {
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
            left: Some(left),
        }
    }

    pub fn uniform(px: i32) -> Self {
        Self::new(px, px, px, px)
    }

    /// Edges in CSS order, paired with their property suffix.
    fn edges(&self) -> [(&'static str, Option<i32>); 4] {
        [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ]
    }
}

/// Entrance animation applied when the block scrolls into view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Visual attributes of an element. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Spacing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Spacing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
}

impl ElementStyle {
    /// Overlays every `Some` field of `patch` onto `self`. Nested values
    /// (padding, margin, animation) are replaced as a whole.
    pub fn merge(&mut self, patch: ElementStyle) {
        if patch.font_size.is_some() {
            self.font_size = patch.font_size;
        }
        if patch.font_weight.is_some() {
            self.font_weight = patch.font_weight;
        }
        if patch.text_color.is_some() {
            self.text_color = patch.text_color;
        }
        if patch.background_color.is_some() {
            self.background_color = patch.background_color;
        }
        if patch.width.is_some() {
            self.width = patch.width;
        }
        if patch.height.is_some() {
            self.height = patch.height;
        }
        if patch.padding.is_some() {
            self.padding = patch.padding;
        }
        if patch.margin.is_some() {
            self.margin = patch.margin;
        }
        if patch.border_radius.is_some() {
            self.border_radius = patch.border_radius;
        }
        if patch.animation.is_some() {
            self.animation = patch.animation;
        }
    }

    /// Ordered CSS declarations for this style. Zero and absent edges are
    /// skipped; a bare numeric font size is given a `px` unit.
    pub fn css_declarations(&self) -> Vec<(String, String)> {
        let mut decls: Vec<(String, String)> = Vec::new();

        let scalars = [
            ("font-size", self.font_size.as_deref().map(with_px_unit)),
            ("font-weight", self.font_weight.clone()),
            ("color", self.text_color.clone()),
            ("background-color", self.background_color.clone()),
            ("width", self.width.clone()),
            ("height", self.height.clone()),
            ("border-radius", self.border_radius.clone()),
        ];
        for (prop, value) in scalars {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                decls.push((prop.to_string(), v));
            }
        }

        for (prefix, spacing) in [("padding", self.padding), ("margin", self.margin)] {
            let Some(spacing) = spacing else { continue };
            for (edge, px) in spacing.edges() {
                if let Some(px) = px.filter(|px| *px != 0) {
                    decls.push((format!("{prefix}-{edge}"), format!("{px}px")));
                }
            }
        }

        decls
    }

    /// Inline `style` attribute value: `prop: value; prop: value`.
    pub fn to_inline_css(&self) -> String {
        self.css_declarations()
            .into_iter()
            .map(|(prop, value)| format!("{prop}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn with_px_unit(size: &str) -> String {
    let trimmed = size.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit() || c == '.') {
        format!("{trimmed}px")
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// Type-specific props
// ---------------------------------------------------------------------------

/// Which side of a product section the image sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSectionProps {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub image_position: ImagePosition,
}

/// One `label: value` row of a specs table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecItem {
    pub label: String,
    pub value: String,
}

impl SpecItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A titled group of spec rows, e.g. "Conectividade".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecCategory {
    pub category: String,
    pub items: Vec<SpecItem>,
}

impl SpecCategory {
    pub fn new(category: impl Into<String>, items: Vec<SpecItem>) -> Self {
        Self {
            category: category.into(),
            items,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecsSectionProps {
    pub title: String,
    pub specs: Vec<SpecCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CtaButtonProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub open_in_new_tab: bool,
}

/// Structured payload of an element, keyed by its [`ElementType`].
///
/// Serialized without a tag: the sibling `type` field of the element decides
/// which variant a JSON object decodes into. Unrecognized types keep their
/// props as an opaque map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ElementProps {
    ProductSection(ProductSectionProps),
    SpecsSection(SpecsSectionProps),
    CtaButton(CtaButtonProps),
    Other(Map<String, Value>),
}

impl ElementProps {
    /// Decodes a raw props value for the given element type.
    pub fn from_value(kind: &ElementType, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            ElementType::ProductSection => Self::ProductSection(serde_json::from_value(value)?),
            ElementType::SpecsSection => Self::SpecsSection(serde_json::from_value(value)?),
            ElementType::CtaButton => Self::CtaButton(serde_json::from_value(value)?),
            ElementType::Other(_) => Self::Other(serde_json::from_value(value)?),
        })
    }

    /// Whether these props are the shape `kind` renders and persists.
    pub fn fits(&self, kind: &ElementType) -> bool {
        matches!(
            (self, kind),
            (Self::ProductSection(_), ElementType::ProductSection)
                | (Self::SpecsSection(_), ElementType::SpecsSection)
                | (Self::CtaButton(_), ElementType::CtaButton)
                | (Self::Other(_), ElementType::Other(_))
        )
    }
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// One placeable content block.
///
/// `parent_id` and `children` are carried through persistence untouched; the
/// document is a flat ordered list and nothing enforces a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawElement")]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ElementStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<ElementProps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Wire shape used to decode props against the element's type.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    id: String,
    #[serde(rename = "type")]
    element_type: ElementType,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    style: Option<ElementStyle>,
    #[serde(default)]
    props: Option<Value>,
    #[serde(default)]
    children: Option<Vec<String>>,
    #[serde(default)]
    parent_id: Option<String>,
}

impl TryFrom<RawElement> for Element {
    type Error = serde_json::Error;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        let props = match raw.props {
            None | Some(Value::Null) => None,
            Some(value) => Some(ElementProps::from_value(&raw.element_type, value)?),
        };
        Ok(Self {
            id: raw.id,
            element_type: raw.element_type,
            content: raw.content,
            style: raw.style,
            props,
            children: raw.children,
            parent_id: raw.parent_id,
        })
    }
}

impl Element {
    /// Creates a bare element with no content, style or props.
    pub fn new(id: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
            content: None,
            style: None,
            props: None,
            children: None,
            parent_id: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_props(mut self, props: ElementProps) -> Self {
        self.props = Some(props);
        self
    }

    pub fn product_props(&self) -> Option<&ProductSectionProps> {
        match &self.props {
            Some(ElementProps::ProductSection(p)) => Some(p),
            _ => None,
        }
    }

    pub fn specs_props(&self) -> Option<&SpecsSectionProps> {
        match &self.props {
            Some(ElementProps::SpecsSection(p)) => Some(p),
            _ => None,
        }
    }

    pub fn cta_props(&self) -> Option<&CtaButtonProps> {
        match &self.props {
            Some(ElementProps::CtaButton(p)) => Some(p),
            _ => None,
        }
    }

    /// Inline CSS for this element, empty when it has no style.
    pub fn inline_css(&self) -> String {
        self.style
            .as_ref()
            .map(ElementStyle::to_inline_css)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

/// A partial update to an element's top-level fields.
///
/// For every field, `None` leaves it unchanged and `Some(None)` clears it.
/// `Some(Some(style))` is merged one level deep into the existing style
/// (see [`ElementStyle::merge`]); every other field is replaced wholesale.
///
/// Props of another element type's shape (say CTA props on a product
/// section) are not applied; the element keeps its current props.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementUpdate {
    pub content: Option<Option<String>>,
    pub style: Option<Option<ElementStyle>>,
    pub props: Option<Option<ElementProps>>,
    pub children: Option<Option<Vec<String>>>,
    pub parent_id: Option<Option<String>>,
}

impl ElementUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(Some(content.into()));
        self
    }

    pub fn clear_content(mut self) -> Self {
        self.content = Some(None);
        self
    }

    pub fn style(mut self, patch: ElementStyle) -> Self {
        self.style = Some(Some(patch));
        self
    }

    pub fn clear_style(mut self) -> Self {
        self.style = Some(None);
        self
    }

    pub fn props(mut self, props: ElementProps) -> Self {
        self.props = Some(Some(props));
        self
    }

    pub fn clear_props(mut self) -> Self {
        self.props = Some(None);
        self
    }

    pub fn children(mut self, children: Vec<String>) -> Self {
        self.children = Some(Some(children));
        self
    }

    pub fn parent_id(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the update to `element` in place.
    pub fn apply_to(self, element: &mut Element) {
        if let Some(content) = self.content {
            element.content = content;
        }
        match self.style {
            Some(Some(patch)) => match element.style.as_mut() {
                Some(existing) => existing.merge(patch),
                None => element.style = Some(patch),
            },
            Some(None) => element.style = None,
            None => {}
        }
        match self.props {
            Some(Some(props)) if !props.fits(&element.element_type) => {
                warn!(
                    "Ignoring props that do not fit {} element {}",
                    element.element_type, element.id
                );
            }
            Some(props) => element.props = props,
            None => {}
        }
        if let Some(children) = self.children {
            element.children = children;
        }
        if let Some(parent_id) = self.parent_id {
            element.parent_id = parent_id;
        }
    }
}

// ---------------------------------------------------------------------------
// Id generation
// ---------------------------------------------------------------------------

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Generates an element id of the form `element_<unix-millis>_<9 base36 chars>`.
pub fn generate_element_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("element_{millis}_{suffix}")
}

// ===========================================================================
// Tests
// ===========================================================================
