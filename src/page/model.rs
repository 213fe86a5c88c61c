use std::collections::BTreeMap;

use crate::{
    foundation::core::{Rect, Viewport},
    foundation::error::{StageError, StageResult},
};

/// Stable identifier of a page node. Segmented text units use path-style ids
/// (`hero-title::l0w1c2`) so the original text stays recoverable.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed vocabulary of structural markers the engine consumes. Absence of a
/// marker disables the corresponding feature; it never fails globally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    PreloaderOverlay,
    SiteLogo,
    HeroRegion,
    PinnedSection,
    SplitText,
    CardGrid,
    Card,
    Counter,
    StoryStep,
    Magnetic,
    OverlayAnchor,
    AnchorReference,
    AnchorContainer,
}

/// Animatable properties published by timelines. One writer per (node, prop).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Prop {
    TranslateX,
    TranslateY,
    XPercent,
    YPercent,
    Scale,
    RotateX,
    RotateY,
    ZDepth,
    Opacity,
    Blur,
}

/// Display format declared on a counter node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CounterFormat {
    Integer,
    /// pt-BR currency: `R$ 7.350,00` (thousands `.`, decimals `,`).
    CurrencyBrl,
}

impl CounterFormat {
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Integer => format!("{}", value.floor().max(0.0) as i64),
            Self::CurrencyBrl => {
                let cents = (value * 100.0).round().max(0.0) as i64;
                let int = cents / 100;
                let frac = cents % 100;
                let digits = int.to_string();
                let len = digits.len();
                let mut grouped = String::new();
                for (i, ch) in digits.chars().enumerate() {
                    if i > 0 && (len - i) % 3 == 0 {
                        grouped.push('.');
                    }
                    grouped.push(ch);
                }
                format!("R$ {grouped},{frac:02}")
            }
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Document-space geometry, owned by layout (the caller).
    pub rect: Rect,
    /// Raw text content. Manual line breaks arrive as `<br>`-style markers;
    /// plain newlines are layout-induced wraps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Authored end value for `Role::Counter` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_end: Option<f64>,
    /// Display format for `Role::Counter` nodes. Defaults to integer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_format: Option<CounterFormat>,
    /// Set once by the segmenter; guards against double-processing.
    #[serde(default)]
    pub segmented: bool,
    /// Published animated properties (written by the owning timeline).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<Prop, f64>,
    /// Displayed text for counters (written by the owning count-up).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            role: None,
            rect: Rect::ZERO,
            text: None,
            counter_end: None,
            counter_format: None,
            segmented: false,
            props: BTreeMap::new(),
            display: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_counter_end(mut self, end: f64) -> Self {
        self.counter_end = Some(end);
        self
    }

    pub fn with_counter_format(mut self, format: CounterFormat) -> Self {
        self.counter_format = Some(format);
        self
    }
}

/// The abstract document the engine reads (geometry, roles, text) and writes
/// (published props, style variables, counter display).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Page {
    pub viewport: Viewport,
    /// Total scrollable document height, including pinned reserved distance.
    pub content_height: f64,
    nodes: BTreeMap<NodeId, Node>,
    /// Style variables published by the anchor recalculator.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    vars: BTreeMap<String, f64>,
}

impl Page {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            content_height: viewport.height,
            nodes: BTreeMap::new(),
            vars: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_with_role(&self, role: Role) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.role == Some(role))
    }

    pub fn first_with_role(&self, role: Role) -> Option<&NodeId> {
        self.nodes_with_role(role).map(|n| &n.id).next()
    }

    /// Publish an animated property. Missing target is a silent no-op.
    pub fn set_prop(&mut self, id: &NodeId, prop: Prop, value: f64) {
        if !value.is_finite() {
            tracing::warn!(node = %id, ?prop, value, "dropping non-finite property write");
            return;
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.props.insert(prop, value);
        }
    }

    pub fn prop(&self, id: &NodeId, prop: Prop) -> Option<f64> {
        self.nodes.get(id).and_then(|n| n.props.get(&prop)).copied()
    }

    pub fn set_display(&mut self, id: &NodeId, text: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.display = Some(text.into());
        }
    }

    pub fn display(&self, id: &NodeId) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.display.as_deref())
    }

    pub fn set_var(&mut self, name: &str, value: f64) {
        if !value.is_finite() {
            tracing::warn!(name, value, "dropping non-finite style variable");
            return;
        }
        self.vars.insert(name.to_owned(), value);
    }

    pub fn var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    pub fn vars(&self) -> &BTreeMap<String, f64> {
        &self.vars
    }

    pub fn validate(&self) -> StageResult<()> {
        if self.content_height < self.viewport.height {
            return Err(StageError::validation(
                "content_height must be at least one viewport tall",
            ));
        }
        for node in self.nodes.values() {
            if node.role == Some(Role::Counter) && node.counter_end.is_none() {
                return Err(StageError::validation(format!(
                    "counter node '{}' is missing its declared end value",
                    node.id
                )));
            }
            let r = node.rect;
            if !(r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()) {
                return Err(StageError::validation(format!(
                    "node '{}' has non-finite geometry",
                    node.id
                )));
            }
        }
        Ok(())
    }
}
