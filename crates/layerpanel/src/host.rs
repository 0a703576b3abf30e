//! Host document seam: the map the panel attaches to, its children and its header assets.

use std::fmt::Write as _;

use serde::Serialize;
use tracing::trace;

use crate::{Element, Handle};

/// Kind of static asset the panel may need in the document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// CSS stylesheet (`<link rel="stylesheet">`).
    Stylesheet,
    /// JavaScript file (`<script src>`).
    Script,
}

/// A header asset request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Asset {
    /// Stylesheet or script.
    pub kind: AssetKind,
    /// URL or relative path of the asset.
    pub locator: String,
}

impl Asset {
    /// A stylesheet asset.
    pub fn stylesheet(locator: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Stylesheet,
            locator: locator.into(),
        }
    }

    /// A script asset.
    pub fn script(locator: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Script,
            locator: locator.into(),
        }
    }

    /// HTML tag that loads this asset.
    pub fn tag(&self) -> String {
        match self.kind {
            AssetKind::Stylesheet => format!(r#"<link rel="stylesheet" href="{}"/>"#, self.locator),
            AssetKind::Script => format!(r#"<script src="{}"></script>"#, self.locator),
        }
    }
}

/// What the compiler needs from the document that owns the map.
///
/// Callers must not mutate the children while a render is in progress; the
/// borrow rules on [`PanelCompiler::render`](crate::PanelCompiler::render)
/// enforce this for in-process hosts.
pub trait HostDocument {
    /// Handle of the map the panel attaches to, if there is one.
    fn attachment(&self) -> Option<&Handle>;

    /// Children of the attachment point in registration order.
    fn children(&self) -> Vec<&dyn Element>;

    /// Add `asset` to the document header. Repeated requests for the same
    /// locator must not duplicate the asset.
    fn request_asset(&mut self, asset: Asset);
}

/// In-memory host document: one map, its children and the header assets.
#[derive(Debug, Default)]
pub struct Document {
    /// The map children are registered on.
    map: Option<Handle>,
    /// Registered children, in order.
    children: Vec<Box<dyn Element>>,
    /// Header assets, deduplicated by locator.
    header: Vec<Asset>,
}

impl Document {
    /// Create a document holding a map with handle `map`.
    pub fn new(map: Handle) -> Self {
        Self {
            map: Some(map),
            ..Self::default()
        }
    }

    /// A document with no map; rendering a panel into it fails.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Register a child on the map.
    pub fn add_child(&mut self, child: impl Element + 'static) -> &mut Self {
        self.children.push(Box::new(child));
        self
    }

    /// Header assets in request order.
    pub fn header(&self) -> &[Asset] {
        &self.header
    }

    /// Render the header assets as HTML tags, one per line.
    pub fn header_html(&self) -> String {
        let mut out = String::new();
        for asset in &self.header {
            let _ignored = writeln!(out, "{}", asset.tag());
        }
        out
    }
}

impl HostDocument for Document {
    fn attachment(&self) -> Option<&Handle> {
        self.map.as_ref()
    }

    fn children(&self) -> Vec<&dyn Element> {
        self.children.iter().map(|c| c.as_ref()).collect()
    }

    fn request_asset(&mut self, asset: Asset) {
        if self.header.iter().any(|a| a.locator == asset.locator) {
            trace!(locator = %asset.locator, "asset_already_present");
            return;
        }
        self.header.push(asset);
    }
}
