//! Guide detail templates.
//!
//! # Responsibilities
//! - Map a guide category to one of four template kinds
//! - Hold the renderer used for each kind ([`TemplateSet`])
//! - Share section builders between the built-in renderers
//!
//! # Design Decisions
//! - The category table is many-to-one; unknown categories use `Travel`
//! - Renderers are trait objects so hosts can replace any of them

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::data::localized::resolve_text;
use crate::data::{Item, Language};

pub mod legal;
pub mod sections;
pub mod tech;
pub mod technical;
pub mod travel;

pub use legal::LegalTemplate;
pub use tech::TechTemplate;
pub use technical::TechnicalTemplate;
pub use travel::TravelTemplate;

/// Layout family for a guide detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// Maintenance and systems: tools, steps, safety.
    Technical,
    /// Regulations and paperwork: disclaimers, numbered sections.
    Legal,
    /// Gadgets and connectivity: specs and setup notes.
    Tech,
    /// Lifestyle and destinations.
    Travel,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Technical,
        TemplateKind::Legal,
        TemplateKind::Tech,
        TemplateKind::Travel,
    ];

    /// Template for a guide `category` value.
    pub fn for_category(category: &str) -> Self {
        match category {
            "maintenance" | "gas_systems" | "equipment" | "vehicle-maintenance" | "heating"
            | "water-systems" | "electrical-systems" | "power-systems" | "fuel-management"
            | "winter-travel" | "climate-control" | "technical" => TemplateKind::Technical,

            "legal" | "registration" | "insurance" | "visa-regulations" | "visa-and-border"
            | "customs" | "documentation" | "vehicle-registration" | "infrastructure" => {
                TemplateKind::Legal
            }

            "technology" | "navigation" | "connectivity" | "electronics" | "solar-power"
            | "internet-connectivity" | "navigation-software" | "communication" | "setup" => {
                TemplateKind::Tech
            }

            _ => TemplateKind::Travel,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TemplateKind::Technical => "technical",
            TemplateKind::Legal => "legal",
            TemplateKind::Tech => "tech",
            TemplateKind::Travel => "travel",
        })
    }
}

/// Language and formatting helpers handed to a renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext {
    pub language: Language,
}

impl RenderContext {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn is_rtl(&self) -> bool {
        self.language.is_rtl()
    }

    /// Value for the `dir` attribute.
    pub fn dir(&self) -> &'static str {
        if self.is_rtl() {
            "rtl"
        } else {
            "ltr"
        }
    }

    /// Resolve localized text in this context's language.
    pub fn text(&self, value: Option<&Value>) -> String {
        resolve_text(value, self.language)
    }

    pub fn difficulty_class(&self, difficulty: &str) -> &'static str {
        match difficulty.to_lowercase().as_str() {
            "intermediate" => "badge-intermediate",
            "advanced" => "badge-advanced",
            _ => "badge-beginner",
        }
    }

    pub fn difficulty_label(&self, difficulty: &str) -> String {
        match difficulty.to_lowercase().as_str() {
            "beginner" => "🟢 Beginner".to_string(),
            "intermediate" => "🟡 Intermediate".to_string(),
            "advanced" => "🔴 Advanced".to_string(),
            _ => difficulty.to_string(),
        }
    }

    pub fn tip_icon(&self, kind: Option<&str>) -> &'static str {
        match kind {
            Some("warning") => "⚠️",
            Some("tip") => "💡",
            Some("danger") => "🚫",
            Some("safety") => "🛡️",
            Some("compatibility") => "🔄",
            _ => "ℹ️",
        }
    }
}

/// Produces the full detail markup for one guide.
pub trait GuideRenderer: Send + Sync {
    fn render(&self, guide: &Item, cx: &RenderContext) -> String;
}

/// One renderer per [`TemplateKind`].
#[derive(Clone)]
pub struct TemplateSet {
    renderers: [Arc<dyn GuideRenderer>; 4],
}

impl TemplateSet {
    /// Replace the renderer for `kind`.
    pub fn with(mut self, kind: TemplateKind, renderer: impl GuideRenderer + 'static) -> Self {
        self.renderers[kind.index()] = Arc::new(renderer);
        self
    }

    pub fn get(&self, kind: TemplateKind) -> &dyn GuideRenderer {
        self.renderers[kind.index()].as_ref()
    }

    /// Render `guide` with the template its category maps to.
    pub fn render(&self, guide: &Item, cx: &RenderContext) -> String {
        let kind = TemplateKind::for_category(guide.str_field("category").unwrap_or_default());
        tracing::trace!(guide = %guide.id, template = %kind, "Rendering guide");
        self.get(kind).render(guide, cx)
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            renderers: [
                Arc::new(TechnicalTemplate),
                Arc::new(LegalTemplate),
                Arc::new(TechTemplate),
                Arc::new(TravelTemplate),
            ],
        }
    }
}

impl fmt::Debug for TemplateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSet").finish_non_exhaustive()
    }
}
