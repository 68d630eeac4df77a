//! Article/Section Catalog.
//!
//! Articles are the display units of the catalog; sections group them for
//! browsing. [`Catalog::create_article`] is the single, idempotent entry
//! point for articles: a repeated request for the same identifier never
//! builds a second article, it can only list the existing one under one
//! more section.

use std::collections::HashMap;

use serde::Deserialize;

use crate::lang::Localization;
use crate::record::string_like;

/// The four TYPE catalogue sections, created before any entity.
pub const ITEMS: &str = "ITEMS";
pub const RESEARCH: &str = "RESEARCH";
pub const MANUFACTURE: &str = "MANUFACTURE";
pub const CONDITIONS: &str = "CONDITIONS";

/// Creation order of the TYPE sections.
pub const TYPE_SECTIONS: [&str; 4] = [CONDITIONS, RESEARCH, ITEMS, MANUFACTURE];

/// Suffix of the language key holding an article's default body text.
pub const TEXT_SUFFIX: &str = "_UFOPEDIA";

/// Type id given to articles that do not declare one.
pub const DEFAULT_TYPE_ID: &str = "-1";

// ===========================================================================
// Articles
// ===========================================================================

/// A request to create an article. Also the shape of a `ufopaedia` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleSpec {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "string_like")]
    pub image_id: Option<String>,
    #[serde(default, deserialize_with = "string_like")]
    pub type_id: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
}

impl ArticleSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn section(mut self, section: &str) -> Self {
        self.section = Some(section.to_string());
        self
    }

    pub fn type_id(mut self, type_id: &str) -> Self {
        self.type_id = Some(type_id.to_string());
        self
    }
}

/// A display unit wrapping an entity or a standalone topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: String,
    pub title: String,
    /// Body text, already formatted for display. `None` if no language key
    /// resolves.
    pub text: Option<String>,
    pub image_id: Option<String>,
    pub type_id: String,
    /// The owning section, if any.
    pub section: Option<String>,
    /// Research entries that list this article as further reading.
    pub lookup: Vec<String>,
}

// ===========================================================================
// Sections
// ===========================================================================

/// Category of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// An ordinary browsing section.
    Pedia,
    /// One of the per-entity-kind catalogue sections.
    Type,
}

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Pedia => "PEDIA",
            SectionKind::Type => "TYPE",
        }
    }
}

/// A named, ordered grouping of articles.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub kind: SectionKind,
    articles: Vec<String>,
}

impl Section {
    /// Member article ids, in display order.
    pub fn articles(&self) -> &[String] {
        &self.articles
    }

    pub fn is_type(&self) -> bool {
        self.kind == SectionKind::Type
    }
}

// ===========================================================================
// Catalog
// ===========================================================================

/// All articles and sections of one load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    articles: HashMap<String, Article>,
    articles_order: Vec<String>,
    sections: HashMap<String, Section>,
    sections_order: Vec<String>,
    type_sections_order: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a section unless it exists. Every section owns a header
    /// article with the section's own identifier.
    pub fn create_section(&mut self, id: &str, kind: SectionKind, lang: &Localization) {
        if self.sections.contains_key(id) {
            return;
        }
        self.sections.insert(
            id.to_string(),
            Section {
                id: id.to_string(),
                title: lang.str(id).to_string(),
                kind,
                articles: Vec::new(),
            },
        );
        match kind {
            SectionKind::Type => self.type_sections_order.push(id.to_string()),
            SectionKind::Pedia => self.sections_order.push(id.to_string()),
        }
        self.create_article(ArticleSpec::new(id).section(id).type_id(kind.label()), lang);
    }

    /// Create an article, or list an existing one under one more section.
    /// Returns `true` if a new article was built.
    pub fn create_article(&mut self, spec: ArticleSpec, lang: &Localization) -> bool {
        if let Some(existing) = self.articles.get(&spec.id) {
            if let Some(section) = spec.section.as_deref()
                && existing.section.as_deref() != Some(section)
            {
                self.create_section(section, SectionKind::Pedia, lang);
                self.add_to_listing(section, &spec.id);
            }
            return false;
        }

        let text = spec
            .text
            .as_deref()
            .and_then(|key| lang.get(key))
            .or_else(|| lang.get(&format!("{}{TEXT_SUFFIX}", spec.id)))
            .map(str::to_string);

        let article = Article {
            title: lang.str(spec.title.as_deref().unwrap_or(&spec.id)).to_string(),
            text,
            image_id: spec.image_id,
            type_id: spec
                .type_id
                .unwrap_or_else(|| DEFAULT_TYPE_ID.to_string()),
            section: None,
            lookup: Vec::new(),
            id: spec.id,
        };
        let id = article.id.clone();
        self.articles.insert(id.clone(), article);

        if let Some(section) = spec.section {
            self.assign_section(&id, &section, lang);
        }
        true
    }

    /// Record a pedia article in the global article order.
    pub(crate) fn push_order(&mut self, id: &str) {
        if !self.articles_order.iter().any(|a| a == id) {
            self.articles_order.push(id.to_string());
        }
    }

    /// Make `section` the owning section of a freshly built article.
    fn assign_section(&mut self, article_id: &str, section_id: &str, lang: &Localization) {
        self.create_section(section_id, SectionKind::Pedia, lang);
        if article_id != section_id {
            self.add_to_listing(section_id, article_id);
        }
        if let Some(article) = self.articles.get_mut(article_id) {
            article.section = Some(section_id.to_string());
        }
    }

    /// List an article under a section. The first section an article is
    /// listed under becomes its owner if it has none yet.
    fn add_to_listing(&mut self, section_id: &str, article_id: &str) {
        let Some(section) = self.sections.get_mut(section_id) else {
            return;
        };
        if !section.articles.iter().any(|a| a == article_id) {
            section.articles.push(article_id.to_string());
        }
        if let Some(article) = self.articles.get_mut(article_id)
            && article.section.is_none()
        {
            article.section = Some(section_id.to_string());
        }
    }

    /// Add a further-reading back-reference. Returns `false` if the article
    /// does not exist.
    pub(crate) fn add_lookup(&mut self, article_id: &str, research: &str) -> bool {
        match self.articles.get_mut(article_id) {
            Some(article) => {
                crate::registry::push_unique(&mut article.lookup, research);
                true
            }
            None => false,
        }
    }

    /// Sort every TYPE section's members by title, ordinal comparison. The
    /// sort is stable, so equal titles keep their insertion order.
    pub(crate) fn sort_type_sections(&mut self) {
        let articles = &self.articles;
        for id in &self.type_sections_order {
            if let Some(section) = self.sections.get_mut(id) {
                section.articles.sort_by(|a, b| {
                    let title = |id: &String| articles.get(id).map(|a| a.title.as_str());
                    title(a).cmp(&title(b))
                });
            }
        }
    }

    // -- Query API --

    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.get(id)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.get(id)
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    /// Pedia articles in document order.
    pub fn articles_order(&self) -> &[String] {
        &self.articles_order
    }

    /// Ordinary sections in creation order.
    pub fn sections_order(&self) -> &[String] {
        &self.sections_order
    }

    /// TYPE sections in creation order.
    pub fn type_sections_order(&self) -> &[String] {
        &self.type_sections_order
    }

    /// The article `delta` positions away from `current` within its owning
    /// section's list, or within the global article order if it has no
    /// section. An article missing from its owner's list (a section's own
    /// header article) sits just before the first member.
    pub fn find_next_article(&self, current: &str, delta: isize) -> Option<&Article> {
        let article = self.articles.get(current)?;
        let list = match article
            .section
            .as_deref()
            .and_then(|s| self.sections.get(s))
        {
            Some(section) => section.articles.as_slice(),
            None => self.articles_order.as_slice(),
        };
        let index = list
            .iter()
            .position(|a| a == current)
            .map(|i| i as isize)
            .unwrap_or(-1);
        let next = usize::try_from(index.checked_add(delta)?).ok()?;
        list.get(next).and_then(|id| self.articles.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lang() -> Localization {
        let mut lang = Localization::new();
        lang.merge_table(
            json!({
                "STR_RIFLE": "Rifle",
                "STR_RIFLE_UFOPEDIA": "Standard rifle.",
                "STR_CUSTOM_TEXT": "Custom body",
                "ITEMS": "Items"
            })
            .as_object()
            .unwrap(),
        );
        lang
    }

    #[test]
    fn section_creates_header_article() {
        let lang = lang();
        let mut cat = Catalog::new();
        cat.create_section(ITEMS, SectionKind::Type, &lang);

        let section = cat.section(ITEMS).unwrap();
        assert_eq!(section.title, "Items");
        assert!(section.is_type());
        assert!(section.articles().is_empty());

        let header = cat.article(ITEMS).unwrap();
        assert_eq!(header.section.as_deref(), Some(ITEMS));
        assert_eq!(header.type_id, "TYPE");
        assert_eq!(cat.type_sections_order(), &[ITEMS.to_string()]);
        assert!(cat.sections_order().is_empty());
    }

    #[test]
    fn article_text_resolution_order() {
        let lang = lang();
        let mut cat = Catalog::new();

        let mut spec = ArticleSpec::new("STR_RIFLE");
        spec.text = Some("STR_CUSTOM_TEXT".to_string());
        cat.create_article(spec, &lang);
        assert_eq!(cat.article("STR_RIFLE").unwrap().text.as_deref(), Some("Custom body"));

        let mut cat = Catalog::new();
        let mut spec = ArticleSpec::new("STR_RIFLE");
        spec.text = Some("STR_MISSING".to_string());
        cat.create_article(spec, &lang);
        assert_eq!(
            cat.article("STR_RIFLE").unwrap().text.as_deref(),
            Some("Standard rifle.")
        );

        cat.create_article(ArticleSpec::new("STR_NOTHING"), &lang);
        let nothing = cat.article("STR_NOTHING").unwrap();
        assert_eq!(nothing.text, None);
        assert_eq!(nothing.title, "STR_NOTHING");
        assert_eq!(nothing.type_id, DEFAULT_TYPE_ID);
    }

    #[test]
    fn duplicate_creation_adds_section_only() {
        let lang = lang();
        let mut cat = Catalog::new();
        cat.create_section(ITEMS, SectionKind::Type, &lang);
        cat.create_section(RESEARCH, SectionKind::Type, &lang);

        assert!(cat.create_article(ArticleSpec::new("STR_RIFLE").section(ITEMS), &lang));
        let mut second = ArticleSpec::new("STR_RIFLE").section(RESEARCH);
        second.title = Some("Other title".to_string());
        assert!(!cat.create_article(second, &lang));

        let article = cat.article("STR_RIFLE").unwrap();
        assert_eq!(article.title, "Rifle");
        assert_eq!(article.section.as_deref(), Some(ITEMS));
        assert_eq!(cat.section(ITEMS).unwrap().articles(), &["STR_RIFLE".to_string()]);
        assert_eq!(cat.section(RESEARCH).unwrap().articles(), &["STR_RIFLE".to_string()]);
    }

    #[test]
    fn repeated_same_section_does_not_duplicate_member() {
        let lang = lang();
        let mut cat = Catalog::new();
        cat.create_article(ArticleSpec::new("A").section("S"), &lang);
        cat.create_article(ArticleSpec::new("A").section("S"), &lang);
        assert_eq!(cat.section("S").unwrap().articles().len(), 1);
    }

    #[test]
    fn unknown_section_created_as_pedia() {
        let lang = lang();
        let mut cat = Catalog::new();
        cat.create_article(ArticleSpec::new("A").section("STR_WEAPONS"), &lang);
        let section = cat.section("STR_WEAPONS").unwrap();
        assert_eq!(section.kind, SectionKind::Pedia);
        assert_eq!(cat.sections_order(), &["STR_WEAPONS".to_string()]);
        assert!(cat.article("STR_WEAPONS").is_some());
    }

    #[test]
    fn type_sections_sorted_by_title() {
        let mut lang = lang();
        lang.merge_table(json!({"Z": "alpha", "A": "zulu", "M": "mike"}).as_object().unwrap());
        let mut cat = Catalog::new();
        cat.create_section(ITEMS, SectionKind::Type, &lang);
        cat.create_section("PLAIN", SectionKind::Pedia, &lang);
        for id in ["A", "M", "Z"] {
            cat.create_article(ArticleSpec::new(id).section(ITEMS), &lang);
            cat.create_article(ArticleSpec::new(format!("{id}2")).section("PLAIN"), &lang);
        }
        cat.sort_type_sections();
        assert_eq!(cat.section(ITEMS).unwrap().articles(), &["Z", "M", "A"]);
        assert_eq!(cat.section("PLAIN").unwrap().articles(), &["A2", "M2", "Z2"]);
    }

    #[test]
    fn navigation_within_section() {
        let lang = lang();
        let mut cat = Catalog::new();
        for id in ["A", "B", "C"] {
            cat.create_article(ArticleSpec::new(id).section("S"), &lang);
        }
        assert_eq!(cat.find_next_article("A", 1).map(|a| a.id.as_str()), Some("B"));
        assert_eq!(cat.find_next_article("C", -2).map(|a| a.id.as_str()), Some("A"));
        assert!(cat.find_next_article("C", 1).is_none());
        assert!(cat.find_next_article("A", -1).is_none());
        assert!(cat.find_next_article("MISSING", 1).is_none());
        // Header article steps onto the first member.
        assert_eq!(cat.find_next_article("S", 1).map(|a| a.id.as_str()), Some("A"));
    }

    #[test]
    fn navigation_without_section_uses_global_order() {
        let lang = lang();
        let mut cat = Catalog::new();
        for id in ["A", "B"] {
            cat.create_article(ArticleSpec::new(id), &lang);
            cat.push_order(id);
        }
        assert_eq!(cat.find_next_article("A", 1).map(|a| a.id.as_str()), Some("B"));
        assert!(cat.find_next_article("B", 1).is_none());
    }

    #[test]
    fn lookup_on_missing_article_reports_miss() {
        let lang = lang();
        let mut cat = Catalog::new();
        cat.create_article(ArticleSpec::new("A"), &lang);
        assert!(cat.add_lookup("A", "STR_R"));
        assert!(!cat.add_lookup("B", "STR_R"));
        assert_eq!(cat.article("A").unwrap().lookup, vec!["STR_R"]);
    }

    #[test]
    fn pedia_record_deserializes_numeric_type_id() {
        let spec: ArticleSpec =
            serde_json::from_value(json!({"id": "STR_X", "type_id": 4, "section": "S"})).unwrap();
        assert_eq!(spec.type_id.as_deref(), Some("4"));
        assert_eq!(spec.section.as_deref(), Some("S"));
    }
}
