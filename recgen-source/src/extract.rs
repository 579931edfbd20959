//! Record discovery.
//!
//! Walks one parsed file and recovers the shape of every struct with named
//! fields. The walk is shallow: once a struct is captured its body is not
//! visited, and function bodies, impl blocks and trait bodies are skipped
//! because records declared there cannot be named from generated code.
//! Inline `mod` blocks are descended and recorded in [`RecordShape::module_path`].

use indexmap::IndexMap;
use serde::Serialize;
use syn::{
    Attribute, Block, Expr, ExprLit, Fields, ItemImpl, ItemMod, ItemStruct, ItemTrait, Lit, Meta,
    visit::{self, Visit},
};

use crate::{
    render::{RecordGenerics, RenderError, generics_to_strings, type_to_string},
    tag::{TagError, Tags},
};

/// Default name of the field attribute carrying tag text.
pub const DEFAULT_TAG_ATTRIBUTE: &str = "tag";

/// One field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    /// Field identifier as written (raw identifiers keep their `r#`).
    pub name: String,
    /// Field type rendered as canonical source text.
    #[serde(rename = "type")]
    pub ty: String,
    /// Parsed tags; `None` when the field has no tag or the tag is malformed.
    pub tags: Option<Tags>,
}

impl FieldInfo {
    /// Field name without a raw identifier prefix (`r#type` -> `type`).
    pub fn bare_name(&self) -> &str {
        self.name.strip_prefix("r#").unwrap_or(&self.name)
    }

    /// Look up a tag by key.
    pub fn tag(&self, key: &str) -> Option<&crate::Tag> {
        self.tags.as_ref().and_then(|tags| tags.get(key))
    }
}

/// The recovered shape of one record declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordShape {
    /// Inline modules enclosing the record, outermost first.
    pub module_path: Vec<String>,
    pub generics: RecordGenerics,
    /// Fields in declaration order.
    pub fields: Vec<FieldInfo>,
}

impl RecordShape {
    /// The record's path relative to the file (e.g., `inner::Point`).
    pub fn qualified_name(&self, name: &str) -> String {
        let mut path = self.module_path.join("::");
        if !path.is_empty() {
            path.push_str("::");
        }
        path.push_str(name);
        path
    }
}

/// A record abandoned because one of its field types could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub name: String,
    pub field: String,
    pub error: RenderError,
}

/// Everything extracted from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Records by name, in the order they were first seen.
    pub records: IndexMap<String, RecordShape>,
    pub skipped: Vec<SkippedRecord>,
}

/// Extracts records from parsed files.
#[derive(Debug, Clone)]
pub struct Extractor {
    tag_attribute: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_TAG_ATTRIBUTE)
    }
}

impl Extractor {
    /// Create an extractor reading tags from `#[<tag_attribute> = "..."]`.
    pub fn new(tag_attribute: impl Into<String>) -> Self {
        Self {
            tag_attribute: tag_attribute.into(),
        }
    }

    /// Extract every record declared in `file`.
    pub fn extract(&self, file: &syn::File) -> Extraction {
        let mut visitor = RecordVisitor {
            tag_attribute: &self.tag_attribute,
            module_path: Vec::new(),
            extraction: Extraction::default(),
        };
        visitor.visit_file(file);
        visitor.extraction
    }
}

struct RecordVisitor<'a> {
    tag_attribute: &'a str,
    module_path: Vec<String>,
    extraction: Extraction,
}

impl RecordVisitor<'_> {
    fn capture(&mut self, item: &ItemStruct) {
        let name = item.ident.to_string();
        let named = match &item.fields {
            Fields::Named(named) => Some(named),
            Fields::Unit => None,
            Fields::Unnamed(_) => {
                tracing::debug!(record = %name, "skipping tuple struct");
                return;
            }
        };

        let generics = match generics_to_strings(&item.generics) {
            Ok(generics) => generics,
            Err(error) => return self.skip(name, String::new(), error),
        };

        let mut fields = Vec::new();
        for field in named.into_iter().flat_map(|n| n.named.iter()) {
            let Some(ident) = &field.ident else {
                continue;
            };
            let field_name = ident.to_string();
            let ty = match type_to_string(&field.ty) {
                Ok(ty) => ty,
                Err(error) => return self.skip(name, field_name, error),
            };
            let tags = match field_tags(&field.attrs, self.tag_attribute) {
                Ok(tags) => tags,
                Err(error) => {
                    tracing::debug!(record = %name, field = %field_name, %error, "ignoring malformed tag");
                    None
                }
            };
            fields.push(FieldInfo {
                name: field_name,
                ty,
                tags,
            });
        }

        self.extraction.records.insert(
            name,
            RecordShape {
                module_path: self.module_path.clone(),
                generics,
                fields,
            },
        );
    }

    fn skip(&mut self, name: String, field: String, error: RenderError) {
        tracing::warn!(record = %name, field = %field, %error, "skipping record");
        self.extraction.skipped.push(SkippedRecord { name, field, error });
    }
}

impl<'ast> Visit<'ast> for RecordVisitor<'_> {
    fn visit_item_struct(&mut self, item: &'ast ItemStruct) {
        self.capture(item);
    }

    fn visit_item_mod(&mut self, item: &'ast ItemMod) {
        self.module_path.push(item.ident.to_string());
        visit::visit_item_mod(self, item);
        self.module_path.pop();
    }

    fn visit_block(&mut self, _: &'ast Block) {}

    fn visit_item_impl(&mut self, _: &'ast ItemImpl) {}

    fn visit_item_trait(&mut self, _: &'ast ItemTrait) {}
}

/// Collect the tag text of every tag attribute on a field and parse it.
///
/// Several tag attributes are joined with a space, so
/// `#[tag = "a:\"x\""] #[tag = "b:\"y\""]` equals `#[tag = "a:\"x\" b:\"y\""]`.
fn field_tags(attrs: &[Attribute], tag_attribute: &str) -> Result<Option<Tags>, TagError> {
    let mut text: Option<String> = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident(tag_attribute)) {
        let value = tag_text(attr)?;
        let joined = text.get_or_insert_with(String::new);
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(value.trim());
    }

    text.map(|text| Tags::parse(&text)).transpose()
}

fn tag_text(attr: &Attribute) -> Result<String, TagError> {
    match &attr.meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Ok(s.value()),
            _ => Err(TagError::NotAString),
        },
        _ => Err(TagError::NotAString),
    }
}
