use crate::error::Result;
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const URLSET_ROOT: &str = "urlset";
pub const SITEMAP_INDEX_ROOT: &str = "sitemapindex";

const INDENT_SIZE: usize = 2;

/// A child of the document root, e.g. `<url>` or `<sitemap>`, holding flat text fields
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

/// In-memory sitemap document. Children are kept in insertion order and
/// serialized in one go on `render`.
#[derive(Debug, Clone)]
pub struct SitemapDocument {
    root: &'static str,
    ordinal: usize,
    children: Vec<Element>,
}

impl SitemapDocument {
    pub fn new(root: &'static str, ordinal: usize) -> Self {
        Self {
            root,
            ordinal,
            children: Vec::new(),
        }
    }

    pub fn url_set(ordinal: usize) -> Self {
        Self::new(URLSET_ROOT, ordinal)
    }

    pub fn index(ordinal: usize) -> Self {
        Self::new(SITEMAP_INDEX_ROOT, ordinal)
    }

    pub fn root(&self) -> &str {
        self.root
    }

    /// Position of this document within the current batch, used for its filename
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn push_element(&mut self, name: &'static str, fields: Vec<(&'static str, String)>) {
        self.children.push(Element { name, fields });
    }

    /// Serialize to pretty-printed UTF-8 XML with a declaration and a trailing newline.
    ///
    /// Text content escapes `&`, `<` and `>` only.
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new(self.root);
        root.push_attribute(("xmlns", SITEMAP_NAMESPACE));
        writer.write_event(Event::Start(root))?;

        for element in &self.children {
            writer.write_event(Event::Start(BytesStart::new(element.name)))?;
            for (field, value) in &element.fields {
                writer.write_event(Event::Start(BytesStart::new(*field)))?;
                writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(
                    value.as_str(),
                ))))?;
                writer.write_event(Event::End(BytesEnd::new(*field)))?;
            }
            writer.write_event(Event::End(BytesEnd::new(element.name)))?;
        }

        writer.write_event(Event::End(BytesEnd::new(self.root)))?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }
}
