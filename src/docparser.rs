//! Docstring parsing strategies.
//!
//! Endpoint docstrings carry free text plus optional machine-readable
//! annotations (parameter lists, serializer overrides, response notes).
//! Two interchangeable strategies share the [`DocParser`] contract:
//!
//! - [`SimpleDocParser`]: free text with trailing `name -- description`
//!   parameter lines.
//! - [`RstDocParser`]: an indentation-sensitive mini-markup with `:name:`
//!   section markers and indented item lists.
//!
//! Both degrade gracefully: absent or unparseable input yields an empty
//! [`ParsedDoc`], never an error.

use indexmap::IndexMap;
use serde::Serialize;

/// Where a documented parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Embedded in the URL path (`/users/{id}`)
    Path,
    /// Query string
    Query,
    /// Form-encoded body field
    Form,
    /// Whole request body
    Body,
}

/// A single documented parameter.
///
/// Only keys that carry a value survive serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    /// Parameter name
    pub name: String,
    /// Where the parameter lives
    #[serde(rename = "paramType")]
    pub location: ParamLocation,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared type hint, empty string when the docstring gave none
    #[serde(rename = "dataType", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Whether the parameter must be supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Allowed literal values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Lower bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Default value
    #[serde(rename = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ParamSpec {
    /// A parameter with only a name and a location; everything else unset.
    pub fn new(name: impl Into<String>, location: ParamLocation) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            data_type: None,
            required: None,
            enum_values: None,
            minimum: None,
            maximum: None,
            default: None,
        }
    }
}

/// Structured result of parsing one docstring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDoc {
    /// Free-text body, annotation sections removed
    pub description: Option<String>,
    /// First sentence of the first description line
    pub summary: Option<String>,
    /// Documented query parameters, if a query section was present
    pub query_params: Option<Vec<ParamSpec>>,
    /// Documented form parameters, if a post section was present
    pub post_params: Option<Vec<ParamSpec>>,
    /// Inline response-serializer override
    pub serializer: Option<String>,
    /// Inline request-deserializer override
    pub deserializer: Option<String>,
    /// Status-code notes, in document order
    pub response_notes: Option<IndexMap<String, String>>,
}

/// Trait for docstring parsing strategies.
///
/// Implementations turn raw docstring text into a [`ParsedDoc`]. `None` or
/// empty input must yield the all-empty document.
pub trait DocParser {
    /// Parses a docstring. Never fails; malformed input degrades to
    /// empty/absent fields.
    fn parse(&self, doc: Option<&str>) -> ParsedDoc;
}

/// Substring of `text`'s first line up to the first `.`.
fn first_sentence(text: &str) -> String {
    text.split('\n')
        .next()
        .unwrap_or("")
        .split('.')
        .next()
        .unwrap_or("")
        .to_string()
}

/// Expands tabs to the next multiple-of-8 column, line by line.
fn expand_tabs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut col = 0usize;
    for c in s.chars() {
        match c {
            '\t' => {
                let n = 8 - col % 8;
                out.extend(std::iter::repeat(' ').take(n));
                col += n;
            }
            '\n' => {
                out.push('\n');
                col = 0;
            }
            _ => {
                out.push(c);
                col += 1;
            }
        }
    }
    out
}

/// Uniformly strips the common leading indentation from a docstring.
///
/// The first line is stripped outright; every other line loses the minimum
/// indentation found across all non-blank lines.
pub fn trim_docstring(docstring: &str) -> String {
    if docstring.trim().is_empty() {
        return String::new();
    }
    let expanded = expand_tabs(docstring);
    let lines: Vec<&str> = expanded.split('\n').collect();
    let indent = lines
        .iter()
        .filter(|l| !l.trim_start().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut trimmed = Vec::with_capacity(lines.len());
    trimmed.push(lines[0].trim_start().to_string());
    for line in &lines[1..] {
        trimmed.push(line.get(indent..).unwrap_or("").trim_end().to_string());
    }
    trimmed.join("\n").trim().to_string()
}

/// Loose `name -- description` docstring parser.
///
/// The description is the docstring up to the first line containing `--`;
/// every line anywhere in the text that splits into exactly two parts on
/// ` -- ` becomes one query parameter.
pub struct SimpleDocParser;

impl SimpleDocParser {
    fn strip_params_from_docstring(&self, docstring: &str) -> String {
        let trimmed = trim_docstring(docstring);
        let lines: Vec<&str> = trimmed.split('\n').collect();

        let cut_off = lines.iter().position(|line| line.trim().contains("--"));
        let kept = match cut_off {
            Some(index) => &lines[..index],
            None => &lines[..],
        };

        kept.join("\n").trim().to_string()
    }

    fn extract_query_params(&self, doc: &str) -> Vec<ParamSpec> {
        let mut params = Vec::new();

        for line in doc.split('\n') {
            let parts: Vec<&str> = line.split(" -- ").collect();
            if parts.len() == 2 {
                params.push(ParamSpec {
                    description: Some(parts[1].trim().to_string()),
                    data_type: Some(String::new()),
                    ..ParamSpec::new(parts[0].trim(), ParamLocation::Query)
                });
            }
        }

        params
    }
}

impl DocParser for SimpleDocParser {
    fn parse(&self, doc: Option<&str>) -> ParsedDoc {
        let Some(doc) = doc.filter(|d| !d.is_empty()) else {
            return ParsedDoc::default();
        };

        let description = self.strip_params_from_docstring(doc);
        let summary = first_sentence(&description);
        let query_params = self.extract_query_params(doc);

        ParsedDoc {
            description: Some(description),
            summary: Some(summary),
            query_params: Some(query_params),
            ..ParsedDoc::default()
        }
    }
}

/// Reserved section names of the structured markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Query,
    Post,
    Response,
}

/// One indented list item under a `:query:`/`:post:`/`:response:` section.
#[derive(Debug, Default)]
struct ListItem {
    name: String,
    ty: Option<String>,
    desc: Vec<String>,
    required: Option<bool>,
    enum_values: Option<Vec<String>>,
    minimum: Option<f64>,
    maximum: Option<f64>,
}

/// Structured attributes recognized at the top of a list item.
enum ItemAttr {
    Required,
    Enum(Vec<String>),
    Minimum(f64),
    Maximum(f64),
}

fn parse_item_attribute(line: &str) -> Option<ItemAttr> {
    if line == ":required:" {
        return Some(ItemAttr::Required);
    }
    if let Some(rest) = line.strip_prefix(":enum:") {
        let values = rest
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        return Some(ItemAttr::Enum(values));
    }
    if let Some(rest) = line.strip_prefix(":minimum:") {
        return rest.trim().parse().ok().map(ItemAttr::Minimum);
    }
    if let Some(rest) = line.strip_prefix(":maximum:") {
        return rest.trim().parse().ok().map(ItemAttr::Maximum);
    }
    None
}

/// First `:` in `line` at byte position `from` or later.
fn find_colon_from(line: &str, from: usize) -> Option<usize> {
    line.char_indices()
        .find(|(i, c)| *i >= from && *c == ':')
        .map(|(i, _)| i)
}

/// Accumulated sections of one structured parse.
#[derive(Default)]
struct RstSections {
    serializer: Option<String>,
    deserializer: Option<String>,
    query: Option<Vec<ListItem>>,
    post: Option<Vec<ListItem>>,
    response: Option<Vec<ListItem>>,
    buffer: Vec<ListItem>,
    current: Option<Section>,
}

impl RstSections {
    /// Stores the buffered items into the slot of the section that was
    /// being collected. A re-opened section overwrites its earlier items.
    fn flush(&mut self) {
        let Some(section) = self.current else {
            return;
        };
        let items = std::mem::take(&mut self.buffer);
        match section {
            Section::Query => self.query = Some(items),
            Section::Post => self.post = Some(items),
            Section::Response => self.response = Some(items),
        }
    }

    fn open(&mut self, section: Section) {
        self.flush();
        self.current = Some(section);
    }
}

/// Indentation-sensitive structured docstring parser.
///
/// Recognizes `:serializer:`/`:deserializer:` single-value sections,
/// `:query:`/`:post:`/`:response:` item lists, and ignores the indented
/// scope of any other `:name:` section. Section detection is a best-effort
/// heuristic over stripped lines; a stray colon inside free text can
/// mis-trigger it, so free text containing literal `:word:` prefixes should
/// be indented under a list item rather than left at the top level.
pub struct RstDocParser;

impl DocParser for RstDocParser {
    fn parse(&self, doc: Option<&str>) -> ParsedDoc {
        let Some(doc) = doc.filter(|d| !d.is_empty()) else {
            return ParsedDoc::default();
        };

        let mut description: Vec<String> = Vec::new();
        let mut sections = RstSections::default();

        let mut collect_desc = true;
        let mut ignore_indent = usize::MAX;
        let mut list_indent: Option<usize> = None;
        let mut item_indent: Option<usize> = None;

        let mut last_indent: isize = -1;
        let mut indent_stack: Vec<isize> = Vec::new();

        for raw in doc.split('\n') {
            if raw.trim().is_empty() {
                // Blank lines belong to whatever is being collected so that
                // multi-paragraph text survives with its line breaks.
                if list_indent.is_some() && item_indent.is_some() {
                    if let Some(item) = sections.buffer.last_mut() {
                        item.desc.push(String::new());
                    }
                } else if collect_desc {
                    description.push(String::new());
                }
                continue;
            }

            let current_indent = raw.len() - raw.trim_start().len();
            let ci = current_indent as isize;

            if ci > last_indent {
                indent_stack.push(last_indent);
            }
            while ci < last_indent {
                last_indent = indent_stack.pop().unwrap_or(-1);
            }

            // Dedenting to a list's own level (or above) closes it.
            if list_indent.is_some_and(|i| i >= current_indent) {
                list_indent = None;
            }
            if item_indent.is_some_and(|i| i >= current_indent) {
                item_indent = None;
            }

            last_indent = ci;

            // Inner scope of a foreign section.
            if current_indent > ignore_indent {
                continue;
            }

            let line = raw.trim();

            if list_indent.is_none() && line.len() > 2 && line.starts_with(':') {
                if let Some(end) = find_colon_from(line, 2) {
                    let section_name = line[1..end].trim().to_lowercase();
                    let value = line[end + 1..].trim();

                    match section_name.as_str() {
                        "serializer" => {
                            sections.serializer = Some(value.to_string());
                            continue;
                        }
                        "deserializer" => {
                            sections.deserializer = Some(value.to_string());
                            continue;
                        }
                        "query" => {
                            sections.open(Section::Query);
                            list_indent = Some(current_indent);
                            continue;
                        }
                        "post" => {
                            sections.open(Section::Post);
                            list_indent = Some(current_indent);
                            continue;
                        }
                        "response" => {
                            sections.open(Section::Response);
                            list_indent = Some(current_indent);
                            continue;
                        }
                        _ => {
                            // Unknown section: skip its indented scope and
                            // stop collecting top-level description.
                            ignore_indent = current_indent;
                            collect_desc = false;
                            continue;
                        }
                    }
                }
            }

            if list_indent.is_none() {
                if collect_desc {
                    description.push(line.to_string());
                }
                continue;
            }

            if item_indent.is_none() {
                // First line of a new list item: `name[: type]`.
                item_indent = Some(current_indent);
                let (name, ty) = match find_colon_from(line, 1) {
                    Some(i) => (
                        line[..i].trim().to_string(),
                        Some(line[i + 1..].trim().to_string()),
                    ),
                    None => (line.to_string(), None),
                };
                sections.buffer.push(ListItem {
                    name,
                    ty,
                    ..ListItem::default()
                });
                continue;
            }

            // Continuation lines of the current item. Attribute markers only
            // count before any description text has been collected.
            if let Some(item) = sections.buffer.last_mut() {
                if item.desc.iter().all(|l| l.is_empty()) {
                    if let Some(attr) = parse_item_attribute(line) {
                        match attr {
                            ItemAttr::Required => item.required = Some(true),
                            ItemAttr::Enum(values) => item.enum_values = Some(values),
                            ItemAttr::Minimum(v) => item.minimum = Some(v),
                            ItemAttr::Maximum(v) => item.maximum = Some(v),
                        }
                        continue;
                    }
                }
                item.desc.push(line.to_string());
            }
        }

        sections.flush();

        let description = description.join("\n").trim().to_string();
        let summary = first_sentence(&description);

        ParsedDoc {
            description: Some(description),
            summary: Some(summary),
            query_params: sections
                .query
                .map(|items| normalize_params(items, ParamLocation::Query)),
            post_params: sections
                .post
                .map(|items| normalize_params(items, ParamLocation::Form)),
            serializer: sections.serializer,
            deserializer: sections.deserializer,
            response_notes: sections.response.map(normalize_responses),
        }
    }
}

fn normalize_params(items: Vec<ListItem>, location: ParamLocation) -> Vec<ParamSpec> {
    items
        .into_iter()
        .map(|item| ParamSpec {
            name: item.name,
            location,
            description: Some(item.desc.join("\n").trim().to_string()),
            data_type: Some(item.ty.unwrap_or_default()),
            required: item.required,
            enum_values: item.enum_values,
            minimum: item.minimum,
            maximum: item.maximum,
            default: None,
        })
        .collect()
}

fn normalize_responses(items: Vec<ListItem>) -> IndexMap<String, String> {
    let mut notes = IndexMap::new();
    for item in items {
        let desc = item.desc.join("\n").trim().to_string();
        // `404: Not found` puts the message in the type slot; the indented
        // form puts it in the description.
        let message = if desc.is_empty() {
            item.ty.unwrap_or_default()
        } else {
            desc
        };
        notes.insert(item.name, message);
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_parse_empty_input() {
        let parser = SimpleDocParser;
        assert_eq!(parser.parse(None), ParsedDoc::default());
        assert_eq!(parser.parse(Some("")), ParsedDoc::default());
    }

    #[test]
    fn test_simple_parse() {
        let docstring = "
            Creates a new user.
            Returns: token - auth token

            email -- e-mail address
            password -- password, optional
            phone -- phone number in US format (XXX-XXX-XXXX), optional
            ";
        let parser = SimpleDocParser;
        let parsed = parser.parse(Some(docstring));

        assert_eq!(
            parsed.description.as_deref(),
            Some("Creates a new user.\nReturns: token - auth token")
        );
        assert_eq!(parsed.summary.as_deref(), Some("Creates a new user"));

        let query = parsed.query_params.unwrap();
        assert_eq!(query.len(), 3);
        assert_eq!(query[0].name, "email");
        assert_eq!(query[0].description.as_deref(), Some("e-mail address"));
        assert_eq!(query[0].data_type.as_deref(), Some(""));
        assert_eq!(query[0].location, ParamLocation::Query);
        assert_eq!(
            query[2].description.as_deref(),
            Some("phone number in US format (XXX-XXX-XXXX), optional")
        );
        assert!(parsed.post_params.is_none());
        assert!(parsed.serializer.is_none());
        assert!(parsed.response_notes.is_none());
    }

    #[test]
    fn test_simple_parse_without_params() {
        let parser = SimpleDocParser;
        let parsed = parser.parse(Some("A Test View\n\nThis is more commenting"));

        assert_eq!(
            parsed.description.as_deref(),
            Some("A Test View\n\nThis is more commenting")
        );
        assert_eq!(parsed.summary.as_deref(), Some("A Test View"));
        assert_eq!(parsed.query_params, Some(Vec::new()));
    }

    #[test]
    fn test_simple_description_cut_at_first_param_line() {
        let docstring = "
            My comments are here

            param -- my param
            ";
        let parser = SimpleDocParser;
        let parsed = parser.parse(Some(docstring));

        assert_eq!(parsed.description.as_deref(), Some("My comments are here"));
        assert_eq!(parsed.query_params.unwrap().len(), 1);
    }

    #[test]
    fn test_trim_docstring() {
        assert_eq!(trim_docstring(""), "");
        assert_eq!(trim_docstring("   \n  "), "");
        assert_eq!(
            trim_docstring("\n    First line.\n    Second line.\n      indented\n"),
            "First line.\nSecond line.\n  indented"
        );
        assert_eq!(trim_docstring("Leading text\n    body"), "Leading text\n    body");
    }

    #[test]
    fn test_trim_docstring_expands_tabs() {
        assert_eq!(trim_docstring("\n\tone\n\ttwo"), "one\ntwo");
    }

    #[test]
    fn test_rst_parse_empty_input() {
        let parser = RstDocParser;
        assert_eq!(parser.parse(None), ParsedDoc::default());
        assert_eq!(parser.parse(Some("")), ParsedDoc::default());
    }

    #[test]
    fn test_rst_parse_plain_text() {
        let docstring = "
            Creates a new user.
            Returns: token - auth token
            ";
        let parser = RstDocParser;
        let parsed = parser.parse(Some(docstring));

        assert_eq!(
            parsed.description.as_deref(),
            Some("Creates a new user.\nReturns: token - auth token")
        );
        assert_eq!(parsed.summary.as_deref(), Some("Creates a new user"));
        assert!(parsed.query_params.is_none());
        assert!(parsed.post_params.is_none());
        assert!(parsed.response_notes.is_none());
    }

    #[test]
    fn test_rst_parse_full_markup() {
        let docstring = "
            :Query:
              size
                  The size of the fox (in meters)
              weight : float
                  :required:
                  The weight of the fox (in stones)
              age : int
                  The age of the fox (in years)

                  This may also be None

            :Post:
              size
                  The size of the fox (in meters)

            :serializer: .serializer
            :deserializer: .deserializer

            :response:
                200
                    Ok
                404: Not found
            :unknown:
                test
                    test
            ";
        let parser = RstDocParser;
        let parsed = parser.parse(Some(docstring));

        assert_eq!(parsed.description.as_deref(), Some(""));
        assert_eq!(parsed.summary.as_deref(), Some(""));
        assert_eq!(parsed.serializer.as_deref(), Some(".serializer"));
        assert_eq!(parsed.deserializer.as_deref(), Some(".deserializer"));

        let query = parsed.query_params.unwrap();
        assert_eq!(query.len(), 3);

        assert_eq!(query[0].name, "size");
        assert_eq!(query[0].location, ParamLocation::Query);
        assert_eq!(query[0].data_type.as_deref(), Some(""));
        assert_eq!(
            query[0].description.as_deref(),
            Some("The size of the fox (in meters)")
        );

        assert_eq!(query[1].name, "weight");
        assert_eq!(query[1].data_type.as_deref(), Some("float"));
        assert_eq!(query[1].required, Some(true));
        assert_eq!(
            query[1].description.as_deref(),
            Some("The weight of the fox (in stones)")
        );

        assert_eq!(query[2].name, "age");
        assert_eq!(query[2].data_type.as_deref(), Some("int"));
        assert_eq!(query[2].required, None);
        assert_eq!(
            query[2].description.as_deref(),
            Some("The age of the fox (in years)\n\nThis may also be None")
        );

        let post = parsed.post_params.unwrap();
        assert_eq!(post.len(), 1);
        assert_eq!(post[0].name, "size");
        assert_eq!(post[0].location, ParamLocation::Form);

        let notes = parsed.response_notes.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes["200"], "Ok");
        assert_eq!(notes["404"], "Not found");
    }

    #[test]
    fn test_rst_description_before_sections() {
        let docstring = "
            Lists all foxes.
            Supports paging.

            :query:
              page : int
                  Page number
            ";
        let parser = RstDocParser;
        let parsed = parser.parse(Some(docstring));

        assert_eq!(
            parsed.description.as_deref(),
            Some("Lists all foxes.\nSupports paging.")
        );
        assert_eq!(parsed.summary.as_deref(), Some("Lists all foxes"));

        let query = parsed.query_params.unwrap();
        assert_eq!(query.len(), 1);
        assert_eq!(query[0].name, "page");
        assert_eq!(query[0].data_type.as_deref(), Some("int"));
    }

    #[test]
    fn test_rst_unknown_section_stops_description() {
        let docstring = "
            Visible text.

            :note:
                hidden scope text

            Invisible text.
            ";
        let parser = RstDocParser;
        let parsed = parser.parse(Some(docstring));

        assert_eq!(parsed.description.as_deref(), Some("Visible text."));
    }

    #[test]
    fn test_rst_item_attributes() {
        let docstring = "
            :post:
              color
                  :enum: red, green, blue
                  Fur color
              length : float
                  :minimum: 0.2
                  :maximum: 1.5
                  Body length in meters
            ";
        let parser = RstDocParser;
        let parsed = parser.parse(Some(docstring));

        let post = parsed.post_params.unwrap();
        assert_eq!(post.len(), 2);
        assert_eq!(
            post[0].enum_values,
            Some(vec![
                "red".to_string(),
                "green".to_string(),
                "blue".to_string()
            ])
        );
        assert_eq!(post[0].description.as_deref(), Some("Fur color"));
        assert_eq!(post[1].minimum, Some(0.2));
        assert_eq!(post[1].maximum, Some(1.5));
    }

    #[test]
    fn test_rst_attribute_after_text_is_plain_text() {
        let docstring = "
            :query:
              size
                  The size of the fox
                  :required:
            ";
        let parser = RstDocParser;
        let parsed = parser.parse(Some(docstring));

        let query = parsed.query_params.unwrap();
        assert_eq!(query[0].required, None);
        assert_eq!(
            query[0].description.as_deref(),
            Some("The size of the fox\n:required:")
        );
    }

    #[test]
    fn test_rst_empty_list_section() {
        let parser = RstDocParser;
        let parsed = parser.parse(Some("Some text.\n\n:query:\n"));

        assert_eq!(parsed.query_params, Some(Vec::new()));
    }
}
