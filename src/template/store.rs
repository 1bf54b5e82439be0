// ABOUTME: Template store: loads and parses named template bodies from a directory.
// ABOUTME: All-or-nothing load; lookups fall back to the reserved "default" key.

use super::error::{ParseSnafu, SourceUnavailableSnafu, TemplateError};
use crate::types::ManifestId;
use snafu::ResultExt;
use std::collections::HashMap;
use std::path::Path;

/// Reserved key used when a manifest has no template of its own.
pub const DEFAULT_KEY: &str = "default";

/// File extension template bodies are discovered under.
pub const TEMPLATE_EXTENSION: &str = "tmpl";

/// A segment of a parsed template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A named, parsed template. Read-only after load; parsing happens exactly
/// once so rendering never re-scans the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template body into literal and placeholder segments.
    ///
    /// Placeholders are `{{name}}` with `name` non-empty ASCII alphanumeric
    /// or underscore. Unclosed, empty, nested, or stray delimiters are parse
    /// errors.
    pub fn parse(name: &str, body: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = body;

        loop {
            match rest.find("{{") {
                None => {
                    if rest.contains("}}") {
                        return ParseSnafu {
                            name,
                            reason: "closing '}}' without matching '{{'",
                        }
                        .fail();
                    }
                    literal.push_str(rest);
                    break;
                }
                Some(open) => {
                    let before = &rest[..open];
                    if before.contains("}}") {
                        return ParseSnafu {
                            name,
                            reason: "closing '}}' without matching '{{'",
                        }
                        .fail();
                    }
                    literal.push_str(before);

                    let after = &rest[open + 2..];
                    let close = match after.find("}}") {
                        Some(c) => c,
                        None => {
                            return ParseSnafu {
                                name,
                                reason: "unclosed placeholder",
                            }
                            .fail();
                        }
                    };

                    let raw = &after[..close];
                    if raw.contains("{{") {
                        return ParseSnafu {
                            name,
                            reason: "nested '{{' inside placeholder",
                        }
                        .fail();
                    }

                    let field = raw.trim();
                    if field.is_empty() {
                        return ParseSnafu {
                            name,
                            reason: "empty placeholder",
                        }
                        .fail();
                    }
                    if let Some(bad) = field
                        .chars()
                        .find(|c| !c.is_ascii_alphanumeric() && *c != '_')
                    {
                        return ParseSnafu {
                            name,
                            reason: format!("invalid character '{bad}' in placeholder name"),
                        }
                        .fail();
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(field.to_string()));
                    rest = &after[close + 2..];
                }
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template {
            name: name.to_string(),
            segments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder field names referenced by this template, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(field) => Some(field.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

/// Mapping from manifest key to parsed template, loaded from a directory of
/// `*.tmpl` files (file stem = key). Either the full mapping loads or the
/// call fails; there are no partial results.
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: HashMap<String, Template>,
}

impl TemplateStore {
    /// Load every template under `source`.
    ///
    /// # Errors
    ///
    /// `SourceUnavailable` when the directory cannot be read, `Parse` when
    /// any body has malformed placeholder syntax.
    pub fn load(source: &Path) -> Result<Self, TemplateError> {
        let entries = std::fs::read_dir(source).context(SourceUnavailableSnafu {
            path: source.to_path_buf(),
        })?;

        let mut templates = HashMap::new();
        for entry in entries {
            let entry = entry.context(SourceUnavailableSnafu {
                path: source.to_path_buf(),
            })?;
            let path = entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let body = std::fs::read_to_string(&path).context(SourceUnavailableSnafu {
                path: path.clone(),
            })?;
            let template = Template::parse(stem, &body)?;
            templates.insert(stem.to_string(), template);
        }

        tracing::debug!(
            source = %source.display(),
            count = templates.len(),
            "loaded template store"
        );

        Ok(TemplateStore { templates })
    }

    /// Build a store from in-memory bodies. Used by tests and embedders.
    pub fn from_bodies<'a, I>(bodies: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut templates = HashMap::new();
        for (name, body) in bodies {
            templates.insert(name.to_string(), Template::parse(name, body)?);
        }
        Ok(TemplateStore { templates })
    }

    /// Resolve the template for a manifest, falling back to the reserved
    /// default key.
    ///
    /// # Errors
    ///
    /// `NotFound` when neither a specific template nor a default exists.
    /// This is surfaced to the caller, never swallowed.
    pub fn lookup(&self, manifest: &ManifestId) -> Result<&Template, TemplateError> {
        self.templates
            .get(manifest.as_str())
            .or_else(|| self.templates.get(DEFAULT_KEY))
            .ok_or_else(|| TemplateError::NotFound {
                name: manifest.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
