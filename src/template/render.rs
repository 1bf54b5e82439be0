// ABOUTME: Pure template rendering: substitutes placeholder bindings into a parsed template.
// ABOUTME: No I/O and no mutation, so identical inputs always yield identical bytes.

use super::error::TemplateError;
use super::store::{Segment, Template};
use std::collections::HashMap;

/// Render a template against a set of placeholder bindings.
///
/// Rendering is a pure function of `(template, vars)`: calling it twice with
/// the same inputs yields byte-identical output. Idempotent re-runs and
/// backup/diff tooling depend on this.
///
/// # Errors
///
/// `MissingField` when a placeholder names a binding that does not exist.
pub fn render(template: &Template, vars: &HashMap<String, String>) -> Result<String, TemplateError> {
    let mut out = String::new();
    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(field) => match vars.get(field) {
                Some(value) => out.push_str(value),
                None => {
                    return Err(TemplateError::MissingField {
                        name: template.name().to_string(),
                        field: field.clone(),
                    });
                }
            },
        }
    }
    Ok(out)
}
