// ABOUTME: Template loading, parsing, and rendering.
// ABOUTME: Exposes the store, the parsed template type, and the pure render function.

mod error;
mod render;
mod store;

pub use error::{TemplateError, TemplateErrorKind};
pub use render::render;
pub use store::{DEFAULT_KEY, TEMPLATE_EXTENSION, Template, TemplateStore};
