// Contact form
// Headless form state, validation schema and country suggestions, rendered with Maud

pub mod config;
pub mod controller;
pub mod field;
pub mod render;
pub mod schema;
pub mod submit;
pub mod suggestions;

// Re-export core types
pub use config::Config;
pub use controller::{FieldState, FormController, FormSnapshot};
pub use field::{Field, FormValues, UnknownField};
pub use schema::{FormErrors, Validate, ValidationSchema};
pub use submit::{DelayedSubmit, SubmitError, SubmitHandler};
pub use suggestions::{
    CountryLookup, CountryRecord, RestCountriesLookup, Suggestion, SuggestionProvider,
    SuggestionUpdate,
};

// Re-export Maud for callers composing pages
pub use maud::{html, Markup, PreEscaped};
