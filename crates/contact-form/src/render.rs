// File: src/render.rs
// Purpose: Maud markup for the contact form, inline errors and the suggestion list
//
// Inputs post change/blur events with HTMX and swap back only their own
// feedback region, so text typed while a request is in flight is never
// overwritten. Submits and selections swap the whole form. The markup here
// is the only place display state is decided.

use crate::controller::{FieldState, FormController};
use crate::field::Field;
use crate::suggestions::Suggestion;
use maud::{html, Markup, DOCTYPE};

/// Id of the element the form partial replaces
pub const FORM_ID: &str = "contact-form";

/// Id of the suggestion list container
pub const SUGGESTIONS_ID: &str = "country-suggestions";

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";

/// Response header telling the input whether its field is currently invalid
pub const FIELD_INVALID_HEADER: &str = "x-field-invalid";

/// Full HTML document around `body`
pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(HTMX_SRC) {}
            }
            body {
                main { (body) }
            }
        }
    }
}

/// Inline feedback under an input
pub fn field_error(state: &FieldState) -> Markup {
    match state {
        // Keep the row height stable before the first blur
        FieldState::Untouched => html! { div.form-message { (maud::PreEscaped("&nbsp;")) } },
        FieldState::Valid => html! { div.form-message.valid { "all good" } },
        FieldState::Invalid(message) => html! { div.form-message.invalid { (message) } },
    }
}

/// Id of a field's feedback region
pub fn feedback_id(field: Field) -> String {
    format!("{}-feedback", field.as_str())
}

/// The swappable region holding a field's inline feedback
pub fn field_feedback(field: Field, state: &FieldState) -> Markup {
    html! {
        div.field-feedback id=(feedback_id(field)) { (field_error(state)) }
    }
}

/// Keeps the input's `has-error` class in step with a feedback-only swap
fn sync_error_class(field: Field) -> String {
    format!(
        "htmx:afterRequest: document.getElementById('{}').classList.toggle('has-error', \
         event.detail.xhr.getResponseHeader('{}') === 'true')",
        field.as_str(),
        FIELD_INVALID_HEADER
    )
}

/// One label/input/error row
fn input_row(form: &FormController, field: Field, value: &str) -> Markup {
    let name = field.as_str();
    let state = form.field_state(field);
    let change_url = format!("/fields/{}", name);
    let blur_url = format!("/fields/{}/blur", name);
    let feedback_target = format!("#{}", feedback_id(field));
    let sync_class = sync_error_class(field);

    html! {
        div.input-row {
            label for=(name) { (field.label()) }
            input
                type=(field.input_type())
                name=(name)
                id=(name)
                placeholder=(field.placeholder())
                value=(value)
                class=[state.is_invalid().then_some("has-error")]
                autocomplete="off"
                hx-post=(change_url)
                hx-trigger="keyup changed delay:150ms"
                hx-sync="this:replace"
                hx-target=(feedback_target)
                hx-swap="outerHTML"
                hx-on=(sync_class);
            span hidden hx-post=(blur_url) hx-trigger={ "blur from:#" (name) }
                hx-target=(feedback_target) hx-swap="outerHTML" hx-on=(sync_class) {}
            (field_feedback(field, &state))
        }
    }
}

/// Country row: the input drives the suggestion list instead of the form
fn country_row(form: &FormController, display_value: &str, suggestions: &[Suggestion]) -> Markup {
    let field = Field::Country;
    let state = form.field_state(field);
    let feedback_target = format!("#{}", feedback_id(field));

    html! {
        div.input-row.autosuggest {
            label for=(field.as_str()) { (field.label()) }
            input
                type="text"
                name=(field.as_str())
                id=(field.as_str())
                placeholder=(field.placeholder())
                value=(display_value)
                class=[state.is_invalid().then_some("has-error")]
                autocomplete="off"
                hx-get="/countries"
                hx-trigger="keyup changed"
                hx-target={ "#" (SUGGESTIONS_ID) }
                hx-swap="outerHTML";
            span hidden hx-post="/fields/country/blur" hx-trigger="blur from:#country"
                hx-target=(feedback_target) hx-swap="outerHTML" hx-on=(sync_error_class(field)) {}
            (suggestion_list(suggestions))
            (field_feedback(field, &state))
        }
    }
}

/// Candidate countries; clicking one selects it
pub fn suggestion_list(suggestions: &[Suggestion]) -> Markup {
    html! {
        ul.suggestions id=(SUGGESTIONS_ID) {
            @for suggestion in suggestions {
                li.suggestion
                    hx-post="/countries/select"
                    hx-vals=(select_vals(&suggestion.name))
                    hx-target={ "#" (FORM_ID) }
                    hx-swap="outerHTML" {
                    img.flag src=(suggestion.flag_image_url) alt="" width="24";
                    span.country-name { (suggestion.name) }
                }
            }
        }
    }
}

fn select_vals(name: &str) -> String {
    serde_json::json!({ "name": name }).to_string()
}

/// The contact form bound to controller state
///
/// `display_value` and `suggestions` feed the country row and are ignored
/// when the schema does not include a country.
pub fn contact_form(form: &FormController, display_value: &str, suggestions: &[Suggestion]) -> Markup {
    let values = form.values();

    // While a submit is pending the form polls itself until the button re-enables
    let submitting = form.is_submitting();
    let post = (!submitting).then_some("/submit");
    let poll = submitting.then_some("/form");

    html! {
        form id=(FORM_ID) method="post" action="/submit" hx-swap="outerHTML"
            hx-post=[post] hx-get=[poll] hx-trigger=[poll.map(|_| "load delay:250ms")] {
            @for field in form.schema().fields() {
                @if field == Field::Country {
                    (country_row(form, display_value, suggestions))
                } @else {
                    (input_row(form, field, values.get(field)))
                }
            }
            div.input-row {
                button type="submit" disabled[submitting] {
                    @if submitting { "Submitting..." } @else { "Submit" }
                }
            }
        }
    }
}
