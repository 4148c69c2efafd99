//! The review form partial: extracted bill fields, editable before saving.

use maud::{Markup, html};
use time::Date;

use crate::{
    category::Category,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE},
};

/// The values the review form is pre-filled with.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewFormData {
    /// The extracted vendor name, empty when the model found none.
    pub vendor: String,
    /// The extracted category.
    pub category: Category,
    /// The extracted bill date, already defaulted to today if absent.
    pub date: Date,
    /// The extracted total, `None` leaves the field blank.
    pub amount: Option<f64>,
    /// The stored image path, carried through to the save request.
    pub image_path: String,
    /// A warning to show when extraction failed and the fields need to be
    /// filled in manually.
    pub warning: Option<String>,
}

/// Render the review form, pre-filled with the extracted fields.
///
/// The form posts to the save endpoint; cancelling reloads the entry page,
/// which discards the guesses (the uploaded image stays on disk).
pub fn review_form(data: ReviewFormData) -> Markup {
    html!(
        @if let Some(warning) = &data.warning {
            div
                class="p-4 mb-4 text-sm text-yellow-800 rounded-lg bg-yellow-50
                    dark:bg-gray-800 dark:text-yellow-300 border border-yellow-300
                    dark:border-yellow-800"
                role="alert"
            {
                p class="font-medium" { "The bill could not be read automatically" }
                p { (warning) " Fill in the details below and save." }
            }
        }

        div class="flex gap-4 items-start" {
            img
                src=(data.image_path)
                alt="Uploaded bill"
                class="w-24 rounded border border-gray-300 dark:border-gray-600";

            form
                hx-post=(endpoints::SAVE_BILL_FORM)
                hx-target-error="#alert-container"
                class="flex-1 space-y-4"
            {
                input type="hidden" name="image_path" value=(data.image_path);

                div {
                    label for="vendor" class=(FORM_LABEL_STYLE) { "Vendor" }
                    input
                        type="text"
                        name="vendor"
                        id="vendor"
                        value=(data.vendor)
                        placeholder="Who was paid?"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    select
                        name="category"
                        id="category"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for category in Category::ALL {
                            option
                                value=(category)
                                selected[category == data.category]
                            {
                                (category.label())
                            }
                        }
                    }
                }

                div {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        type="date"
                        name="date"
                        id="date"
                        value=(data.date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input
                        type="number"
                        name="amount"
                        id="amount"
                        value=[data.amount]
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save bill" }

                a
                    href=(endpoints::NEW_BILL_VIEW)
                    class=(LINK_STYLE)
                {
                    "Cancel"
                }
            }
        }
    )
}
