//! The page for entering a new bill.
//!
//! The page starts with just the upload form. Submitting it posts the image
//! to the upload endpoint, which answers with the review form partial; the
//! partial is swapped into the review area below the upload form. Saving or
//! cancelling from the review form leaves the page.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, base, loading_spinner},
    navigation::NavBar,
};

/// Display the bill entry page.
pub async fn get_new_bill_page() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_BILL_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto max-w-lg text-gray-900 dark:text-white"
        {
            h1 class="text-2xl font-bold mb-2" { "Add a bill" }

            p class="text-sm text-gray-600 dark:text-gray-400 mb-6"
            {
                "Upload a photo of the bill and the details will be read \
                automatically. You can correct anything before saving."
            }

            form
                id="upload-form"
                hx-post=(endpoints::UPLOAD_FORM)
                hx-encoding="multipart/form-data"
                hx-target="#review-area"
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
                class="w-full mb-6"
            {
                label
                    for="file"
                    class=(FORM_LABEL_STYLE)
                {
                    "Bill image"
                }

                input
                    type="file"
                    name="file"
                    id="file"
                    accept=".jpg,.jpeg,.png,.gif,.webp"
                    required
                    class="block w-full mb-4 text-sm text-gray-900 border
                        border-gray-300 rounded-lg cursor-pointer bg-gray-50
                        dark:text-gray-400 focus:outline-none dark:bg-gray-700
                        dark:border-gray-600 dark:placeholder-gray-400";

                button
                    type="submit"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="htmx-indicator"
                    {
                        (loading_spinner())
                        "Reading bill…"
                    }

                    span { "Extract bill details" }
                }
            }

            // The review form is swapped in here after upload.
            div id="review-area" class="w-full" {}
        }
    );

    base("New Bill", &[], &content)
}
