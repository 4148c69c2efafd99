//! The 404 page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{endpoints, html::base};
use maud::html;

/// The fallback route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// A 404 response with a short page pointing back to the dashboard.
pub fn get_404_not_found_response() -> Response {
    let content = html!(
        section class="bg-white dark:bg-gray-900" {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6" {
                div class="mx-auto max-w-screen-sm text-center" {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        "404"
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        "Page not found"
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        "Check the address, or head back to the dashboard."
                    }

                    a
                        href=(endpoints::ROOT)
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Dashboard"
                    }
                }
            }
        }
    );

    (StatusCode::NOT_FOUND, base("Not Found", &[], &content)).into_response()
}
