//! The dashboard page: stat cards, charts and the monthly breakdown table.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, endpoints,
    bill::count_bills,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
};

use super::{
    cards::stat_cards,
    charts::{DashboardChart, build_dashboard_charts, charts_script},
    core::{InsightsState, build_insights},
    tables::monthly_breakdown_table,
};

/// Display a page with an overview of the user's spending.
pub async fn get_dashboard_page(State(state): State<InsightsState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    let bill_count = count_bills(&connection)
        .inspect_err(|error| tracing::error!("could not count bills: {error}"))?;

    if bill_count == 0 {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let insights = build_insights(&connection, &state.local_timezone)?;

    let charts = build_dashboard_charts(&insights);
    let cards = stat_cards(&insights);
    let table = monthly_breakdown_table(&insights.monthly_breakdown);

    Ok(dashboard_view(nav_bar, cards, &charts, table).into_response())
}

/// Renders the dashboard page when no bills exist yet.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_bill_link = link(endpoints::NEW_BILL_VIEW, "adding a bill");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you save some bills. \
                Start by " (new_bill_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the dashboard page with cards, charts and the breakdown table.
fn dashboard_view(
    nav_bar: NavBar,
    cards: Markup,
    charts: &[DashboardChart],
    table: Markup,
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (cards)

            section
                id="charts"
                class="w-full mx-auto mb-4"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    @for chart in charts {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    }
                }
            }

            (table)
        }
    );

    let scripts = [
        HeadElement::ScriptLink(
            "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js".to_owned(),
        ),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod dashboard_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::OffsetDateTime;

    use crate::{
        bill::{BillDraft, create_bill},
        category::Category,
        db::initialize,
        insights::core::InsightsState,
    };

    use super::get_dashboard_page;

    fn test_state() -> InsightsState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        InsightsState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn add_bill(state: &InsightsState, category: Category, amount: f64) {
        let connection = state.db_connection.lock().unwrap();
        create_bill(
            BillDraft {
                vendor: "Vendor".to_owned(),
                category,
                date: OffsetDateTime::now_utc().date().to_string(),
                amount,
                image_path: String::new(),
            },
            &connection,
        )
        .unwrap();
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{}' not found",
            chart_id
        );
    }

    #[tokio::test]
    async fn dashboard_page_loads_with_charts_and_table() {
        let state = test_state();
        add_bill(&state, Category::Food, 250.0);
        add_bill(&state, Category::Travel, 80.0);

        let response = get_dashboard_page(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert!(html.errors.is_empty(), "invalid HTML: {:?}", html.errors);

        assert_chart_exists(&html, "category-chart");
        assert_chart_exists(&html, "trend-chart");
        assert_chart_exists(&html, "breakdown-chart");

        let table = Selector::parse("table").unwrap();
        assert!(html.select(&table).next().is_some());
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let state = test_state();

        let response = get_dashboard_page(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert!(html.html().contains("Nothing here yet"));
    }

    #[tokio::test]
    async fn cards_show_this_months_totals() {
        let state = test_state();
        add_bill(&state, Category::Food, 100.0);
        add_bill(&state, Category::Food, 40.0);

        let response = get_dashboard_page(State(state)).await.unwrap();
        let html = parse_html(response).await;

        let text = html.html();
        assert!(text.contains("$140.00"));
        assert!(text.contains("Food"));
    }
}
