//! Terminal rendering through a mounted application
//!
//! Mounts applications onto a `TestBackend` and verifies the drawn buffer
//! follows state and route changes, one frame at a time.

use std::time::Duration;

use libmoonwave::{ConfigurationError, MoonwaveError, RouteDef, State};
use moonwave_tui::{demo, moonwave, root, Root, ViewProps, ViewRegistry};
use ratatui::{backend::TestBackend, layout::Rect, widgets::Paragraph, Frame, Terminal};
use serde_json::json;
use tokio::task::LocalSet;
use tokio::time::sleep;

fn test_root(width: u16, height: u16) -> Root<TestBackend> {
    root(Terminal::new(TestBackend::new(width, height)).unwrap())
}

/// Whole buffer as one string per row
fn screen(root: &Root<TestBackend>) -> Vec<String> {
    let terminal = root.borrow();
    let buffer = terminal.backend().buffer();
    let rows: Vec<String> = buffer
        .content
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect();
    rows
}

fn screen_contains(root: &Root<TestBackend>, needle: &str) -> bool {
    screen(root).iter().any(|row| row.contains(needle))
}

async fn next_frame() {
    sleep(Duration::from_millis(50)).await;
}

#[tokio::test(start_paused = true)]
async fn test_demo_renders_home_after_first_frame() {
    LocalSet::new()
        .run_until(async {
            let terminal = test_root(60, 10);
            let app = demo::app::<TestBackend>().mount(terminal.clone()).unwrap();

            // Render is debounced: nothing drawn synchronously on mount
            assert!(!screen_contains(&terminal, "Count"));

            next_frame().await;
            assert!(screen_contains(&terminal, "Moonwave"));
            assert!(screen_contains(&terminal, "Count: 0"));

            app.unmount().unwrap();
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_counter_updates_are_drawn() {
    LocalSet::new()
        .run_until(async {
            let terminal = test_root(60, 10);
            let app = demo::app::<TestBackend>().mount(terminal.clone()).unwrap();
            next_frame().await;

            for _ in 0..3 {
                app.split("increment", json!(1)).unwrap();
            }
            next_frame().await;

            assert!(screen_contains(&terminal, "Count: 3"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_navigation_swaps_nested_view() {
    LocalSet::new()
        .run_until(async {
            let terminal = test_root(60, 10);
            let app = demo::app::<TestBackend>().mount(terminal.clone()).unwrap();
            next_frame().await;

            app.navigate("/about").unwrap();
            next_frame().await;

            assert!(screen_contains(&terminal, "through the router"));
            assert!(!screen_contains(&terminal, "Count"));
            // Layout is still drawn around the child view
            assert!(screen_contains(&terminal, "/about"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_unmount_clears_terminal_and_skips_pending_render() {
    LocalSet::new()
        .run_until(async {
            let terminal = test_root(60, 10);
            let app = demo::app::<TestBackend>().mount(terminal.clone()).unwrap();
            next_frame().await;
            assert!(screen_contains(&terminal, "Count: 0"));

            app.split("increment", json!(1)).unwrap();
            app.unmount().unwrap();
            next_frame().await;

            assert!(screen(&terminal).iter().all(|row| row.trim().is_empty()));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_settings_title_reaches_layout() {
    LocalSet::new()
        .run_until(async {
            let settings =
                libmoonwave::Settings::from_toml_str("[state]\ntitle = \"Configured\"").unwrap();
            let terminal = test_root(60, 10);
            let _app = demo::app::<TestBackend>()
                .with_settings(&settings)
                .unwrap()
                .mount(terminal.clone())
                .unwrap();
            next_frame().await;

            assert!(screen_contains(&terminal, "Configured"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_unknown_view_is_a_render_error_not_a_crash() {
    LocalSet::new()
        .run_until(async {
            let terminal = test_root(20, 3);
            let views = ViewRegistry::new().register(
                "known",
                |frame: &mut Frame, area: Rect, _: &ViewProps| {
                    frame.render_widget(Paragraph::new("known"), area);
                    area
                },
            );
            let app: libmoonwave::App<Root<TestBackend>> = moonwave(views)
                .routes(vec![RouteDef::new("/", "unregistered")])
                .mount(terminal.clone())
                .unwrap();
            next_frame().await;

            // The failed render was logged; the application keeps running
            assert!(app.is_mounted());
            assert!(!screen_contains(&terminal, "known"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_nothing_drawn_before_first_route() {
    LocalSet::new()
        .run_until(async {
            let terminal = test_root(20, 3);
            let router = libmoonwave::MockRouter::new();
            let views = ViewRegistry::new().register(
                "page",
                |frame: &mut Frame, area: Rect, _: &ViewProps| {
                    frame.render_widget(Paragraph::new("page"), area);
                    area
                },
            );
            let app = moonwave(views)
                .routes(vec![RouteDef::new("/", "page")])
                .router_factory(router.factory())
                .mount(terminal.clone())
                .unwrap();

            // State changes, but no route is in state yet
            app.store()
                .unwrap()
                .update(State::with("title", json!("x")))
                .unwrap();
            next_frame().await;
            assert!(!screen_contains(&terminal, "page"));

            router
                .emit(libmoonwave::Route::new("/", "/"))
                .unwrap();
            next_frame().await;
            assert!(screen_contains(&terminal, "page"));
        })
        .await;
}

#[test]
fn test_missing_routes_rejected_before_terminal_use() {
    let result = moonwave::<TestBackend>(ViewRegistry::new()).mount(test_root(20, 3));
    assert!(matches!(
        result.map(|_| ()),
        Err(MoonwaveError::Configuration(ConfigurationError::MissingRoutes))
    ));
}
