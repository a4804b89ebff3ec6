//! Markshelf console demo.
//!
//! Walks through the browse and bookmark screens against an in-memory
//! database, or against the database named in a settings file passed as the
//! first argument.

use markshelf::app::App;
use markshelf::types::errors::AppError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("  Markshelf v{} demo", env!("CARGO_PKG_VERSION"));
    println!();

    let app = open_app()?;

    demo_live_categories(&app).await?;
    demo_browse_screen(&app).await?;
    demo_bookmark_screen(&app).await?;
    demo_category_repair(&app).await?;

    println!("───────────────────────────────────────────────────────────────");
    println!("  done");
    Ok(())
}

fn open_app() -> Result<App, AppError> {
    match std::env::args().nth(1) {
        Some(config_path) => App::from_settings_file(&config_path),
        None => App::in_memory(),
    }
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

async fn demo_live_categories(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    section("Live categories");

    let mut live = app.engine.observe_categories();
    let initial = match live.next().await {
        Some(first) => first?,
        None => return Ok(()),
    };
    let names: Vec<&str> = initial.iter().map(|c| c.name.as_str()).collect();
    println!("  Initial: {}", names.join(", "));

    let reading = app.engine.create_category("Reading").await?;
    if initial.iter().all(|c| c.id != reading) {
        if let Some(next) = live.next().await {
            let names: Vec<String> = next?.into_iter().map(|c| c.name).collect();
            println!("  After create: {}", names.join(", "));
        }
    }

    // A second create with the same name returns the same id and writes nothing.
    let again = app.engine.create_category(" Reading ").await?;
    println!("  Create \"Reading\" again: same id = {}", again == reading);
    println!();
    Ok(())
}

async fn demo_browse_screen(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    section("Browse screen");

    let mut browse = app.browse_screen();
    browse.on_page_updated("https://www.rust-lang.org", Some("Rust Programming Language"));
    browse.open_save_dialog().await?;
    let saved = browse.save_bookmark().await;
    println!("  Saved current page: {}", saved);

    browse.open_save_dialog().await?;
    if let Some(message) = browse.save_dialog().message() {
        println!("  Reopened dialog shows: {}", message);
    }
    let saved_again = browse.save_bookmark().await;
    println!(
        "  Second save closed dialog: {} (message: {})",
        saved_again,
        browse
            .save_dialog()
            .message()
            .map(|m| m.to_string())
            .unwrap_or_default()
    );
    browse.close_save_dialog();
    println!();
    Ok(())
}

async fn demo_bookmark_screen(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    section("Bookmark screen");

    let mut screen = app.bookmark_screen();
    let mut live = screen.subscribe();
    if let Some(snapshot) = live.next().await {
        screen.apply_snapshot(snapshot?);
    }

    let first = screen
        .categories()
        .iter()
        .find_map(|c| c.bookmarks.first().cloned());
    // A blank title falls back to the url.
    if let Some(bookmark) = first.filter(|b| b.title != b.url) {
        screen.start_edit_bookmark(&bookmark);
        screen.update_bookmark_title("");
        if screen.save_bookmark_edit().await {
            if let Some(snapshot) = live.next().await {
                screen.apply_snapshot(snapshot?);
            }
        }
    }

    for group in screen.categories() {
        println!(
            "  [{}] {} ({} bookmarks)",
            if screen.is_expanded(group.category.id) { "-" } else { "+" },
            group.category.name,
            group.bookmarks.len()
        );
        for bookmark in &group.bookmarks {
            println!("      {} <{}>", bookmark.title, bookmark.url);
        }
    }
    println!();
    Ok(())
}

async fn demo_category_repair(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    section("Category repair");

    for category in app.engine.categories().await? {
        app.engine.delete_category(category.id).await?;
    }
    let remaining: Vec<String> = app
        .engine
        .categories()
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();
    println!("  After deleting everything: {}", remaining.join(", "));
    println!();
    Ok(())
}
