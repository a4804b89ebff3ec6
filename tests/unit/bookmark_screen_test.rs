//! Unit tests for the bookmark list screen: expand state reconciliation,
//! the new-category input, and the bookmark and category dialogs.

use markshelf::app::App;
use markshelf::screens::{BookmarkScreen, DialogState};
use markshelf::types::category::{Category, CategoryId, CategoryWithBookmarks};

fn setup() -> (App, BookmarkScreen) {
    let app = App::in_memory().expect("Failed to open in-memory app");
    let screen = app.bookmark_screen();
    (app, screen)
}

fn snapshot(ids: &[i64]) -> Vec<CategoryWithBookmarks> {
    ids.iter()
        .map(|id| CategoryWithBookmarks {
            category: Category {
                id: CategoryId(*id),
                name: format!("c{id}"),
            },
            bookmarks: Vec::new(),
        })
        .collect()
}

#[test]
fn test_new_categories_start_expanded() {
    let (_app, mut screen) = setup();
    screen.apply_snapshot(snapshot(&[1, 2]));
    assert!(screen.is_expanded(CategoryId(1)));
    assert!(screen.is_expanded(CategoryId(2)));
}

#[test]
fn test_expand_state_survives_snapshots() {
    let (_app, mut screen) = setup();
    screen.apply_snapshot(snapshot(&[1, 2]));
    screen.toggle_expanded(CategoryId(1));
    assert!(!screen.is_expanded(CategoryId(1)));

    screen.apply_snapshot(snapshot(&[1, 2, 3]));
    assert!(!screen.is_expanded(CategoryId(1)), "collapsed category stays collapsed");
    assert!(screen.is_expanded(CategoryId(2)));
    assert!(screen.is_expanded(CategoryId(3)), "new category defaults to expanded");
}

#[test]
fn test_removed_categories_are_forgotten() {
    let (_app, mut screen) = setup();
    screen.apply_snapshot(snapshot(&[1, 2]));
    screen.apply_snapshot(snapshot(&[2]));
    assert!(!screen.is_expanded(CategoryId(1)));

    // Reappearing counts as new.
    screen.toggle_expanded(CategoryId(2));
    screen.apply_snapshot(snapshot(&[1, 2]));
    assert!(screen.is_expanded(CategoryId(1)));
    assert!(!screen.is_expanded(CategoryId(2)));
}

#[test]
fn test_toggle_expanded_flips_membership() {
    let (_app, mut screen) = setup();
    screen.apply_snapshot(snapshot(&[7]));
    screen.toggle_expanded(CategoryId(7));
    assert!(!screen.is_expanded(CategoryId(7)));
    screen.toggle_expanded(CategoryId(7));
    assert!(screen.is_expanded(CategoryId(7)));
}

#[tokio::test]
async fn test_live_list_feeds_screen() {
    let (app, mut screen) = setup();
    let mut live = screen.subscribe();
    screen.apply_snapshot(live.next().await.unwrap().unwrap());
    assert_eq!(screen.categories().len(), 1);

    let work = app.engine.create_category("Work").await.unwrap();
    screen.apply_snapshot(live.next().await.unwrap().unwrap());
    assert_eq!(screen.categories().len(), 2);
    assert!(screen.is_expanded(work));
}

#[tokio::test]
async fn test_create_category_from_input_buffer() {
    let (app, mut screen) = setup();
    screen.update_new_category_name("  Reading  ");

    let result = screen.create_category().await.expect("create should run");
    let id = result.unwrap();
    assert_eq!(screen.new_category_name(), "");
    assert!(!screen.is_creating_category());
    assert!(app.engine.categories().await.unwrap().iter().any(|c| c.id == id && c.name == "Reading"));
}

#[tokio::test]
async fn test_blank_new_category_name_is_ignored() {
    let (app, mut screen) = setup();
    screen.update_new_category_name("   ");
    assert!(screen.create_category().await.is_none());
    assert_eq!(app.engine.categories().await.unwrap().len(), 1);
}

#[test]
fn test_create_category_guard_blocks_second_submission() {
    let (_app, mut screen) = setup();
    screen.update_new_category_name("Work");
    assert_eq!(screen.begin_create_category().as_deref(), Some("Work"));
    assert!(screen.is_creating_category());
    assert!(screen.begin_create_category().is_none());

    screen.finish_create_category(&Ok(CategoryId(1)));
    assert!(!screen.is_creating_category());
    assert_eq!(screen.new_category_name(), "");
}

#[tokio::test]
async fn test_edit_category_dialog_renames() {
    let (app, mut screen) = setup();
    let category = app.engine.categories().await.unwrap()[0].clone();

    screen.start_edit_category(&category);
    screen.update_category_name("Inbox");
    assert!(screen.save_category_edit().await);
    assert_eq!(*screen.category_dialog().state(), DialogState::Closed);

    let renamed = app.engine.categories().await.unwrap();
    assert_eq!(renamed[0].name, "Inbox");
}

#[tokio::test]
async fn test_add_category_dialog_creates() {
    let (app, mut screen) = setup();
    screen.start_add_category();
    screen.update_category_name("Later");
    assert!(screen.save_category_edit().await);
    assert!(app.engine.categories().await.unwrap().iter().any(|c| c.name == "Later"));
}

#[tokio::test]
async fn test_blank_category_edit_stays_open_without_contacting_engine() {
    let (app, mut screen) = setup();
    let category = app.engine.categories().await.unwrap()[0].clone();

    screen.start_edit_category(&category);
    screen.update_category_name("  ");
    assert!(!screen.save_category_edit().await);
    assert!(screen.category_dialog().is_open());
    assert_eq!(app.engine.categories().await.unwrap()[0].name, category.name);
}

#[tokio::test]
async fn test_edit_bookmark_dialog_moves_and_defaults_title() {
    let (app, mut screen) = setup();
    let inbox = app.engine.categories().await.unwrap()[0].id;
    let work = app.engine.create_category("Work").await.unwrap();
    app.engine.save_bookmark("Example", "https://example.com", inbox).await;
    let bookmark = app.engine.categories_with_bookmarks().await.unwrap()[0].bookmarks[0].clone();

    screen.start_edit_bookmark(&bookmark);
    screen.update_bookmark_title("");
    screen.select_bookmark_category(work);
    assert!(screen.save_bookmark_edit().await);

    let updated = app.engine.bookmark(bookmark.id).await.unwrap().unwrap();
    assert_eq!(updated.title, "https://example.com");
    assert_eq!(updated.category_id, work);
}

#[tokio::test]
async fn test_edit_of_concurrently_deleted_bookmark_closes_quietly() {
    let (app, mut screen) = setup();
    let inbox = app.engine.categories().await.unwrap()[0].id;
    app.engine.save_bookmark("Example", "https://example.com", inbox).await;
    let bookmark = app.engine.categories_with_bookmarks().await.unwrap()[0].bookmarks[0].clone();

    screen.start_edit_bookmark(&bookmark);
    screen.delete_bookmark(bookmark.id).await.unwrap();
    screen.update_bookmark_title("too late");
    assert!(screen.save_bookmark_edit().await);
    assert!(app.engine.bookmark(bookmark.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_category_from_screen_recreates_default() {
    let (app, screen) = setup();
    let only = app.engine.categories().await.unwrap()[0].id;
    screen.delete_category(only).await.unwrap();

    let categories = app.engine.categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_ne!(categories[0].id, only);
}

#[tokio::test]
async fn test_dismiss_dialogs_closes_both() {
    let (app, mut screen) = setup();
    let category = app.engine.categories().await.unwrap()[0].clone();
    app.engine.save_bookmark("", "https://example.com", category.id).await;
    let bookmark = app.engine.categories_with_bookmarks().await.unwrap()[0].bookmarks[0].clone();

    screen.start_edit_category(&category);
    screen.start_edit_bookmark(&bookmark);
    screen.dismiss_dialogs();

    assert!(!screen.category_dialog().is_open());
    assert!(!screen.bookmark_dialog().is_open());
}
