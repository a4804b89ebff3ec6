//! Property-based tests for bookmark url uniqueness.
//!
//! For any valid url, a second save of the same url reports a duplicate and
//! leaves exactly one stored row.

use std::sync::Arc;

use markshelf::managers::BookmarkEngine;
use markshelf::storage::SqliteStore;
use markshelf::types::errors::SaveBookmarkResult;
use proptest::prelude::*;

/// Strategy for generating valid URL strings.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Titles, including blank ones that fall back to the url.
fn arb_title() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-zA-Z][a-zA-Z0-9 ]{0,30}"]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn second_save_of_same_url_is_duplicate(
        url in arb_url(),
        first_title in arb_title(),
        second_title in arb_title(),
        into_other_category in any::<bool>(),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build runtime");
        rt.block_on(async {
            let engine = BookmarkEngine::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
            let first_category = engine.categories().await.unwrap()[0].id;
            let second_category = if into_other_category {
                engine.create_category("Other").await.unwrap()
            } else {
                first_category
            };

            prop_assert_eq!(
                engine.save_bookmark(&first_title, &url, first_category).await,
                SaveBookmarkResult::Success
            );
            prop_assert!(engine.is_bookmark_registered(&url).await.unwrap());
            prop_assert_eq!(
                engine.save_bookmark(&second_title, &url, second_category).await,
                SaveBookmarkResult::Duplicate
            );

            let stored: Vec<_> = engine
                .categories_with_bookmarks()
                .await
                .unwrap()
                .into_iter()
                .flat_map(|c| c.bookmarks)
                .filter(|b| b.url == url)
                .collect();
            prop_assert_eq!(stored.len(), 1);
            let expected_title = if first_title.trim().is_empty() { url.clone() } else { first_title.clone() };
            prop_assert_eq!(&stored[0].title, &expected_title);
            Ok(())
        })?;
    }
}
