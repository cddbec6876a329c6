use std::time::Duration;

use pagehand_config::TabsConfig;

use super::*;
use crate::driver::BrowserDriver;
use crate::testing::FakeBrowser;

const NAV: Duration = Duration::from_secs(30);

async fn manager_with(browser: &FakeBrowser, extra: usize) -> TabManager {
    let first = browser.new_page().await.unwrap();
    let mut manager = TabManager::new(first, TabsConfig::default());
    for i in 0..extra {
        let url = format!("https://site{}.test/", i + 1);
        manager
            .open(browser, Some(&url), Some(format!("tab{}", i + 1)), NAV)
            .await
            .unwrap();
    }
    manager
}

#[tokio::test]
async fn test_open_makes_new_tab_current() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 0).await;

    let index = manager
        .open(&browser, Some("https://example.com/"), None, NAV)
        .await
        .unwrap();

    assert_eq!(index, 1);
    assert_eq!(manager.count(), 2);
    assert_eq!(manager.current_index(), 1);
    assert_eq!(browser.page(1).with(|s| s.fronted), 1);
    assert_eq!(manager.history().len(), 1);
}

#[tokio::test]
async fn test_open_failure_leaves_tabs_unchanged() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 0).await;
    browser.fail_new_page();

    let result = manager.open(&browser, Some("https://example.com/"), None, NAV).await;

    assert!(matches!(result, Err(TabError::Driver(_))));
    assert_eq!(manager.count(), 1);
    assert_eq!(manager.current_index(), 0);
}

#[tokio::test]
async fn test_switch_out_of_range_keeps_current() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 2).await;
    manager.switch(1).await.unwrap();

    let result = manager.switch(3).await;

    assert!(matches!(result, Err(TabError::OutOfRange { index: 3, count: 3 })));
    assert_eq!(manager.current_index(), 1);
}

#[tokio::test]
async fn test_close_last_tab_refused() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 0).await;

    assert!(matches!(manager.close(&browser, None).await, Err(TabError::LastTab)));
    assert_eq!(manager.count(), 1);
    assert!(browser.closed().is_empty());
}

#[tokio::test]
async fn test_close_before_current_shifts_pointer() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 2).await;
    assert_eq!(manager.current_index(), 2);

    manager.close(&browser, Some(1)).await.unwrap();

    assert_eq!(manager.current_index(), 1);
    assert_eq!(manager.current_page().page_id(), "page-2");
    assert_eq!(manager.page(1).unwrap().page_id(), "page-2");
    assert_eq!(browser.closed(), vec!["page-1"]);
}

#[tokio::test]
async fn test_close_current_last_clamps() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 2).await;

    manager.close(&browser, None).await.unwrap();

    assert_eq!(manager.count(), 2);
    assert_eq!(manager.current_index(), 1);
    assert_eq!(manager.current_page().page_id(), "page-1");
}

#[tokio::test]
async fn test_close_after_current_keeps_pointer() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 2).await;
    manager.switch(0).await.unwrap();

    manager.close(&browser, Some(2)).await.unwrap();

    assert_eq!(manager.current_index(), 0);
    assert_eq!(manager.current_page().page_id(), "page-0");
}

#[tokio::test]
async fn test_next_tab_is_circular() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 3).await;
    manager.switch(1).await.unwrap();

    for _ in 0..manager.count() {
        manager.next().await.unwrap();
    }
    assert_eq!(manager.current_index(), 1);

    manager.switch(0).await.unwrap();
    assert_eq!(manager.previous().await.unwrap(), 3);
}

#[tokio::test]
async fn test_close_others_collapses_to_current() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 3).await;
    manager.switch(2).await.unwrap();

    let closed = manager.close_others(&browser).await;

    assert_eq!(closed, 3);
    assert_eq!(manager.count(), 1);
    assert_eq!(manager.current_index(), 0);
    assert_eq!(manager.current_page().page_id(), "page-2");
}

#[tokio::test]
async fn test_duplicate_tags_purpose() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 1).await;

    let index = manager.duplicate(&browser, Some(1), NAV).await.unwrap();

    let tabs = manager.list().await;
    assert_eq!(index, 2);
    assert_eq!(tabs[2].purpose.as_deref(), Some("duplicate_tab1"));
    assert_eq!(tabs[2].url, "https://site1.test/");
    assert!(tabs[2].is_current);
    assert!(!tabs[0].is_current);
}

#[tokio::test]
async fn test_context_recommends_new_tab_for_many_domains() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 0).await;
    for url in ["https://a.test/x", "https://b.test/", "https://c.test/", "https://a.test/y"] {
        manager.record_navigation(url);
    }

    let context = manager.navigation_context().await;

    assert!(context.should_open_new_tab);
    assert_eq!(context.recent_domains, vec!["a.test", "b.test", "c.test"]);
    assert_eq!(context.total_tabs, 1);
}

#[tokio::test]
async fn test_context_single_tab_two_domains() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 0).await;
    manager.record_navigation("https://a.test/");
    manager.record_navigation("https://b.test/");

    assert!(manager.navigation_context().await.should_open_new_tab);
}

#[tokio::test]
async fn test_context_adequate_organization() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 1).await;
    manager.record_navigation("https://site1.test/next");

    let context = manager.navigation_context().await;

    assert!(!context.should_open_new_tab);
    assert_eq!(context.current_domain.as_deref(), Some("site1.test"));
}

#[tokio::test]
async fn test_context_uses_recent_window_only() {
    let browser = FakeBrowser::new();
    let mut manager = manager_with(&browser, 1).await;
    for url in ["https://old1.test/", "https://old2.test/"] {
        manager.record_navigation(url);
    }
    for _ in 0..5 {
        manager.record_navigation("https://site1.test/");
    }

    let context = manager.navigation_context().await;

    assert_eq!(context.recent_domains, vec!["site1.test"]);
    assert!(!context.should_open_new_tab);
}
