//! Catalog feed scenarios: page growth, exhaustion, caching, filter resets.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use clementine_integration_tests::{FakeBackend, product, product_in_category};
use clementine_storefront::catalog::{
    CatalogFeed, CategoryFilter, FilterKey, PAGE_SIZE, PageLoad,
};

fn catalog_of(n: usize) -> Vec<clementine_core::Product> {
    (0..n)
        .map(|i| product(&format!("p{i}"), &format!("Product {i}"), 1000, 10))
        .collect()
}

#[tokio::test]
async fn twenty_five_products_paginate_as_12_12_1() {
    let backend = Arc::new(FakeBackend::with_products(catalog_of(25)));
    let feed = CatalogFeed::new(backend);

    assert_eq!(
        feed.load_next_page().await.expect("page 0"),
        PageLoad::Appended { count: 12 }
    );
    assert!(feed.has_more());

    assert_eq!(
        feed.load_next_page().await.expect("page 1"),
        PageLoad::Appended { count: 12 }
    );
    assert!(feed.has_more());

    assert_eq!(
        feed.load_next_page().await.expect("page 2"),
        PageLoad::Appended { count: 1 }
    );
    assert!(!feed.has_more());
    assert_eq!(feed.total(), 25);

    // Exhausted feeds skip further loads.
    assert_eq!(feed.load_next_page().await.expect("skip"), PageLoad::Skipped);

    let ids: HashSet<_> = feed.products().into_iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 25, "no duplicates across pages");
}

#[tokio::test]
async fn full_page_at_exact_boundary_reports_more_until_empty_page() {
    // 24 products: pages of [12, 12], then an empty page flips has_more.
    let backend = Arc::new(FakeBackend::with_products(catalog_of(24)));
    let feed = CatalogFeed::new(backend);

    feed.load_next_page().await.expect("page 0");
    feed.load_next_page().await.expect("page 1");
    assert!(feed.has_more(), "boundary page of exactly {PAGE_SIZE} keeps has_more");

    assert_eq!(
        feed.load_next_page().await.expect("page 2"),
        PageLoad::Appended { count: 0 }
    );
    assert!(!feed.has_more());
}

#[tokio::test]
async fn fresh_pages_are_served_from_cache() {
    let backend = Arc::new(FakeBackend::with_products(catalog_of(5)));
    let feed = CatalogFeed::new(backend.clone());

    feed.load_next_page().await.expect("initial load");
    assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);

    // Flip away and back within the freshness window: the re-mounted filter
    // reuses the cached page instead of re-fetching.
    feed.set_filter(FilterKey::new("bowl", CategoryFilter::All));
    feed.set_filter(FilterKey::all());
    feed.load_next_page().await.expect("reload");

    assert_eq!(
        backend.list_calls.load(Ordering::SeqCst),
        1,
        "cached page is reused without a backend call"
    );
    assert_eq!(feed.products().len(), 5);
}

#[tokio::test]
async fn changing_filter_discards_accumulated_pages() {
    let mut products = catalog_of(13);
    products.push(product_in_category("c1", "Ceramic vase", "ceramics"));
    let backend = Arc::new(FakeBackend::with_products(products));
    let feed = CatalogFeed::new(backend);

    feed.load_next_page().await.expect("page 0");
    assert_eq!(feed.products().len(), 12);

    feed.set_filter(FilterKey::new(
        "",
        CategoryFilter::Category(clementine_core::CategoryId::new("ceramics")),
    ));
    assert!(feed.products().is_empty(), "filter change clears the list");
    assert!(feed.has_more());

    feed.load_next_page().await.expect("filtered page");
    let names: Vec<String> = feed.products().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Ceramic vase".to_string()]);
    assert_eq!(feed.total(), 1);
}

#[tokio::test]
async fn setting_same_filter_is_a_noop() {
    let backend = Arc::new(FakeBackend::with_products(catalog_of(3)));
    let feed = CatalogFeed::new(backend);

    feed.load_next_page().await.expect("page 0");
    let before = feed.products();

    feed.set_filter(FilterKey::all());
    assert_eq!(feed.products(), before);
}

#[tokio::test]
async fn search_filter_narrows_results() {
    let backend = Arc::new(FakeBackend::with_products(vec![
        product("p1", "Ceramic mug", 1000, 5),
        product("p2", "Glass bowl", 1200, 5),
        product("p3", "Ceramic bowl", 1400, 5),
    ]));
    let feed = CatalogFeed::new(backend);

    feed.set_filter(FilterKey::new("ceramic", CategoryFilter::All));
    feed.load_next_page().await.expect("search page");

    assert_eq!(feed.total(), 2);
    assert!(feed.products().iter().all(|p| p.name.contains("Ceramic")));
}

#[tokio::test]
async fn failed_fetch_is_retryable_and_keeps_loaded_pages() {
    let backend = Arc::new(FakeBackend::with_products(catalog_of(25)));
    let feed = CatalogFeed::new(backend.clone());

    feed.load_next_page().await.expect("page 0");
    assert_eq!(feed.products().len(), 12);

    backend.fail_list_products.store(true, Ordering::SeqCst);
    assert!(feed.load_next_page().await.is_err());
    assert_eq!(feed.products().len(), 12, "loaded pages survive a failure");
    assert!(feed.last_error().is_some());
    assert!(!feed.is_loading(), "a failed fetch releases the loading gate");

    backend.fail_list_products.store(false, Ordering::SeqCst);
    assert_eq!(
        feed.load_next_page().await.expect("retry"),
        PageLoad::Appended { count: 12 }
    );
    assert!(feed.last_error().is_none());
    assert_eq!(feed.products().len(), 24);
}
