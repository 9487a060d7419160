use crate::features::world::SiteWorld;
use cucumber::{given, then, when};
use std::time::Duration;
use termsite_core::render::AnchorNavigator;

#[given(regex = r"^the FAQ items (.+)$")]
async fn given_items(world: &mut SiteWorld, list: String) {
    let ids: Vec<String> =
        list.split(',').map(|s| s.trim().trim_matches('"').to_string()).collect();
    println!("❓ FAQ items {:?}", ids);
    world.navigator = AnchorNavigator::new(ids);
    world.scrolls.clear();
}

#[given(expr = "the page header is {int} pixels tall")]
async fn given_header(world: &mut SiteWorld, height: u32) {
    world.layout.header = Some(height as f64);
}

#[given(expr = "the item {string} sits {int} pixels from the top while scrolled {int}")]
async fn given_item_position(world: &mut SiteWorld, id: String, top: u32, scroll_y: u32) {
    world.layout.tops.insert(id, top as f64);
    world.layout.scroll_y = scroll_y as f64;
}

#[when(expr = "the FAQ page loads with {string}")]
async fn when_page_loads(world: &mut SiteWorld, hash: String) {
    world.navigator.on_load(&hash);
}

#[when(expr = "the fragment changes to {string}")]
async fn when_hash_changes(world: &mut SiteWorld, hash: String) {
    world.navigator.on_hash_change(&hash);
}

#[when(expr = "{int} milliseconds pass")]
async fn when_time_passes(world: &mut SiteWorld, ms: u64) {
    let scrolls = world.navigator.advance(Duration::from_millis(ms), &world.layout);
    world.scrolls.extend(scrolls);
}

#[then(expr = "the item {string} is highlighted")]
async fn then_highlighted(world: &mut SiteWorld, id: String) {
    assert!(world.navigator.is_highlighted(&id));
}

#[then(expr = "no item is highlighted")]
async fn then_nothing_highlighted(world: &mut SiteWorld) {
    assert_eq!(world.navigator.highlighted().count(), 0);
}

#[then(expr = "the page scrolled smoothly to {int}")]
async fn then_scrolled(world: &mut SiteWorld, top: i64) {
    let last = world.scrolls.last().expect("no scroll happened");
    assert!((last.top - top as f64).abs() < 1e-9, "{:?}", last);
    assert!(last.smooth);
}

#[then(expr = "the page did not scroll")]
async fn then_not_scrolled(world: &mut SiteWorld) {
    assert!(world.scrolls.is_empty(), "{:?}", world.scrolls);
}
