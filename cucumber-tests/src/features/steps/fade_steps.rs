use crate::features::world::{parse_numbers, SiteWorld};
use cucumber::{given, then, when};
use termsite_core::fade::{FadeEngine, Phase, Viewport};

// Card top of a card pinned under the site header
const PINNED_TOP: f64 = 40.0;
const TOLERANCE: f64 = 1e-3;

#[given(expr = "a fade engine with sticky offset {string}")]
async fn given_engine(world: &mut SiteWorld, raw: String) {
    world.engine = FadeEngine::default().with_sticky_property(Some(&raw));
    world.frames.clear();
    println!("🎚️  Sticky offset {}px", world.engine.sticky_offset());
}

#[given(expr = "a viewport of {int} by {int}")]
async fn given_viewport(world: &mut SiteWorld, width: u32, height: u32) {
    world.viewport = Viewport::new(width as f64, height as f64);
}

#[when(regex = r#"^the sticky card "([^"]+)" passes coverages (.+)$"#)]
async fn when_sticky_card_scrolls(world: &mut SiteWorld, id: String, list: String) {
    world.scroll_card(&id, PINNED_TOP, &parse_numbers(&list));
}

#[when(regex = r#"^the card "([^"]+)" at top (\d+) passes coverages (.+)$"#)]
async fn when_card_scrolls(world: &mut SiteWorld, id: String, top: String, list: String) {
    let top: f64 = top.parse().expect("card top");
    world.scroll_card(&id, top, &parse_numbers(&list));
}

#[then(regex = r"^the opacities are (.+)$")]
async fn then_opacities(world: &mut SiteWorld, list: String) {
    let expected = parse_numbers(&list);
    let actual: Vec<f64> = world.frames.iter().map(|f| f.opacity).collect();
    assert_eq!(actual.len(), expected.len(), "frames: {:?}", actual);
    for (i, (a, e)) in actual.iter().zip(&expected).enumerate() {
        assert!((a - e).abs() < TOLERANCE, "frame {}: expected {}, got {}", i + 1, e, a);
    }
}

#[then(expr = "the last {int} opacities are {float}")]
async fn then_last_opacities(world: &mut SiteWorld, count: usize, expected: f64) {
    let tail = &world.frames[world.frames.len() - count..];
    for frame in tail {
        assert!((frame.opacity - expected).abs() < TOLERANCE, "{:?}", frame);
    }
}

#[then(expr = "the last opacity is above {float}")]
async fn then_last_above(world: &mut SiteWorld, floor: f64) {
    let last = world.frames.last().expect("no frames");
    assert!(last.opacity > floor, "{:?}", last);
}

#[then(expr = "the card is locked hidden")]
async fn then_locked(world: &mut SiteWorld) {
    let last = world.frames.last().expect("no frames");
    assert_eq!(last.phase, Phase::LockedHidden);
}

#[then(expr = "card actions are interactive in frame {int}")]
async fn then_interactive(world: &mut SiteWorld, frame: usize) {
    assert!(world.frames[frame - 1].interactive, "{:?}", world.frames[frame - 1]);
}

#[then(expr = "card actions are not interactive in frame {int}")]
async fn then_not_interactive(world: &mut SiteWorld, frame: usize) {
    assert!(!world.frames[frame - 1].interactive, "{:?}", world.frames[frame - 1]);
}
