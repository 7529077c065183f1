//! End-to-end behaviour of the tracker through the public API.

use std::sync::{Arc, Mutex};

use viewport_detector::{
    Branch, Callbacks, Card, CardChange, Document, GeometryMode, Page, Strategy, TrackerOptions,
    ViewportTracker,
};

type Log = Arc<Mutex<Vec<String>>>;

/// Tracker whose callbacks append `before:i` / `after:i` to a shared log and
/// veto `veto` if given.
fn logged(
    page: &mut Page,
    options: TrackerOptions,
    veto: Option<usize>,
) -> (ViewportTracker<Page, Callbacks<usize>>, Log) {
    let log: Log = Arc::default();
    let before = Arc::clone(&log);
    let after = Arc::clone(&log);
    let callbacks = Callbacks::new()
        .on_before_change(move |c: &CardChange<'_, usize>| {
            before.lock().unwrap().push(format!("before:{}", c.index));
            Some(c.index) != veto
        })
        .on_after_change(move |c: &CardChange<'_, usize>| {
            after.lock().unwrap().push(format!("after:{}", c.index));
        });
    let tracker = ViewportTracker::create(page, options, callbacks).unwrap();
    (tracker, log)
}

fn example_page() -> Page {
    Page::stacked(5, 100.0, 0.0, 300.0).with_trailing_space(400.0)
}

fn marked(page: &Page) -> Vec<usize> {
    page.cards
        .iter()
        .enumerate()
        .filter(|(_, c)| c.has_class("active-card"))
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn single_active_card_after_every_pass() {
    for strategy in Strategy::ALL {
        for geometry in [GeometryMode::Cached, GeometryMode::PerPass] {
            let mut page = Page::stacked(9, 70.0, 15.0, 240.0).with_trailing_space(120.0);
            let options = TrackerOptions {
                strategy: *strategy,
                geometry,
                ..TrackerOptions::default()
            };
            let (mut tracker, _) = logged(&mut page, options, None);
            let max = page.max_scroll();
            let mut offsets: Vec<f64> = (0..=40).map(|i| max * f64::from(i) / 40.0).collect();
            offsets.extend(offsets.clone().into_iter().rev());
            for offset in offsets {
                page.scroll_to(offset);
                tracker.listen(&mut page);
                assert_eq!(marked(&page).len(), 1, "{strategy} {geometry:?} @ {offset}");
                assert_eq!(tracker.markers().active_count(), 1);
            }
        }
    }
}

#[test]
fn top_boundary_activates_first_without_spurious_notifications() {
    let mut page = example_page();
    let (mut tracker, log) = logged(&mut page, TrackerOptions::default(), None);
    page.scroll_to(400.0);
    tracker.listen(&mut page);
    page.scroll_to(0.0);
    assert_eq!(tracker.listen(&mut page).branch, Branch::Top);
    assert_eq!(tracker.active_index(), Some(0));
    let len = log.lock().unwrap().len();
    tracker.listen(&mut page);
    assert_eq!(log.lock().unwrap().len(), len);
}

#[test]
fn bottom_boundary_activates_last() {
    let mut page = example_page();
    let (mut tracker, log) = logged(&mut page, TrackerOptions::default(), None);
    page.scroll_to(page.max_scroll());
    assert_eq!(tracker.listen(&mut page).branch, Branch::Bottom);
    assert_eq!(tracker.active_index(), Some(4));
    assert_eq!(*log.lock().unwrap(), vec!["before:4", "after:4"]);
}

#[test]
fn vetoed_change_leaves_everything_untouched() {
    let mut page = example_page();
    let (mut tracker, log) = logged(&mut page, TrackerOptions::default(), Some(3));
    tracker.listen(&mut page);
    let before_markers = marked(&page);

    page.scroll_to(250.0);
    let out = tracker.listen(&mut page);
    assert_eq!(out.vetoed, Some(3));
    assert_eq!(marked(&page), before_markers);
    assert_eq!(tracker.active_index(), Some(0));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["before:0", "after:0", "before:3"]
    );
}

#[test]
fn larger_sensitivity_never_shrinks_the_visible_set() {
    let mut page = Page::stacked(8, 90.0, 10.0, 260.0).with_trailing_space(50.0);
    for offset in [15.0, 140.0, 333.0, 410.0] {
        page.scroll_to(offset);
        let mut prev = 0;
        for sensitivity in [0.0, 0.1, 0.2, 0.5, 1.0] {
            let options = TrackerOptions {
                sensitivity,
                ..TrackerOptions::default()
            };
            let (tracker, _) = logged(&mut page, options, None);
            let handles = page.query(&"li".parse().unwrap());
            let visible = handles
                .iter()
                .filter(|h| tracker.is_in_viewport(&page, h))
                .count();
            assert!(visible >= prev, "offset {offset} sensitivity {sensitivity}");
            prev = visible;
        }
    }
}

#[test]
fn repeated_listen_is_idempotent() {
    let mut page = example_page();
    let (mut tracker, log) = logged(&mut page, TrackerOptions::default(), None);
    for offset in [0.0, 250.0, 600.0, 130.0] {
        page.scroll_to(offset);
        tracker.listen(&mut page);
        let markers = marked(&page);
        let len = log.lock().unwrap().len();
        let out = tracker.listen(&mut page);
        assert_eq!(out.changed, None, "offset {offset}");
        assert_eq!(marked(&page), markers);
        assert_eq!(log.lock().unwrap().len(), len);
    }
}

#[test]
fn worked_example_through_public_api() {
    let mut page = example_page();
    let (mut tracker, log) = logged(&mut page, TrackerOptions::default(), None);
    assert_eq!(tracker.threshold(), 20.0);
    tracker.listen(&mut page);
    assert_eq!(tracker.active_index(), Some(0));
    page.scroll_to(250.0);
    tracker.listen(&mut page);
    assert_eq!(tracker.active_index(), Some(3));
    assert_eq!(marked(&page), vec![3]);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["before:0", "after:0", "before:3", "after:3"]
    );
}

#[test]
fn carousel_boundary_wins_repair() {
    let mut page = Page::new(200.0);
    for i in 0..4 {
        let mut card = Card::new("li", format!("slide {i}"), 0.0, 100.0);
        if i == 2 {
            card = card.with_class("slick-current");
        }
        page.push_stacked(card, 0.0);
    }
    let options = TrackerOptions {
        boundary_selector: Some(".slick-current".into()),
        ..TrackerOptions::default()
    };
    let (mut tracker, _) = logged(&mut page, options, None);
    tracker.listen(&mut page);
    page.cards[3].add_class("active-card");
    let out = tracker.listen(&mut page);
    assert_eq!(out.repaired, Some(2));
    assert_eq!(marked(&page), vec![2]);
}

#[test]
fn single_marker_survives_host_reordering() {
    let mut page = example_page();
    let (mut tracker, _) = logged(&mut page, TrackerOptions::default(), None);
    tracker.listen(&mut page);

    page.insert_stacked(0, Card::new("li", "prepended", 0.0, 100.0), 0.0);
    tracker.listen(&mut page);
    assert_eq!(marked(&page), vec![0]);

    page.scroll_to(250.0);
    tracker.listen(&mut page);
    assert_eq!(marked(&page), vec![3]);

    // Swap the active card with an earlier one; positions travel with cards.
    page.cards.swap(1, 3);
    assert_eq!(marked(&page), vec![1]);
    page.scroll_to(450.0);
    tracker.listen(&mut page);
    assert_eq!(marked(&page), vec![5]);
    assert_eq!(tracker.active_index(), Some(5));
}
