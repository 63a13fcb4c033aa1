mod common;

use common::FakeSurface;
use std::time::Duration;
use trawl_core::expander::TruncationExpander;
use trawl_core::wait::WaitPolicy;

const MORE: &str = "button[aria-label='Ver mais']";

fn expander() -> TruncationExpander {
    let poll = Duration::from_millis(250);
    TruncationExpander {
        selector: MORE.to_string(),
        discovery_wait: WaitPolicy::new(Duration::from_secs(5), poll),
        clickable_wait: WaitPolicy::new(Duration::from_secs(2), poll),
        click_delay: Duration::from_millis(300),
    }
}

#[tokio::test]
async fn clicks_every_button_and_reveals_text() {
    let surface = FakeSurface::new();
    let probe = surface.probe();
    let text_a = surface.add(None, "span.wiI7pd", "Bom lugar…");
    let more_a = surface.add(None, MORE, "Mais");
    surface.reveals(more_a, text_a, "Bom lugar, voltaria com certeza.");
    let text_b = surface.add(None, "span.wiI7pd", "Atendimento…");
    let more_b = surface.add(None, MORE, "Mais");
    surface.reveals(more_b, text_b, "Atendimento demorado no sábado.");

    let clicked = expander().expand(&surface, None).await;

    assert_eq!(clicked, 2);
    assert_eq!(probe.clicks(), vec![more_a, more_b]);
    assert_eq!(probe.text_of(text_a), "Bom lugar, voltaria com certeza.");
    assert_eq!(probe.text_of(text_b), "Atendimento demorado no sábado.");
    // one settle delay per successful click
    assert_eq!(probe.clock(), Duration::from_millis(600));
}

#[tokio::test]
async fn failing_buttons_are_skipped() {
    let surface = FakeSurface::new();
    let probe = surface.probe();

    let never_ready = surface.add(None, MORE, "Mais");
    surface.interactable_at(never_ready, Duration::from_secs(60));
    let ok = surface.add(None, MORE, "Mais");
    let rejects = surface.add(None, MORE, "Mais");
    surface.fail_clicks(rejects);
    let late_ok = surface.add(None, MORE, "Mais");
    surface.interactable_at(late_ok, Duration::from_secs(3));

    let clicked = expander().expand(&surface, None).await;

    assert_eq!(clicked, 2);
    assert_eq!(probe.clicks(), vec![ok, late_ok]);
}

#[tokio::test]
async fn no_buttons_is_normal() {
    let surface = FakeSurface::new();
    let probe = surface.probe();
    surface.add(None, "span.wiI7pd", "Curto e direto.");

    let clicked = expander().expand(&surface, None).await;

    assert_eq!(clicked, 0);
    assert!(probe.clicks().is_empty());
    assert_eq!(probe.clock(), Duration::from_secs(5));
}

#[tokio::test]
async fn only_buttons_under_root_are_clicked() {
    let surface = FakeSurface::new();
    let probe = surface.probe();
    let outside = surface.add(None, MORE, "Mais");
    let root = surface.add(None, "div.panel", "");
    let inside = surface.add(Some(root), MORE, "Mais");

    let clicked = expander().expand(&surface, Some(&root)).await;

    assert_eq!(clicked, 1);
    assert_eq!(probe.clicks(), vec![inside]);
    assert!(!probe.clicks().contains(&outside));
}
