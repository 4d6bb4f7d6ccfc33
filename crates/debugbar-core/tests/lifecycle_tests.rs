//! # Lifecycle Tests
//!
//! End-to-end render cycles through the public API: catalog, hooks,
//! orchestrator and the rendered markup.

use debugbar_core::{
    AssetKind, DebugBar, DisplayState, EventLog, InitContext, LifecycleStage, Markup,
    OverlayConfig, OverlayError, Panel, PanelBase, PanelCatalog, PanelContext, PanelError,
    PanelId, PanelPhase, RequestInfo, RuntimeFacts, StatusEntry,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// SCRIPTED PANEL
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Failure {
    None,
    Init,
    Prerender,
    Render,
}

struct Scripted {
    name: &'static str,
    base: PanelBase,
    show: bool,
    failure: Failure,
    inits: Arc<AtomicUsize>,
    prerenders: Arc<AtomicUsize>,
}

impl Scripted {
    fn boxed(name: &'static str, failure: Failure) -> Box<dyn Panel> {
        Box::new(Scripted {
            name,
            base: PanelBase::new(),
            show: true,
            failure,
            inits: Arc::new(AtomicUsize::new(0)),
            prerenders: Arc::new(AtomicUsize::new(0)),
        })
    }
}

impl Panel for Scripted {
    fn id(&self) -> PanelId {
        PanelId::new(self.name)
    }

    fn init(&mut self, _ctx: &mut InitContext<'_>) -> Result<(), PanelError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        if self.failure == Failure::Init {
            return Err(PanelError::new("init exploded"));
        }
        self.base.set_title(self.name);
        Ok(())
    }

    fn title(&self) -> &str {
        self.base.title()
    }

    fn prerender(&mut self, _ctx: &PanelContext<'_>) -> Result<(), PanelError> {
        self.prerenders.fetch_add(1, Ordering::SeqCst);
        if self.failure == Failure::Prerender {
            return Err(PanelError::new("prerender exploded"));
        }
        self.base.set_visible(self.show);
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn render(&self, out: &mut Markup) -> Result<(), PanelError> {
        if self.failure == Failure::Render {
            return Err(PanelError::new("render <exploded>"));
        }
        out.raw("<p>").text(self.name).raw("</p>");
        Ok(())
    }
}

/// A panel shipped outside the catalog, injected through the panel hook.
struct ThirdParty {
    base: PanelBase,
    inits: Arc<AtomicUsize>,
}

impl Panel for ThirdParty {
    fn init(&mut self, ctx: &mut InitContext<'_>) -> Result<(), PanelError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        self.base.set_title("Third Party");
        ctx.assets
            .enqueue_style("third-party", "/plugins/third-party.css", &[], "1.0");
        Ok(())
    }

    fn title(&self) -> &str {
        self.base.title()
    }

    fn prerender(&mut self, _ctx: &PanelContext<'_>) -> Result<(), PanelError> {
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn render(&self, out: &mut Markup) -> Result<(), PanelError> {
        out.raw("<p>third party</p>");
        Ok(())
    }
}

struct Setup {
    catalog: PanelCatalog,
    inits: Arc<AtomicUsize>,
    prerenders: Arc<AtomicUsize>,
}

impl Setup {
    fn new() -> Self {
        Self {
            catalog: PanelCatalog::empty(),
            inits: Arc::new(AtomicUsize::new(0)),
            prerenders: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn inits(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.inits)
    }

    fn panel(mut self, name: &'static str, show: bool, failure: Failure) -> Self {
        let inits = Arc::clone(&self.inits);
        let prerenders = Arc::clone(&self.prerenders);
        self.catalog.register(move || {
            Box::new(Scripted {
                name,
                base: PanelBase::new(),
                show,
                failure,
                inits: Arc::clone(&inits),
                prerenders: Arc::clone(&prerenders),
            })
        });
        self
    }

    fn visible(self, name: &'static str) -> Self {
        self.panel(name, true, Failure::None)
    }

    fn hidden(self, name: &'static str) -> Self {
        self.panel(name, false, Failure::None)
    }

    fn bar(self, config: OverlayConfig) -> (DebugBar, Arc<AtomicUsize>) {
        let bar = DebugBar::with_catalog(config, self.catalog).expect("bar");
        (bar, self.prerenders)
    }
}

fn facts() -> RuntimeFacts {
    RuntimeFacts {
        runtime_version: "1.85.0".to_string(),
        store: None,
        peak_memory_bytes: Some(2048),
    }
}

fn request() -> RequestInfo {
    RequestInfo::new("GET", "/")
}

fn nav_ids(body: &str) -> Vec<String> {
    body.match_indices("<li><a id=\"debug-menu-link-")
        .map(|(start, marker)| {
            let rest = &body[start + marker.len()..];
            rest.split('"').next().unwrap_or_default().to_string()
        })
        .collect()
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn all_visible_keeps_registration_order() {
    let (bar, _) = Setup::new()
        .visible("A")
        .visible("B")
        .visible("C")
        .bar(OverlayConfig::default());

    let overlay = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .expect("render");

    assert_eq!(nav_ids(&overlay.body), vec!["A", "B", "C"]);
    assert!(overlay.body.contains(
        r##"<a id="debug-menu-link-A" class="debug-menu-link current" href="#debug-menu-target-A">A</a>"##
    ));
    assert!(overlay.body.contains(
        r##"<a id="debug-menu-link-B" class="debug-menu-link" href="#debug-menu-target-B">B</a>"##
    ));
    assert!(overlay.body.contains(
        r#"<div id="debug-menu-target-A" class="debug-menu-target" style="display: block">"#
    ));
    assert!(overlay
        .body
        .contains(r#"<div id="debug-menu-target-C" class="debug-menu-target">"#));

    let a = overlay.body.find("debug-menu-target-A\" class").expect("A region");
    let c = overlay.body.find("debug-menu-target-C\" class").expect("C region");
    assert!(a < c);
    assert_eq!(overlay.panels.len(), 3);
}

#[test]
fn middle_hidden_is_dropped() {
    let (bar, prerenders) = Setup::new()
        .visible("A")
        .hidden("B")
        .visible("C")
        .bar(OverlayConfig::default());

    let overlay = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .expect("render");

    assert_eq!(nav_ids(&overlay.body), vec!["A", "C"]);
    assert!(overlay.body.contains("debug-menu-link current\" href=\"#debug-menu-target-A\""));
    assert!(!overlay.body.contains("debug-menu-target-B"));
    assert_eq!(prerenders.load(Ordering::SeqCst), 3);
}

#[test]
fn hook_reorders_panels() {
    let (mut bar, _) = Setup::new()
        .visible("A")
        .visible("B")
        .bar(OverlayConfig::default());
    bar.hooks_mut().panels.add(|mut panels| {
        panels.reverse();
        panels
    });

    let overlay = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .expect("render");

    assert_eq!(nav_ids(&overlay.body), vec!["B", "A"]);
    assert!(overlay.body.contains("debug-menu-link current\" href=\"#debug-menu-target-B\""));
}

#[test]
fn hook_can_remove_panels() {
    let (mut bar, prerenders) = Setup::new()
        .visible("A")
        .visible("B")
        .bar(OverlayConfig::default());
    bar.hooks_mut().panels.add(|mut panels| {
        panels.retain(|p| p.id().as_str() != "A");
        panels
    });

    let overlay = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .expect("render");
    assert_eq!(nav_ids(&overlay.body), vec!["B"]);
    // Removed before finalize, so never prerendered.
    assert_eq!(prerenders.load(Ordering::SeqCst), 1);
}

#[test]
fn hook_injected_panel_is_initialized() {
    let setup = Setup::new().visible("A");
    let catalog_inits = setup.inits();
    let (mut bar, _) = setup.bar(OverlayConfig::default());

    let injected_inits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&injected_inits);
    bar.hooks_mut().panels.add(move |mut panels| {
        panels.push(Box::new(ThirdParty {
            base: PanelBase::new(),
            inits: Arc::clone(&counter),
        }));
        panels
    });

    let overlay = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .expect("render");

    let titles: Vec<_> = overlay.panels.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "Third Party"]);
    assert!(overlay.body.contains(
        r##"<a id="debug-menu-link-ThirdParty" class="debug-menu-link" href="#debug-menu-target-ThirdParty">Third Party</a>"##
    ));
    assert!(overlay.assets.get(AssetKind::Style, "third-party").is_some());
    assert!(overlay.assets.render_head().contains("id=\"third-party-css\""));

    // Each panel was initialized exactly once.
    assert_eq!(injected_inits.load(Ordering::SeqCst), 1);
    assert_eq!(catalog_inits.load(Ordering::SeqCst), 1);
}

#[test]
fn hook_injected_init_failure_aborts() {
    let (mut bar, prerenders) = Setup::new().visible("A").bar(OverlayConfig::default());
    bar.hooks_mut().panels.add(|mut panels| {
        panels.insert(0, Scripted::boxed("Injected", Failure::Init));
        panels
    });

    let mut orchestrator = bar.orchestrator();
    orchestrator.populate().expect("populate");
    let err = orchestrator
        .filter(&request(), &EventLog::new())
        .err()
        .expect("abort");
    assert_eq!(
        err.to_string(),
        "Panel Injected failed during init: init exploded"
    );
    assert_eq!(orchestrator.stage(), LifecycleStage::Aborted);
    assert_eq!(prerenders.load(Ordering::SeqCst), 0);
}

#[test]
fn gate_flag_controls_body_classes() {
    let (bar, _) = Setup::new().visible("A").bar(OverlayConfig::default());

    let flagged = RequestInfo::new("GET", "/").with_query("debug-bar");
    let overlay = bar
        .render_request(&flagged, &EventLog::new(), &facts())
        .expect("render");
    assert_eq!(overlay.display, DisplayState::Expanded);
    assert!(overlay.body_classes.contains(&"debug-bar-visible".to_string()));

    let overlay = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .expect("render");
    assert_eq!(overlay.display, DisplayState::Collapsed);
    assert_eq!(overlay.body_classes, vec!["debug-bar-maximized"]);
}

#[test]
fn zero_panels_render_nothing() {
    let (bar, _) = Setup::new().bar(OverlayConfig::default());
    let overlay = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .expect("render");
    assert!(overlay.is_empty());
    assert!(overlay.statuses.is_empty());
    assert!(overlay.panels.is_empty());
}

#[test]
fn all_invisible_render_nothing_but_all_prerendered() {
    let (bar, prerenders) = Setup::new()
        .hidden("A")
        .hidden("B")
        .bar(OverlayConfig::default());
    let overlay = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .expect("render");
    assert!(overlay.is_empty());
    assert_eq!(prerenders.load(Ordering::SeqCst), 2);
}

#[test]
fn status_strip_and_trailing_markup() {
    let (mut bar, _) = Setup::new().visible("A").bar(OverlayConfig::default());
    bar.hooks_mut().statuses.add(|mut entries| {
        entries.push(StatusEntry::title_only("cache", "Cache warm"));
        entries
    });
    bar.hooks_mut().trailing.add(|out| {
        out.raw("<div id=\"extra\"></div>");
    });

    let overlay = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .expect("render");

    let slugs: Vec<_> = overlay.statuses.iter().map(|s| s.slug.as_str()).collect();
    assert_eq!(slugs, vec!["rust", "memory", "warning", "cache"]);
    assert!(overlay.body.contains(
        r#"<div id="debug-status-rust" class="debug-status"><div class="debug-status-title">Rust</div><div class="debug-status-data">1.85.0</div></div>"#
    ));
    assert!(overlay.body.contains(
        r#"<div id="debug-status-cache" class="debug-status"><div class="debug-status-title">Cache warm</div></div>"#
    ));
    assert!(overlay.body.contains("2,048 bytes"));

    let targets_end = overlay.body.rfind("debug-menu-target-A").expect("region");
    let extra = overlay.body.find("<div id=\"extra\">").expect("trailing");
    assert!(extra > targets_end);
    assert!(overlay.body.ends_with("<div id=\"extra\"></div></div>\n"));
}

// =============================================================================
// LIFECYCLE ORDER
// =============================================================================

#[test]
fn steps_out_of_order_are_rejected() {
    let (bar, _) = Setup::new().visible("A").bar(OverlayConfig::default());
    let events = EventLog::new();
    let mut orchestrator = bar.orchestrator();

    let err = orchestrator.render(&request(), &facts()).err().expect("render first");
    assert!(matches!(
        err,
        OverlayError::OutOfOrder {
            expected: LifecycleStage::Filtered,
            found: LifecycleStage::Uninitialized,
        }
    ));

    orchestrator.populate().expect("populate");
    assert!(orchestrator.populate().is_err());
    orchestrator.filter(&request(), &events).expect("filter");
    assert!(orchestrator.filter(&request(), &events).is_err());
    orchestrator.render(&request(), &facts()).expect("render");
    assert_eq!(orchestrator.stage(), LifecycleStage::Rendered);
    assert!(orchestrator.render(&request(), &facts()).is_err());
}

#[test]
fn late_registration_joins_before_filter() {
    let (bar, prerenders) = Setup::new().visible("A").bar(OverlayConfig::default());
    let mut orchestrator = bar.orchestrator();
    orchestrator.populate().expect("populate");
    orchestrator
        .register(Box::new(Scripted {
            name: "Late",
            base: PanelBase::new(),
            show: true,
            failure: Failure::None,
            inits: Arc::new(AtomicUsize::new(0)),
            prerenders: Arc::clone(&prerenders),
        }))
        .expect("register");

    let visible = orchestrator.filter(&request(), &EventLog::new()).expect("filter");
    assert_eq!(visible, 2);
    assert_eq!(orchestrator.prerendered(), 2);
    assert_eq!(
        orchestrator.visible_ids(),
        vec![PanelId::new("A"), PanelId::new("Late")]
    );

    let overlay = orchestrator.render(&request(), &facts()).expect("render");
    let titles: Vec<_> = overlay.panels.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "Late"]);
    orchestrator = bar.orchestrator();
    orchestrator.populate().expect("populate");

    let err = orchestrator
        .register(Box::new(Scripted {
            name: "TooLate",
            base: PanelBase::new(),
            show: true,
            failure: Failure::None,
            inits: Arc::new(AtomicUsize::new(0)),
            prerenders,
        }))
        .err()
        .expect("registration after filter");
    assert!(matches!(err, OverlayError::OutOfOrder { .. }));
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn init_failure_aborts_populate() {
    let setup = Setup::new()
        .visible("A")
        .panel("Broken", true, Failure::Init)
        .visible("C");
    let inits = setup.inits();
    let (bar, prerenders) = setup.bar(OverlayConfig::default());

    let mut orchestrator = bar.orchestrator();
    let err = orchestrator.populate().err().expect("abort");
    assert!(matches!(
        err,
        OverlayError::Panel {
            phase: PanelPhase::Init,
            ..
        }
    ));
    assert_eq!(orchestrator.stage(), LifecycleStage::Aborted);
    // C was never constructed.
    assert_eq!(inits.load(Ordering::SeqCst), 2);

    let err = orchestrator
        .filter(&request(), &EventLog::new())
        .err()
        .expect("out of order");
    assert!(matches!(
        err,
        OverlayError::OutOfOrder {
            expected: LifecycleStage::Populated,
            found: LifecycleStage::Aborted,
        }
    ));
    assert_eq!(prerenders.load(Ordering::SeqCst), 0);
}

#[test]
fn late_registration_init_failure_aborts() {
    let (bar, _) = Setup::new().visible("A").bar(OverlayConfig::default());
    let mut orchestrator = bar.orchestrator();
    orchestrator.populate().expect("populate");

    let err = orchestrator
        .register(Scripted::boxed("Late", Failure::Init))
        .err()
        .expect("abort");
    assert!(matches!(
        err,
        OverlayError::Panel {
            phase: PanelPhase::Init,
            ..
        }
    ));
    assert_eq!(orchestrator.stage(), LifecycleStage::Aborted);
}

#[test]
fn prerender_failure_aborts_by_default() {
    let (bar, prerenders) = Setup::new()
        .visible("A")
        .panel("Broken", true, Failure::Prerender)
        .visible("C")
        .bar(OverlayConfig::default());

    let mut orchestrator = bar.orchestrator();
    orchestrator.populate().expect("populate");
    let err = orchestrator
        .filter(&request(), &EventLog::new())
        .err()
        .expect("abort");
    assert!(matches!(
        err,
        OverlayError::Panel {
            phase: PanelPhase::Prerender,
            ..
        }
    ));
    assert_eq!(orchestrator.stage(), LifecycleStage::Aborted);
    // C never ran.
    assert_eq!(prerenders.load(Ordering::SeqCst), 2);
    assert!(orchestrator.render(&request(), &facts()).is_err());
}

#[test]
fn render_failure_aborts_by_default() {
    let (bar, _) = Setup::new()
        .visible("A")
        .panel("Broken", true, Failure::Render)
        .bar(OverlayConfig::default());

    let err = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .err()
        .expect("abort");
    assert_eq!(
        err.to_string(),
        "Panel Broken failed during render: render <exploded>"
    );
}

#[test]
fn isolation_renders_placeholders() {
    let config = OverlayConfig {
        isolate_panel_failures: true,
        ..OverlayConfig::default()
    };
    let (bar, _) = Setup::new()
        .panel("EarlyBroken", true, Failure::Prerender)
        .visible("A")
        .panel("LateBroken", true, Failure::Render)
        .visible("C")
        .bar(config);

    let overlay = bar
        .render_request(&request(), &EventLog::new(), &facts())
        .expect("isolated render");

    assert_eq!(nav_ids(&overlay.body), vec!["EarlyBroken", "A", "LateBroken", "C"]);
    assert!(overlay.body.contains("<h3>Panel failed during prerender</h3><p>prerender exploded</p>"));
    assert!(overlay.body.contains("<h3>Panel failed during render</h3><p>render &lt;exploded&gt;</p>"));
    assert!(overlay.body.contains("<p>C</p>"));

    let failed: Vec<_> = overlay
        .panels
        .iter()
        .filter(|p| p.failed)
        .map(|p| p.id.to_string())
        .collect();
    assert_eq!(failed, vec!["EarlyBroken", "LateBroken"]);
}

// =============================================================================
// BUILT-IN PANELS
// =============================================================================

#[test]
fn builtin_panels_follow_event_log() {
    let bar = DebugBar::new(OverlayConfig::default()).expect("bar");
    let events = EventLog::new();
    events.cache_lookup("items", true);

    let overlay = bar
        .render_request(&request(), &events, &facts())
        .expect("render");

    let ids: Vec<_> = overlay.panels.iter().map(|p| p.id.to_string()).collect();
    assert_eq!(
        ids,
        vec!["QueriesPanel", "RequestPanel", "ObjectCachePanel", "JsErrorsPanel"]
    );
    assert!(overlay.body.contains(r#"<div id="debug-bar-js-error-count">0</div>"#));

    let head = overlay.assets.render_head();
    assert!(head.contains("debug-bar-css"));
    assert!(head.contains("debug-bar-js-js"));
    assert!(overlay.assets.render_footer().contains(r#"<script id="debug-bar-js""#));
}
