use std::{collections::HashMap, sync::Arc, time::Duration};

use actors::actor_ref::ActorRef;
use async_trait::async_trait;
use model::{
    line::{LineGeometry, OverlayKind},
    location::Point,
    route::RouteSummary,
    stop::{StopFeature, StopLine},
    waypoint::WaypointInput,
};
use planner::{
    flow::{FlowState, START_OR_LOCATION_REQUIRED},
    layer::PopupLines,
    viewport::LOCATE_ZOOM,
    MapSession, Services, SessionEvent, SessionRef, UiCommand,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use transit_api::{
    wire::RouteSearch, ApiError, ApiResult, ComputedRoute, FixedLocation, Geocoder,
    RoutingEngine, StopSource, TransitBackend,
};
use utility::{geo::BoundingBox, id::Id};

fn p(latitude: f64, longitude: f64) -> Point {
    Point::new(latitude, longitude)
}

fn stop(id: &str, name: &str, point: Point) -> StopFeature {
    StopFeature {
        id: Id::from(id),
        name: name.to_owned(),
        point,
        code: None,
        direction: None,
    }
}

fn stops() -> Vec<StopFeature> {
    vec![
        stop("A", "Aksaray", p(41.00, 28.90)),
        stop("B", "Beyazıt", p(41.02, 28.95)),
        stop("C", "Cağaloğlu", p(41.01, 28.97)),
        stop("T", "Taksim", p(41.0369, 28.9850)),
    ]
}

struct FakeBackend {
    stops: Vec<StopFeature>,
    lines: HashMap<String, Vec<StopLine>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            stops: stops(),
            lines: HashMap::from([(
                "C".to_owned(),
                vec![StopLine {
                    route_id: Some("7".to_owned()),
                    code: Some("28".to_owned()),
                    name: Some("Beşiktaş - Edirnekapı".to_owned()),
                    headsigns: vec![],
                }],
            )]),
        }
    }
}

#[async_trait]
impl StopSource for FakeBackend {
    async fn stops_in_bounds(
        &self,
        _: BoundingBox,
        limit: usize,
    ) -> ApiResult<Vec<StopFeature>> {
        Ok(self.stops.iter().take(limit).cloned().collect())
    }
}

#[async_trait]
impl TransitBackend for FakeBackend {
    async fn stop_lines(&self, stop_id: &Id<StopFeature>) -> ApiResult<Vec<StopLine>> {
        Ok(self.lines.get(stop_id.raw_ref::<str>()).cloned().unwrap_or_default())
    }

    async fn search_routes(&self, code: &str) -> ApiResult<RouteSearch> {
        let lines = match code {
            "500T" => vec![LineGeometry {
                code: "500T".to_owned(),
                name: Some("Tuzla - Cevizlibağ".to_owned()),
                path: vec![p(41.00, 28.90), p(41.02, 28.95)],
            }],
            "EMPTY" => vec![LineGeometry {
                code: "EMPTY".to_owned(),
                name: None,
                path: vec![],
            }],
            _ => vec![],
        };
        Ok(RouteSearch { ok: true, lines })
    }

    async fn routes_between(
        &self,
        from: &Id<StopFeature>,
        to: &Id<StopFeature>,
    ) -> ApiResult<RouteSearch> {
        Ok(RouteSearch {
            ok: true,
            lines: vec![LineGeometry {
                code: format!("{from}-{to}"),
                name: None,
                path: vec![p(41.01, 28.97), p(41.0369, 28.9850)],
            }],
        })
    }
}

struct FakeGeocoder(HashMap<&'static str, Point>);

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &str) -> ApiResult<Option<Point>> {
        Ok(self.0.get(query).copied())
    }
}

/// Routes straight through the requested points.
struct FakeRouter {
    fail: bool,
}

#[async_trait]
impl RoutingEngine for FakeRouter {
    async fn route(&self, points: &[Point]) -> ApiResult<ComputedRoute> {
        if self.fail {
            return Err(ApiError::NoRoute("NoRoute".to_owned()));
        }
        Ok(ComputedRoute {
            summary: RouteSummary::new(1500.0, 300.0),
            waypoints: points.iter().copied().map(Some).collect(),
            path: points.to_vec(),
        })
    }
}

struct Setup {
    router_fails: bool,
    position: Option<Point>,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            router_fails: false,
            position: Some(p(41.011, 28.965)),
        }
    }
}

impl Setup {
    fn start(self) -> (ActorRef<MapSession>, UnboundedReceiver<SessionEvent>) {
        let services = Services {
            backend: Arc::new(FakeBackend::default()),
            geocoder: Arc::new(FakeGeocoder(HashMap::from([("Kadıköy", p(40.99, 29.03))]))),
            router: Arc::new(FakeRouter {
                fail: self.router_fails,
            }),
            location: Arc::new(FixedLocation(self.position)),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        (MapSession::start(services, tx), rx)
    }
}

async fn until<F>(events: &mut UnboundedReceiver<SessionEvent>, mut wanted: F) -> SessionEvent
where
    F: FnMut(&SessionEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.expect("session stopped");
            if wanted(&event) {
                return event;
            }
        }
    })
    .await
    .expect("no matching session event")
}

async fn notified(events: &mut UnboundedReceiver<SessionEvent>) -> String {
    match until(events, |event| matches!(event, SessionEvent::Notified(_))).await {
        SessionEvent::Notified(message) => message,
        _ => unreachable!(),
    }
}

async fn route_requested(events: &mut UnboundedReceiver<SessionEvent>) -> Vec<Point> {
    match until(events, |event| matches!(event, SessionEvent::RouteRequested(_))).await {
        SessionEvent::RouteRequested(points) => points,
        _ => unreachable!(),
    }
}

async fn stops_shown(session: &ActorRef<MapSession>, events: &mut UnboundedReceiver<SessionEvent>) {
    session.send(UiCommand::ShowStops(true)).await.unwrap();
    until(events, |event| {
        matches!(event, SessionEvent::StopsChanged(stops) if !stops.is_empty())
    })
    .await;
}

#[tokio::test]
async fn draw_geocodes_then_routes() {
    let (session, mut events) = Setup::default().start();
    session
        .send(UiCommand::SetStart(WaypointInput::Text("Kadıköy".to_owned())))
        .await
        .unwrap();
    session
        .send(UiCommand::SetDestination(WaypointInput::Text("41.05, 29.01".to_owned())))
        .await
        .unwrap();
    session.send(UiCommand::Draw).await.unwrap();

    let shown = until(&mut events, |event| matches!(event, SessionEvent::RouteShown { .. })).await;
    assert_eq!(
        shown,
        SessionEvent::RouteShown {
            summary: "1.50 km · 5 min".to_owned(),
            path: vec![p(40.99, 29.03), p(41.05, 29.01)],
        }
    );

    let view = session.snapshot().await.unwrap();
    assert_eq!(view.slots[0].display_text, "Kadıköy");
    assert_eq!(view.slots[0].resolved, Some(p(40.99, 29.03)));
    assert_eq!(view.summary.as_deref(), Some("1.50 km · 5 min"));
    assert_eq!(view.route_path.len(), 2);
}

#[tokio::test]
async fn draw_needs_both_endpoints() {
    let (session, mut events) = Setup::default().start();
    session
        .send(UiCommand::SetStart(WaypointInput::Text("Kadıköy".to_owned())))
        .await
        .unwrap();
    session
        .send(UiCommand::SetDestination(WaypointInput::Text("Atlantis".to_owned())))
        .await
        .unwrap();
    session.send(UiCommand::Draw).await.unwrap();
    assert_eq!(notified(&mut events).await, "Start and destination are required.");
    assert!(session.snapshot().await.unwrap().control_waypoints.is_empty());
}

#[tokio::test]
async fn routing_error_keeps_waypoints() {
    let (session, mut events) = Setup {
        router_fails: true,
        ..Setup::default()
    }
    .start();
    session
        .send(UiCommand::SetStart(WaypointInput::Point(p(41.0, 28.9))))
        .await
        .unwrap();
    session
        .send(UiCommand::SetDestination(WaypointInput::Point(p(41.1, 29.1))))
        .await
        .unwrap();
    session.send(UiCommand::Draw).await.unwrap();
    assert_eq!(notified(&mut events).await, "Route not found.");

    let view = session.snapshot().await.unwrap();
    assert_eq!(view.summary, None);
    assert_eq!(view.control_waypoints, vec![Some(p(41.0, 28.9)), Some(p(41.1, 29.1))]);
    assert_eq!(view.notification.as_deref(), Some("Route not found."));
}

#[tokio::test]
async fn via_edits_reroute() {
    let (session, mut events) = Setup::default().start();
    session
        .send(UiCommand::SetStart(WaypointInput::Point(p(41.0, 28.9))))
        .await
        .unwrap();
    session
        .send(UiCommand::SetDestination(WaypointInput::Point(p(41.1, 29.1))))
        .await
        .unwrap();
    let first = session.add_via("41.02, 28.95").await.unwrap();
    let second = session.add_via("41.05, 29.0").await.unwrap();
    session.send(UiCommand::Draw).await.unwrap();
    assert_eq!(
        route_requested(&mut events).await,
        vec![p(41.0, 28.9), p(41.02, 28.95), p(41.05, 29.0), p(41.1, 29.1)]
    );

    session
        .send(UiCommand::ReorderVias(vec![second.clone(), first]))
        .await
        .unwrap();
    assert_eq!(
        route_requested(&mut events).await,
        vec![p(41.0, 28.9), p(41.05, 29.0), p(41.02, 28.95), p(41.1, 29.1)]
    );

    session.send(UiCommand::RemoveVia(second)).await.unwrap();
    assert_eq!(
        route_requested(&mut events).await,
        vec![p(41.0, 28.9), p(41.02, 28.95), p(41.1, 29.1)]
    );
}

#[tokio::test]
async fn dragging_on_the_control_updates_the_store() {
    let (session, mut events) = Setup::default().start();
    session
        .send(UiCommand::SetStart(WaypointInput::Point(p(41.0, 28.9))))
        .await
        .unwrap();
    session
        .send(UiCommand::SetDestination(WaypointInput::Labeled {
            text: "Taksim".to_owned(),
            point: p(41.1, 29.1),
        }))
        .await
        .unwrap();
    session.send(UiCommand::Draw).await.unwrap();
    until(&mut events, |event| matches!(event, SessionEvent::RouteShown { .. })).await;

    session
        .send(UiCommand::DragWaypoint {
            index: 1,
            point: p(41.2, 29.2),
        })
        .await
        .unwrap();
    assert_eq!(route_requested(&mut events).await, vec![p(41.0, 28.9), p(41.2, 29.2)]);

    let view = session.snapshot().await.unwrap();
    let destination = view.slots.last().unwrap();
    assert_eq!(destination.resolved, Some(p(41.2, 29.2)));
    assert_eq!(destination.display_text, "Taksim");
}

#[tokio::test]
async fn clear_all() {
    let (session, mut events) = Setup::default().start();
    session
        .send(UiCommand::SetStart(WaypointInput::Point(p(41.0, 28.9))))
        .await
        .unwrap();
    session
        .send(UiCommand::SetDestination(WaypointInput::Point(p(41.1, 29.1))))
        .await
        .unwrap();
    session.add_via("somewhere").await.unwrap();
    session.send(UiCommand::Draw).await.unwrap();
    until(&mut events, |event| matches!(event, SessionEvent::RouteShown { .. })).await;

    session.send(UiCommand::Clear).await.unwrap();
    until(&mut events, |event| *event == SessionEvent::RouteCleared).await;
    let view = session.snapshot().await.unwrap();
    assert_eq!(view.slots.len(), 2);
    assert!(view.slots.iter().all(|slot| slot.resolved.is_none()));
    assert!(view.control_waypoints.is_empty());
    assert_eq!(view.summary, None);
    assert_eq!(view.overlay, None);
}

#[tokio::test]
async fn stop_layer_toggle() {
    let (session, mut events) = Setup::default().start();
    stops_shown(&session, &mut events).await;
    assert_eq!(session.snapshot().await.unwrap().stops.len(), 4);

    session.send(UiCommand::ShowStops(false)).await.unwrap();
    until(&mut events, |event| *event == SessionEvent::StopsChanged(vec![])).await;
    let view = session.snapshot().await.unwrap();
    assert!(!view.stops_enabled);
    assert!(view.stops.is_empty());
}

#[tokio::test]
async fn stop_popup_lists_lines() {
    let (session, mut events) = Setup::default().start();
    stops_shown(&session, &mut events).await;

    session.send(UiCommand::OpenStop(Id::from("C"))).await.unwrap();
    let popup = until(&mut events, |event| {
        matches!(event, SessionEvent::PopupChanged(Some(popup)) if popup.lines != PopupLines::Loading)
    })
    .await;
    let SessionEvent::PopupChanged(Some(popup)) = popup else {
        unreachable!()
    };
    assert_eq!(popup.render(), vec!["Cağaloğlu", "28 – Beşiktaş - Edirnekapı"]);

    session.send(UiCommand::OpenStop(Id::from("A"))).await.unwrap();
    let popup = until(&mut events, |event| {
        matches!(event, SessionEvent::PopupChanged(Some(popup)) if popup.lines != PopupLines::Loading)
    })
    .await;
    assert!(matches!(popup, SessionEvent::PopupChanged(Some(popup)) if popup.lines == PopupLines::NoLines));
}

#[tokio::test]
async fn line_search() {
    let (session, mut events) = Setup::default().start();

    session.send(UiCommand::SearchLine("  ".to_owned())).await.unwrap();
    assert_eq!(notified(&mut events).await, "Enter a line code.");

    session.send(UiCommand::SearchLine("500T".to_owned())).await.unwrap();
    assert_eq!(notified(&mut events).await, "Drawn: 500T");
    let view = session.snapshot().await.unwrap();
    let overlay = view.overlay.unwrap();
    assert_eq!(overlay.kind, OverlayKind::Search);
    assert!(view.viewport.bounds().contains(41.00, 28.90));
    assert!(view.viewport.bounds().contains(41.02, 28.95));

    session.send(UiCommand::SearchLine("NOPE".to_owned())).await.unwrap();
    assert_eq!(notified(&mut events).await, "Line not found.");
    assert_eq!(session.snapshot().await.unwrap().overlay, None);

    session.send(UiCommand::SearchLine("EMPTY".to_owned())).await.unwrap();
    assert_eq!(notified(&mut events).await, "No route data for this line.");
}

#[tokio::test]
async fn route_to_stop_suggests_a_line() {
    let (session, mut events) = Setup::default().start();
    stops_shown(&session, &mut events).await;

    session.send(UiCommand::RouteToStop(Id::from("T"))).await.unwrap();
    assert_eq!(notified(&mut events).await, "Transit suggestion: C-T");

    let view = session.snapshot().await.unwrap();
    assert_eq!(view.slots[0].display_text, "My location");
    assert_eq!(view.slots[0].resolved, Some(p(41.011, 28.965)));
    assert_eq!(view.slots[1].display_text, "Taksim");
    assert_eq!(view.position, Some(p(41.011, 28.965)));
    assert_eq!(view.overlay.map(|overlay| overlay.kind), Some(OverlayKind::Suggestion));
    assert!(matches!(
        view.flow,
        FlowState::Rendered { ref line_code, .. } if line_code == "C-T"
    ));
}

#[tokio::test]
async fn route_to_stop_without_location_or_start() {
    let (session, mut events) = Setup {
        position: None,
        ..Setup::default()
    }
    .start();
    stops_shown(&session, &mut events).await;

    session.send(UiCommand::RouteToStop(Id::from("T"))).await.unwrap();
    assert_eq!(notified(&mut events).await, START_OR_LOCATION_REQUIRED);
    assert_eq!(session.snapshot().await.unwrap().flow, FlowState::Idle);
}

#[tokio::test]
async fn route_to_stop_falls_back_to_typed_start() {
    let (session, mut events) = Setup {
        position: None,
        ..Setup::default()
    }
    .start();
    stops_shown(&session, &mut events).await;
    session
        .send(UiCommand::SetStart(WaypointInput::Text("Kadıköy".to_owned())))
        .await
        .unwrap();

    session.send(UiCommand::RouteToStop(Id::from("T"))).await.unwrap();
    assert_eq!(
        route_requested(&mut events).await,
        vec![p(40.99, 29.03), p(41.0369, 28.9850)]
    );
    assert_eq!(session.snapshot().await.unwrap().flow, FlowState::Idle);
}

#[tokio::test]
async fn locate_centres_the_map() {
    let (session, mut events) = Setup::default().start();
    session.send(UiCommand::Locate).await.unwrap();
    let viewport = until(&mut events, |event| matches!(event, SessionEvent::ViewportChanged(_))).await;
    let SessionEvent::ViewportChanged(viewport) = viewport else {
        unreachable!()
    };
    assert_eq!(viewport.center, p(41.011, 28.965));
    assert_eq!(viewport.zoom, LOCATE_ZOOM);

    let (session, mut events) = Setup {
        position: None,
        ..Setup::default()
    }
    .start();
    session.send(UiCommand::Locate).await.unwrap();
    assert_eq!(notified(&mut events).await, "Location unavailable.");
    session.send(UiCommand::UseLocation).await.unwrap();
    assert_eq!(notified(&mut events).await, "Location permission required.");
}

#[tokio::test]
async fn use_location_labels_the_start() {
    let (session, mut events) = Setup::default().start();
    session.send(UiCommand::UseLocation).await.unwrap();
    let changed = until(&mut events, |event| matches!(event, SessionEvent::WaypointsChanged(_))).await;
    let SessionEvent::WaypointsChanged(slots) = changed else {
        unreachable!()
    };
    assert_eq!(slots[0].display_text, "My location");
    assert_eq!(slots[0].resolved, Some(p(41.011, 28.965)));
    assert_eq!(session.snapshot().await.unwrap().position, Some(p(41.011, 28.965)));
}
