use std::{any::Any, sync::Arc};

use actors::{
    actor::{Actor, ActorError, SupervisionStrategy},
    actor_ref::ActorRef,
    context::Context,
    handler::{Handler, Message},
    run,
};
use async_trait::async_trait;
use chrono::Local;
use model::{
    line::{LineGeometry, LineOverlay, OverlayKind},
    location::Point,
    stop::{StopFeature, StopLine},
    waypoint::{Endpoint, SlotKey, SlotRef, WaypointInput, WaypointSlot},
};
use tokio::sync::mpsc;
use transit_api::{
    geocode::geocode, location::locate, ApiResult, ComputedRoute, Geocoder, LocationError,
    LocationProvider, RoutingEngine, ServiceConfig, TransitBackend,
};
use utility::{geo::BoundingBox, id::Id};

use crate::{
    control::RoutingControl,
    flow::{FlowAction, FlowEvent, FlowState, RouteToStopFlow, START_OR_LOCATION_REQUIRED},
    layer::{StopLayer, StopPopup, STOPS_FAILED, VISIBLE_STOPS_LIMIT},
    locator::StopLocator,
    notify::Notifications,
    reconciler::RouteReconciler,
    suggestion::{
        LineOutcome, LineOverlayState, TransitSuggestion, LINE_CODE_REQUIRED, LINE_SEARCH_FAILED,
    },
    viewport::{Viewport, LOCATE_ZOOM},
    waypoints::WaypointStore,
    LOCATION_TIMEOUT,
};

pub const MY_LOCATION: &str = "My location";
pub const ENDPOINTS_REQUIRED: &str = "Start and destination are required.";
pub const LOCATION_PERMISSION_REQUIRED: &str = "Location permission required.";
pub const LOCATION_UNAVAILABLE: &str = "Location unavailable.";

/// The external services a session talks to.
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn TransitBackend>,
    pub geocoder: Arc<dyn Geocoder>,
    pub router: Arc<dyn RoutingEngine>,
    pub location: Arc<dyn LocationProvider>,
}

impl Services {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            backend: Arc::new(config.backend()),
            geocoder: Arc::new(config.geocoder()),
            router: Arc::new(config.router()),
            location: Arc::new(config.location()),
        }
    }
}

/// Everything the map shows, as pushed to the front-end.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Notified(String),
    WaypointsChanged(Vec<WaypointSlot>),
    /// The points handed to the routing control.
    RouteRequested(Vec<Point>),
    RouteShown {
        summary: String,
        path: Vec<Point>,
    },
    RouteCleared,
    StopsChanged(Vec<StopFeature>),
    PopupChanged(Option<StopPopup>),
    OverlayChanged(Option<LineOverlay>),
    ViewportChanged(Viewport),
    /// The "me" marker moved.
    PositionShown(Point),
}

/// A user action on the map or the side panel.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    SetStart(WaypointInput),
    SetDestination(WaypointInput),
    SetViaText { key: SlotKey, text: String },
    RemoveVia(SlotKey),
    ReorderVias(Vec<SlotKey>),
    Draw,
    UseLocation,
    Locate,
    Clear,
    ShowStops(bool),
    MoveMap(Viewport),
    OpenStop(Id<StopFeature>),
    ClosePopup,
    RouteToStop(Id<StopFeature>),
    SearchLine(String),
    DragWaypoint { index: usize, point: Point },
    InsertWaypoint { index: usize, point: Point },
    RemoveWaypoint(usize),
}

impl Message for UiCommand {
    type Response = ();
}

/// Appends a via slot and answers with its key.
#[derive(Debug, Clone)]
pub struct AddVia(pub String);

impl Message for AddVia {
    type Response = SlotKey;
}

#[derive(Debug, Clone, Copy)]
pub struct Snapshot;

impl Message for Snapshot {
    type Response = SessionView;
}

/// Results of work a handler started, delivered back to the session.
#[derive(Debug)]
pub enum Completion {
    DrawGeocoded(Vec<(SlotRef, Option<Point>)>),
    RouteComputed(ApiResult<ComputedRoute>),
    StopsLoaded(ApiResult<Vec<StopFeature>>),
    StopLinesLoaded {
        stop: Id<StopFeature>,
        result: ApiResult<Vec<StopLine>>,
    },
    LineSearched(ApiResult<LineOutcome>),
    PositionForStart(Result<Point, LocationError>),
    PositionForView(Result<Point, LocationError>),
    TypedStartGeocoded(Option<Point>),
    Flow(FlowEvent),
}

impl Message for Completion {
    type Response = ();
}

/// The session state at one moment.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub slots: Vec<WaypointSlot>,
    pub control_waypoints: Vec<Option<Point>>,
    pub route_path: Vec<Point>,
    pub summary: Option<String>,
    pub stops_enabled: bool,
    pub stops: Vec<StopFeature>,
    pub popup: Option<StopPopup>,
    pub overlay: Option<LineOverlay>,
    pub viewport: Viewport,
    pub position: Option<Point>,
    pub flow: FlowState,
    pub notification: Option<String>,
}

pub struct MapSession {
    services: Services,
    events: mpsc::UnboundedSender<SessionEvent>,
    store: WaypointStore,
    reconciler: RouteReconciler,
    control: RoutingControl,
    locator: StopLocator,
    suggestion: TransitSuggestion,
    layer: StopLayer,
    popup: Option<StopPopup>,
    overlay: LineOverlayState,
    viewport: Viewport,
    position: Option<Point>,
    flow: RouteToStopFlow,
    notifications: Notifications,
}

impl Actor for MapSession {
    fn on_fail(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
        SupervisionStrategy::Resume
    }
}

impl MapSession {
    pub fn new(services: Services, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            locator: StopLocator::new(services.backend.clone()),
            suggestion: TransitSuggestion::new(services.backend.clone()),
            services,
            events,
            store: WaypointStore::new(),
            reconciler: RouteReconciler::new(),
            control: RoutingControl::default(),
            layer: StopLayer::default(),
            popup: None,
            overlay: LineOverlayState::default(),
            viewport: Viewport::default(),
            position: None,
            flow: RouteToStopFlow::default(),
            notifications: Notifications::default(),
        }
    }

    /// Runs a session on the current runtime.
    pub fn start(
        services: Services,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> ActorRef<MapSession> {
        run(move || MapSession::new(services.clone(), events.clone()))
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            log::debug!("no one listens to session events");
        }
    }

    fn notify<S: Into<String>>(&mut self, message: S) {
        let notification = self.notifications.push(message, Local::now());
        log::info!("notification: {}", notification.message);
        let message = notification.message.clone();
        self.emit(SessionEvent::Notified(message));
    }

    fn waypoints_changed(&self) {
        self.emit(SessionEvent::WaypointsChanged(
            self.store.slots().cloned().collect(),
        ));
    }

    fn view(&self) -> SessionView {
        SessionView {
            slots: self.store.slots().cloned().collect(),
            control_waypoints: self.control.waypoints().to_vec(),
            route_path: self.control.path().to_vec(),
            summary: self.reconciler.summary().map(ToString::to_string),
            stops_enabled: self.layer.is_enabled(),
            stops: self.layer.stops().to_vec(),
            popup: self.popup.clone(),
            overlay: self.overlay.current().cloned(),
            viewport: self.viewport,
            position: self.position,
            flow: self.flow.state().clone(),
            notification: self
                .notifications
                .visible(Local::now())
                .map(|notification| notification.message.clone()),
        }
    }

    /// Pushes the store's points to the routing control and asks for a
    /// route, if at least two are known.
    fn reroute(&mut self, ctx: &Context<Self>) {
        let Some(points) = self.reconciler.request_route(self.store.to_ordered_points()) else {
            return;
        };
        self.control.set_waypoints(&points);
        self.request_route(points, ctx);
    }

    fn request_route(&self, points: Vec<Point>, ctx: &Context<Self>) {
        self.emit(SessionEvent::RouteRequested(points.clone()));
        let router = self.services.router.clone();
        ctx.spawn(async move { Completion::RouteComputed(router.route(&points).await) });
    }

    /// The routing control reported an edit by the user.
    fn control_edited(&mut self, raw: Vec<Option<Point>>, ctx: &Context<Self>) {
        self.reconciler.on_waypoints_changed(&mut self.store, &raw);
        self.waypoints_changed();
        if let Some(points) = self.reconciler.request_route(self.control.resolved_points()) {
            self.request_route(points, ctx);
        }
    }

    fn route_computed(&mut self, result: ApiResult<ComputedRoute>) {
        match result {
            Ok(route) => {
                let summary = self.reconciler.on_route_found(route.summary);
                log::info!("route found: {summary}");
                if self.store.is_fully_resolved()
                    && route.waypoints.len() == self.store.slots().count()
                {
                    self.reconciler
                        .on_waypoints_changed(&mut self.store, &route.waypoints);
                    self.control.set_engine_waypoints(route.waypoints);
                    self.waypoints_changed();
                }
                self.control.set_path(route.path.clone());
                self.emit(SessionEvent::RouteShown {
                    summary,
                    path: route.path,
                });
            }
            Err(why) => {
                log::error!("routing failed: {why}");
                let message = self.reconciler.on_route_error();
                self.notify(message);
            }
        }
    }

    fn draw(&mut self, ctx: &Context<Self>) {
        let queries = self.store.unresolved_queries();
        if queries.is_empty() {
            self.finish_draw(vec![], ctx);
            return;
        }
        let geocoder = self.services.geocoder.clone();
        ctx.spawn(async move {
            let mut resolved = Vec::with_capacity(queries.len());
            for (slot, query) in queries {
                let point = match geocode(geocoder.as_ref(), &query).await {
                    Ok(point) => point,
                    Err(why) => {
                        log::error!("geocoding '{query}' failed: {why}");
                        None
                    }
                };
                if point.is_none() {
                    log::info!("no place found for '{query}'");
                }
                resolved.push((slot, point));
            }
            Completion::DrawGeocoded(resolved)
        });
    }

    fn finish_draw(&mut self, resolved: Vec<(SlotRef, Option<Point>)>, ctx: &Context<Self>) {
        for (slot, point) in resolved {
            let Some(point) = point else { continue };
            // the slot may have been removed or resolved meanwhile
            let still_pending = self
                .store
                .slot(&slot)
                .map_or(false, |slot| slot.resolved.is_none());
            if still_pending {
                self.store.resolve(&slot, Some(point));
            }
        }
        self.waypoints_changed();
        if !self.store.start().is_resolved() || !self.store.destination().is_resolved() {
            self.notify(ENDPOINTS_REQUIRED);
            return;
        }
        self.reroute(ctx);
    }

    fn set_start_here(&mut self, point: Point) {
        self.store.set_role(
            Endpoint::Start,
            WaypointInput::Labeled {
                text: MY_LOCATION.to_owned(),
                point,
            },
        );
        self.position = Some(point);
        self.emit(SessionEvent::PositionShown(point));
        self.waypoints_changed();
    }

    fn request_position<F>(&self, ctx: &Context<Self>, into: F)
    where
        F: FnOnce(Result<Point, LocationError>) -> Completion + Send + 'static,
    {
        let location = self.services.location.clone();
        ctx.spawn(async move { into(locate(location.as_ref(), LOCATION_TIMEOUT).await) });
    }

    fn move_map(&mut self, viewport: Viewport, ctx: &Context<Self>) {
        self.viewport = viewport;
        self.emit(SessionEvent::ViewportChanged(viewport));
        if self.layer.is_enabled() {
            self.load_stops(ctx);
        }
    }

    fn fit_map(&mut self, bounds: Option<BoundingBox>, ctx: &Context<Self>) {
        if let Some(bounds) = bounds {
            self.move_map(Viewport::fit(&bounds), ctx);
        }
    }

    fn load_stops(&self, ctx: &Context<Self>) {
        let locator = self.locator.clone();
        let bounds = self.viewport.bounds();
        ctx.spawn(async move {
            Completion::StopsLoaded(
                locator
                    .query_stops_in_bounds(bounds, VISIBLE_STOPS_LIMIT)
                    .await,
            )
        });
    }

    /// A stop the user can currently click on.
    fn known_stop(&self, id: &Id<StopFeature>) -> Option<StopFeature> {
        self.layer
            .find(id)
            .or_else(|| {
                self.popup
                    .as_ref()
                    .map(|popup| &popup.stop)
                    .filter(|stop| &stop.id == id)
            })
            .cloned()
    }

    fn open_stop(&mut self, id: Id<StopFeature>, ctx: &Context<Self>) {
        let Some(stop) = self.known_stop(&id) else {
            log::warn!("stop {id} is not on the map");
            return;
        };
        self.popup = Some(StopPopup::loading(stop));
        self.emit(SessionEvent::PopupChanged(self.popup.clone()));
        let backend = self.services.backend.clone();
        ctx.spawn(async move {
            let result = backend.stop_lines(&id).await;
            Completion::StopLinesLoaded { stop: id, result }
        });
    }

    fn close_popup(&mut self) {
        if self.popup.take().is_some() {
            self.emit(SessionEvent::PopupChanged(None));
        }
    }

    fn search_line(&mut self, code: &str, ctx: &Context<Self>) {
        let code = code.trim().to_owned();
        if code.is_empty() {
            self.notify(LINE_CODE_REQUIRED);
            return;
        }
        self.overlay.clear();
        self.emit(SessionEvent::OverlayChanged(None));
        let suggestion = self.suggestion.clone();
        ctx.spawn(async move { Completion::LineSearched(suggestion.search_line(&code).await) });
    }

    fn line_searched(&mut self, result: ApiResult<LineOutcome>, ctx: &Context<Self>) {
        match result {
            Ok(outcome) => {
                let message = outcome.notification(OverlayKind::Search);
                if let LineOutcome::Drawn(line) = outcome {
                    self.show_overlay(OverlayKind::Search, line, ctx);
                }
                self.notify(message);
            }
            Err(why) => {
                log::error!("line search failed: {why}");
                self.notify(LINE_SEARCH_FAILED);
            }
        }
    }

    fn show_overlay(&mut self, kind: OverlayKind, line: LineGeometry, ctx: &Context<Self>) {
        let bounds = self.overlay.show(kind, line);
        self.emit(SessionEvent::OverlayChanged(self.overlay.current().cloned()));
        self.fit_map(bounds, ctx);
    }

    fn route_to_stop(&mut self, id: Id<StopFeature>, ctx: &Context<Self>) {
        match self.known_stop(&id) {
            Some(stop) => self.advance_flow(FlowEvent::Begin(stop), ctx),
            None => log::warn!("stop {id} is not on the map"),
        }
    }

    fn advance_flow(&mut self, event: FlowEvent, ctx: &Context<Self>) {
        for action in self.flow.advance(event) {
            self.run_flow_action(action, ctx);
        }
    }

    fn run_flow_action(&mut self, action: FlowAction, ctx: &Context<Self>) {
        match action {
            FlowAction::SetDestination(stop) => {
                self.store.set_role(
                    Endpoint::Destination,
                    WaypointInput::Labeled {
                        text: stop.name,
                        point: stop.point,
                    },
                );
                self.waypoints_changed();
            }
            FlowAction::RequestLocation => {
                self.request_position(ctx, |result| Completion::Flow(FlowEvent::Located(result)))
            }
            FlowAction::SetStartHere(point) => {
                self.set_start_here(point);
                self.reroute(ctx);
                self.close_popup();
            }
            FlowAction::FindNearestStop(point) => {
                let locator = self.locator.clone();
                ctx.spawn(async move {
                    Completion::Flow(FlowEvent::NearestStop(locator.nearest_stop(point).await))
                });
            }
            FlowAction::FallBackToTypedStart => self.fall_back_to_typed_start(ctx),
            FlowAction::SuggestBetween { from, to } => {
                let suggestion = self.suggestion.clone();
                ctx.spawn(async move {
                    Completion::Flow(FlowEvent::Suggested(
                        suggestion.suggest_between(&from, &to).await,
                    ))
                });
            }
            FlowAction::Render(line) => self.show_overlay(OverlayKind::Suggestion, line, ctx),
            FlowAction::Notify(message) => self.notify(message),
        }
    }

    fn fall_back_to_typed_start(&mut self, ctx: &Context<Self>) {
        let start = self.store.start();
        if start.is_resolved() {
            self.reroute(ctx);
            self.close_popup();
            return;
        }
        let Some(query) = start.pending_query().map(str::to_owned) else {
            self.notify(START_OR_LOCATION_REQUIRED);
            return;
        };
        let geocoder = self.services.geocoder.clone();
        ctx.spawn(async move {
            let point = geocode(geocoder.as_ref(), &query)
                .await
                .unwrap_or_else(|why| {
                    log::error!("geocoding '{query}' failed: {why}");
                    None
                });
            Completion::TypedStartGeocoded(point)
        });
    }

    fn clear(&mut self) {
        self.store.clear();
        self.control.clear();
        self.reconciler.clear();
        self.overlay.clear();
        self.waypoints_changed();
        self.emit(SessionEvent::RouteCleared);
        self.emit(SessionEvent::OverlayChanged(None));
    }
}

#[async_trait]
impl Handler<UiCommand> for MapSession {
    async fn handle(&mut self, command: UiCommand, ctx: &Context<Self>) {
        log::debug!("command {command:?}");
        match command {
            UiCommand::SetStart(input) => {
                self.store.set_role(Endpoint::Start, input);
                self.waypoints_changed();
            }
            UiCommand::SetDestination(input) => {
                self.store.set_role(Endpoint::Destination, input);
                self.waypoints_changed();
            }
            UiCommand::SetViaText { key, text } => {
                if self.store.set_via_text(&key, text) {
                    self.waypoints_changed();
                }
            }
            UiCommand::RemoveVia(key) => {
                if self.store.remove_via(&key) {
                    self.waypoints_changed();
                    self.reroute(ctx);
                }
            }
            UiCommand::ReorderVias(order) => {
                self.store.reorder_via(&order);
                self.waypoints_changed();
                self.reroute(ctx);
            }
            UiCommand::Draw => self.draw(ctx),
            UiCommand::UseLocation => {
                self.request_position(ctx, Completion::PositionForStart);
            }
            UiCommand::Locate => {
                self.request_position(ctx, Completion::PositionForView);
            }
            UiCommand::Clear => self.clear(),
            UiCommand::ShowStops(enabled) => {
                if self.layer.set_enabled(enabled) {
                    self.load_stops(ctx);
                } else {
                    self.emit(SessionEvent::StopsChanged(vec![]));
                }
            }
            UiCommand::MoveMap(viewport) => self.move_map(viewport, ctx),
            UiCommand::OpenStop(id) => self.open_stop(id, ctx),
            UiCommand::ClosePopup => self.close_popup(),
            UiCommand::RouteToStop(id) => self.route_to_stop(id, ctx),
            UiCommand::SearchLine(code) => self.search_line(&code, ctx),
            UiCommand::DragWaypoint { index, point } => {
                match self.control.move_waypoint(index, point).map(<[_]>::to_vec) {
                    Some(raw) => self.control_edited(raw, ctx),
                    None => log::warn!("no waypoint {index} to drag"),
                }
            }
            UiCommand::InsertWaypoint { index, point } => {
                let raw = self.control.insert_waypoint(index, point).to_vec();
                self.control_edited(raw, ctx);
            }
            UiCommand::RemoveWaypoint(index) => {
                match self.control.remove_waypoint(index).map(<[_]>::to_vec) {
                    Some(raw) => self.control_edited(raw, ctx),
                    None => log::warn!("no waypoint {index} to remove"),
                }
            }
        }
    }
}

#[async_trait]
impl Handler<AddVia> for MapSession {
    async fn handle(&mut self, message: AddVia, _: &Context<Self>) -> SlotKey {
        let key = self.store.add_via(message.0);
        self.waypoints_changed();
        key
    }
}

#[async_trait]
impl Handler<Snapshot> for MapSession {
    async fn handle(&mut self, _: Snapshot, _: &Context<Self>) -> SessionView {
        self.view()
    }
}

#[async_trait]
impl Handler<Completion> for MapSession {
    async fn handle(&mut self, completion: Completion, ctx: &Context<Self>) {
        match completion {
            Completion::DrawGeocoded(resolved) => self.finish_draw(resolved, ctx),
            Completion::RouteComputed(result) => self.route_computed(result),
            Completion::StopsLoaded(Ok(stops)) => {
                if self.layer.replace(stops) {
                    self.emit(SessionEvent::StopsChanged(self.layer.stops().to_vec()));
                }
            }
            Completion::StopsLoaded(Err(why)) => {
                log::error!("loading stops failed: {why}");
                self.notify(STOPS_FAILED);
            }
            Completion::StopLinesLoaded { stop, result } => match &mut self.popup {
                Some(popup) if popup.stop.id == stop => {
                    popup.lines = result.into();
                    self.emit(SessionEvent::PopupChanged(self.popup.clone()));
                }
                _ => log::debug!("popup of stop {stop} was closed, dropping its lines"),
            },
            Completion::LineSearched(result) => self.line_searched(result, ctx),
            Completion::PositionForStart(Ok(point)) => self.set_start_here(point),
            Completion::PositionForStart(Err(why)) => {
                log::warn!("no position for the start: {why}");
                self.notify(LOCATION_PERMISSION_REQUIRED);
            }
            Completion::PositionForView(Ok(point)) => {
                self.position = Some(point);
                self.emit(SessionEvent::PositionShown(point));
                self.move_map(Viewport::new(point, LOCATE_ZOOM), ctx);
            }
            Completion::PositionForView(Err(why)) => {
                log::warn!("no position to show: {why}");
                self.notify(LOCATION_UNAVAILABLE);
            }
            Completion::TypedStartGeocoded(point) => {
                // retyped meanwhile: the new text waits for the next draw
                if self.store.start().resolved.is_none() {
                    self.store.resolve(&SlotRef::Start, point);
                }
                self.waypoints_changed();
                self.reroute(ctx);
                self.close_popup();
            }
            Completion::Flow(event) => self.advance_flow(event, ctx),
        }
    }
}

/// The front-end's handle on a running session.
#[async_trait]
pub trait SessionRef {
    async fn send(&self, command: UiCommand) -> Result<(), ActorError>;
    async fn add_via(&self, text: &str) -> Result<SlotKey, ActorError>;
    async fn snapshot(&self) -> Result<SessionView, ActorError>;
}

#[async_trait]
impl SessionRef for ActorRef<MapSession> {
    async fn send(&self, command: UiCommand) -> Result<(), ActorError> {
        self.tell(command).await
    }

    async fn add_via(&self, text: &str) -> Result<SlotKey, ActorError> {
        self.ask(AddVia(text.to_owned())).await
    }

    async fn snapshot(&self) -> Result<SessionView, ActorError> {
        self.ask(Snapshot).await
    }
}
