use itertools::Itertools;
use model::{
    line::{LineOverlay, OverlayKind},
    waypoint::{Role, WaypointSlot},
};
use planner::{SessionEvent, SessionView};

fn slot_line(slot: &WaypointSlot) -> String {
    let label = match (&slot.role, &slot.key) {
        (Role::Start, _) => "start".to_owned(),
        (Role::Destination, _) => "dest".to_owned(),
        (Role::Via, Some(key)) => format!("via {key}"),
        (Role::Via, None) => "via".to_owned(),
    };
    let text = match slot.display_text.as_str() {
        "" => "-",
        text => text,
    };
    match slot.resolved {
        Some(point) => format!("{label}: {text} ({point})"),
        None => format!("{label}: {text}"),
    }
}

fn overlay_line(overlay: &LineOverlay) -> String {
    let kind = match overlay.kind {
        OverlayKind::Search => "line",
        OverlayKind::Suggestion => "suggested line",
    };
    let name = overlay
        .geometry
        .name
        .as_deref()
        .map(|name| format!(" {name}"))
        .unwrap_or_default();
    format!(
        "{kind} {}{name}, {} points",
        overlay.geometry.code,
        overlay.geometry.path.len()
    )
}

/// One line per session event.
pub fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Notified(message) => format!("! {message}"),
        SessionEvent::WaypointsChanged(slots) => {
            format!("waypoints: {}", slots.iter().map(slot_line).join(" | "))
        }
        SessionEvent::RouteRequested(points) => {
            format!("routing via {}", points.iter().map(|point| format!("({point})")).join(" "))
        }
        SessionEvent::RouteShown { summary, path } => {
            format!("route: {summary} ({} points)", path.len())
        }
        SessionEvent::RouteCleared => "route cleared".to_owned(),
        SessionEvent::StopsChanged(stops) => format!("{} stop(s) on the map", stops.len()),
        SessionEvent::PopupChanged(Some(popup)) => {
            format!("[{}] {}", popup.stop.id, popup.render().join(" / "))
        }
        SessionEvent::PopupChanged(None) => "popup closed".to_owned(),
        SessionEvent::OverlayChanged(Some(overlay)) => overlay_line(overlay),
        SessionEvent::OverlayChanged(None) => "line overlay cleared".to_owned(),
        SessionEvent::ViewportChanged(viewport) => {
            format!("map at {} zoom {}", viewport.center, viewport.zoom)
        }
        SessionEvent::PositionShown(point) => format!("you are at {point}"),
    }
}

/// Multi-line dump of the whole session.
pub fn describe_view(view: &SessionView) -> String {
    let mut lines = view.slots.iter().map(slot_line).collect::<Vec<_>>();
    lines.push(format!(
        "route: {}",
        view.summary.as_deref().unwrap_or("none")
    ));
    lines.push(format!(
        "map: {} zoom {}, stops {}",
        view.viewport.center,
        view.viewport.zoom,
        if view.stops_enabled {
            format!("on ({})", view.stops.len())
        } else {
            "off".to_owned()
        }
    ));
    if let Some(overlay) = &view.overlay {
        lines.push(overlay_line(overlay));
    }
    if let Some(popup) = &view.popup {
        lines.push(format!("popup: {}", popup.render().join(" / ")));
    }
    if let Some(position) = view.position {
        lines.push(format!("me: {position}"));
    }
    if let Some(message) = &view.notification {
        lines.push(format!("! {message}"));
    }
    lines.join("\n")
}
