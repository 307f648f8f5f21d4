//! The "route to this stop" flow started from a stop popup: set the stop as
//! destination, find the user, find the stop nearest to them, and suggest a
//! transit line from there to the chosen stop.

use std::mem;

use model::{
    line::{LineGeometry, OverlayKind},
    location::Point,
    stop::StopFeature,
    WithDistance,
};
use transit_api::{ApiResult, LocationError};
use utility::id::Id;

use crate::suggestion::{LineOutcome, SUGGESTION_FAILED};

pub const NO_NEARBY_STOP: &str = "No nearby stop found.";
pub const START_OR_LOCATION_REQUIRED: &str = "Enter a start or allow location access.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    AwaitingLocation {
        target: StopFeature,
    },
    AwaitingNearestStop {
        target: StopFeature,
        origin: Point,
    },
    AwaitingTransitSuggestion {
        target: StopFeature,
        from: StopFeature,
    },
    Rendered {
        target: StopFeature,
        from: StopFeature,
        line_code: String,
    },
}

#[derive(Debug)]
pub enum FlowEvent {
    Begin(StopFeature),
    Located(Result<Point, LocationError>),
    NearestStop(ApiResult<Option<WithDistance<StopFeature>>>),
    Suggested(ApiResult<LineOutcome>),
}

/// Side effects the session carries out for the flow.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowAction {
    SetDestination(StopFeature),
    RequestLocation,
    /// Start becomes the user's position and the driving route is redrawn.
    SetStartHere(Point),
    FindNearestStop(Point),
    /// No position: route from the typed start instead, if there is one.
    FallBackToTypedStart,
    SuggestBetween {
        from: Id<StopFeature>,
        to: Id<StopFeature>,
    },
    Render(LineGeometry),
    Notify(String),
}

#[derive(Debug, Clone, Default)]
pub struct RouteToStopFlow {
    state: FlowState,
}

impl RouteToStopFlow {
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, FlowState::Idle)
    }

    /// Moves the flow along and returns what the session has to do next.
    /// Events that do not fit the current state are dropped.
    pub fn advance(&mut self, event: FlowEvent) -> Vec<FlowAction> {
        let state = mem::take(&mut self.state);
        let (next, actions) = match (state, event) {
            (_, FlowEvent::Begin(target)) => (
                FlowState::AwaitingLocation {
                    target: target.clone(),
                },
                vec![FlowAction::SetDestination(target), FlowAction::RequestLocation],
            ),

            (FlowState::AwaitingLocation { target }, FlowEvent::Located(Ok(origin))) => (
                FlowState::AwaitingNearestStop { target, origin },
                vec![
                    FlowAction::SetStartHere(origin),
                    FlowAction::FindNearestStop(origin),
                ],
            ),
            (FlowState::AwaitingLocation { .. }, FlowEvent::Located(Err(why))) => {
                log::info!("no position for the stop route: {why}");
                (FlowState::Idle, vec![FlowAction::FallBackToTypedStart])
            }

            (
                FlowState::AwaitingNearestStop { target, .. },
                FlowEvent::NearestStop(Ok(Some(from))),
            ) => {
                log::debug!("nearest stop {} at {:.0} m", from.content.name, from.distance_m);
                let action = FlowAction::SuggestBetween {
                    from: from.content.id.clone(),
                    to: target.id.clone(),
                };
                (
                    FlowState::AwaitingTransitSuggestion {
                        target,
                        from: from.content,
                    },
                    vec![action],
                )
            }
            (FlowState::AwaitingNearestStop { .. }, FlowEvent::NearestStop(result)) => {
                if let Err(why) = result {
                    log::error!("nearest stop lookup failed: {why}");
                }
                (FlowState::Idle, vec![FlowAction::Notify(NO_NEARBY_STOP.to_owned())])
            }

            (
                FlowState::AwaitingTransitSuggestion { target, from },
                FlowEvent::Suggested(Ok(LineOutcome::Drawn(line))),
            ) => {
                let notification =
                    LineOutcome::Drawn(line.clone()).notification(OverlayKind::Suggestion);
                (
                    FlowState::Rendered {
                        target,
                        from,
                        line_code: line.code.clone(),
                    },
                    vec![FlowAction::Render(line), FlowAction::Notify(notification)],
                )
            }
            (FlowState::AwaitingTransitSuggestion { .. }, FlowEvent::Suggested(Ok(outcome))) => (
                FlowState::Idle,
                vec![FlowAction::Notify(outcome.notification(OverlayKind::Suggestion))],
            ),
            (FlowState::AwaitingTransitSuggestion { .. }, FlowEvent::Suggested(Err(why))) => {
                log::error!("transit suggestion failed: {why}");
                (FlowState::Idle, vec![FlowAction::Notify(SUGGESTION_FAILED.to_owned())])
            }

            (state, event) => {
                log::warn!("ignoring {event:?} while {state:?}");
                (state, vec![])
            }
        };
        self.state = next;
        actions
    }
}
