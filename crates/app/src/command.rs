use std::{error, fmt};

use model::{
    location::Point,
    waypoint::{SlotKey, WaypointInput},
};
use planner::{viewport::Viewport, UiCommand};
use utility::id::Id;

pub const HELP: &str = "\
commands:
  start <text>           set the start (address or \"lat, lon\")
  dest <text>            set the destination
  via add <text>         append a via stop
  via set <key> <text>   retype a via stop
  via rm <key>           remove a via stop
  via order <key>...     reorder the via stops
  draw                   resolve the texts and draw the route
  me                     use my location as start
  locate                 centre the map on my location
  clear                  clear everything
  stops on|off           show the stops of the visible area
  pan <lat>, <lon> [z]   move the map
  stop <id>              open a stop
  close                  close the stop popup
  go <id>                route to a stop and suggest a line
  line <code>            draw a line by its code
  drag <i> <lat>, <lon>  move waypoint i of the routing control
  insert <i> <lat>, <lon> insert a waypoint into the routing control
  unplace <i>            remove waypoint i from the routing control
  show                   print the session state
  help                   this text
  quit";

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(UiCommand),
    AddVia(String),
    Show,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidArgument { name: &'static str, value: String },
}

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::UnknownCommand(command) => {
                write!(f, "unknown command '{command}', try 'help'")
            }
            ParseError::MissingArgument(name) => write!(f, "missing {name}"),
            ParseError::InvalidArgument { name, value } => {
                write!(f, "invalid {name} '{value}'")
            }
        }
    }
}

fn required<'a>(rest: &'a str, name: &'static str) -> Result<&'a str, ParseError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ParseError::MissingArgument(name));
    }
    Ok(rest)
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

fn index(text: &str) -> Result<usize, ParseError> {
    text.parse().map_err(|_| ParseError::InvalidArgument {
        name: "index",
        value: text.to_owned(),
    })
}

fn point(text: &str) -> Result<Point, ParseError> {
    Point::parse_lat_lon(text).ok_or_else(|| ParseError::InvalidArgument {
        name: "point",
        value: text.to_owned(),
    })
}

/// `<i> <lat>, <lon>`
fn indexed_point(rest: &str) -> Result<(usize, Point), ParseError> {
    let (position, coordinates) = split_word(required(rest, "index")?);
    Ok((index(position)?, point(required(coordinates, "point")?)?))
}

/// `<lat>, <lon> [zoom]`
fn viewport(rest: &str) -> Result<Viewport, ParseError> {
    let rest = required(rest, "point")?;
    let (latitude, rest) = rest
        .split_once(',')
        .ok_or_else(|| ParseError::InvalidArgument {
            name: "point",
            value: rest.to_owned(),
        })?;
    let (longitude, zoom) = split_word(rest);
    let center = point(&format!("{latitude}, {longitude}"))?;
    let zoom = match zoom {
        "" => planner::viewport::DEFAULT_ZOOM,
        zoom => zoom.parse().map_err(|_| ParseError::InvalidArgument {
            name: "zoom",
            value: zoom.to_owned(),
        })?,
    };
    Ok(Viewport::new(center, zoom))
}

fn via(rest: &str) -> Result<Input, ParseError> {
    let (action, rest) = split_word(rest);
    let command = match action {
        "add" => return Ok(Input::AddVia(rest.to_owned())),
        "set" => {
            let (key, text) = split_word(required(rest, "via key")?);
            UiCommand::SetViaText {
                key: SlotKey::from(key),
                text: text.to_owned(),
            }
        }
        "rm" => UiCommand::RemoveVia(SlotKey::from(required(rest, "via key")?)),
        "order" => UiCommand::ReorderVias(rest.split_whitespace().map(SlotKey::from).collect()),
        "" => return Err(ParseError::MissingArgument("via action")),
        other => return Err(ParseError::UnknownCommand(format!("via {other}"))),
    };
    Ok(Input::Command(command))
}

/// Parses one input line.
pub fn parse(line: &str) -> Result<Input, ParseError> {
    let (word, rest) = split_word(line);
    let command = match word {
        "" => return Ok(Input::Empty),
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" => return Ok(Input::Quit),
        "show" => return Ok(Input::Show),
        "via" => return via(rest),
        "start" => UiCommand::SetStart(WaypointInput::Text(rest.to_owned())),
        "dest" => UiCommand::SetDestination(WaypointInput::Text(rest.to_owned())),
        "draw" => UiCommand::Draw,
        "me" => UiCommand::UseLocation,
        "locate" => UiCommand::Locate,
        "clear" => UiCommand::Clear,
        "stops" => match rest {
            "on" => UiCommand::ShowStops(true),
            "off" => UiCommand::ShowStops(false),
            "" => return Err(ParseError::MissingArgument("on or off")),
            other => {
                return Err(ParseError::InvalidArgument {
                    name: "switch",
                    value: other.to_owned(),
                })
            }
        },
        "pan" => UiCommand::MoveMap(viewport(rest)?),
        "stop" => UiCommand::OpenStop(Id::from(required(rest, "stop id")?)),
        "close" => UiCommand::ClosePopup,
        "go" => UiCommand::RouteToStop(Id::from(required(rest, "stop id")?)),
        "line" => UiCommand::SearchLine(rest.to_owned()),
        "drag" => {
            let (index, point) = indexed_point(rest)?;
            UiCommand::DragWaypoint { index, point }
        }
        "insert" => {
            let (index, point) = indexed_point(rest)?;
            UiCommand::InsertWaypoint { index, point }
        }
        "unplace" => UiCommand::RemoveWaypoint(index(required(rest, "index")?)?),
        other => return Err(ParseError::UnknownCommand(other.to_owned())),
    };
    Ok(Input::Command(command))
}
