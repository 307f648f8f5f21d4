use model::stop::{StopFeature, StopLine};
use transit_api::ApiResult;
use utility::id::Id;

pub const VISIBLE_STOPS_LIMIT: usize = 2000;

pub const STOPS_FAILED: &str = "Stops could not be loaded.";
pub const NO_LINES: &str = "No line serves this stop.";
pub const LINES_FAILED: &str = "Lines could not be loaded.";

/// Stops of the visible map area, shown while the layer is switched on.
#[derive(Debug, Clone, Default)]
pub struct StopLayer {
    enabled: bool,
    stops: Vec<StopFeature>,
}

impl StopLayer {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn stops(&self) -> &[StopFeature] {
        &self.stops
    }

    /// Returns whether the viewport's stops need loading.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.enabled = enabled;
        if !enabled {
            self.stops.clear();
        }
        enabled
    }

    /// Replaces the shown stops. A load that lands after the layer was
    /// switched off is dropped.
    pub fn replace(&mut self, stops: Vec<StopFeature>) -> bool {
        if !self.enabled {
            log::debug!("stop layer is off, dropping {} stop(s)", stops.len());
            return false;
        }
        self.stops = stops;
        true
    }

    pub fn find(&self, id: &Id<StopFeature>) -> Option<&StopFeature> {
        self.stops.iter().find(|stop| &stop.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupLines {
    Loading,
    Lines(Vec<StopLine>),
    NoLines,
    Failed,
}

impl From<ApiResult<Vec<StopLine>>> for PopupLines {
    fn from(result: ApiResult<Vec<StopLine>>) -> Self {
        match result {
            Ok(lines) if lines.is_empty() => PopupLines::NoLines,
            Ok(lines) => PopupLines::Lines(lines),
            Err(why) => {
                log::error!("loading stop lines failed: {why}");
                PopupLines::Failed
            }
        }
    }
}

/// The popup of an opened stop.
#[derive(Debug, Clone, PartialEq)]
pub struct StopPopup {
    pub stop: StopFeature,
    pub lines: PopupLines,
}

impl StopPopup {
    pub fn loading(stop: StopFeature) -> Self {
        Self {
            stop,
            lines: PopupLines::Loading,
        }
    }

    /// Popup body, one entry per line.
    pub fn render(&self) -> Vec<String> {
        let mut rows = vec![self.stop.name.clone()];
        if let Some(code) = &self.stop.code {
            rows.push(format!("Code: {code}"));
        }
        match &self.lines {
            PopupLines::Loading => rows.push("Loading lines...".to_owned()),
            PopupLines::Lines(lines) => rows.extend(lines.iter().map(StopLine::label)),
            PopupLines::NoLines => rows.push(NO_LINES.to_owned()),
            PopupLines::Failed => rows.push(LINES_FAILED.to_owned()),
        }
        rows
    }
}
