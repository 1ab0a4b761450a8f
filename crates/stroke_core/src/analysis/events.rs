//! # Event Detector
//!
//! - **Breath**: head rises, i.e. local minima of the nose's image `y`
//!   (peaks of `-y`)
//! - **Kick**: ankle speed peaks, one pass per leg
//!
//! Each detector runs [`find_peaks`] with its own parameters. No events is a
//! valid outcome.

use tracing::debug;

use super::kinematics::Kinematics;
use super::signal::find_peaks;
use crate::config::EventConfig;
use crate::models::{BodyPoint, BodySide, Event, EventKind, Metric};

/// All breath and kick events, sorted by frame then kind.
pub fn detect_events(kinematics: &Kinematics, config: &EventConfig) -> Vec<Event> {
    let frames = kinematics.series.frame_indices();

    let head: Vec<f64> = kinematics
        .tracks
        .track(BodyPoint::Nose)
        .iter()
        .map(|p| p.map_or(f64::NAN, |v| -v.y))
        .collect();

    let mut events: Vec<Event> = find_peaks(&head, &config.breath)
        .into_iter()
        .map(|peak| Event {
            kind: EventKind::Breath,
            frame_index: frames[peak.index],
            strength: peak.prominence,
            side: None,
        })
        .collect();

    for side in [BodySide::Left, BodySide::Right] {
        let Some(speed) = kinematics.series.get(Metric::ankle_velocity(side)) else {
            continue;
        };
        events.extend(find_peaks(speed, &config.kick).into_iter().map(|peak| Event {
            kind: EventKind::Kick,
            frame_index: frames[peak.index],
            strength: peak.prominence,
            side: Some(side),
        }));
    }

    events.sort_by(|a, b| {
        a.frame_index
            .cmp(&b.frame_index)
            .then(a.kind.cmp(&b.kind))
            .then(a.side.cmp(&b.side))
    });

    debug!(
        breaths = count(&events, EventKind::Breath),
        kicks = count(&events, EventKind::Kick),
        "events detected"
    );
    events
}

pub fn count(events: &[Event], kind: EventKind) -> usize {
    events.iter().filter(|e| e.kind == kind).count()
}
