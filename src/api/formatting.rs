//! Presentation text derived from the localization state and frame
//!
//! The tracking text is rebuilt on every tick. The status text is only an
//! override: when [`describe`] returns `None` the previously published status
//! stays on screen.

use crate::core::{
    EarthTrackingState, GeospatialFrame, GeospatialTransform, LOCALIZATION_FAILURE_MESSAGE, LOCALIZATION_TIP,
    NOT_TRACKING_MESSAGE,
};
use crate::localization::LocalizationState;

/// The two strings published to the UI for one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationText {
    pub tracking_text: String,
    pub status_text: Option<String>,
}

/// Derive the display strings for a tick
pub fn describe(state: LocalizationState, frame: &GeospatialFrame) -> PresentationText {
    let tracking_text = if !frame.earth_enabled() {
        format!("Bad EarthState: {}", frame.earth_state.code())
    } else if state.is_failed() {
        String::new()
    } else {
        match &frame.transform {
            Some(transform) => format_geospatial_transform(transform),
            None if frame.tracking_state == EarthTrackingState::Paused => {
                NOT_TRACKING_MESSAGE.to_string()
            }
            None => String::new(),
        }
    };

    let status_text = match state {
        LocalizationState::Failed => Some(LOCALIZATION_FAILURE_MESSAGE.to_string()),
        LocalizationState::Localizing => Some(LOCALIZATION_TIP.to_string()),
        LocalizationState::Pretracking | LocalizationState::Localized => None,
    };

    PresentationText { tracking_text, status_text }
}

/// Map a heading in degrees onto (-180, 180]
pub fn normalize_heading(heading_deg: f64) -> f64 {
    let wrapped = heading_deg % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

pub fn format_geospatial_transform(g: &GeospatialTransform) -> String {
    format!(
        "LAT/LONG: {:.6}°, {:.6}°\n    horizontal ACCURACY: {:.2}m\nALTITUDE: {:.2}m\n    vertical ACCURACY: {:.2}m    \nHEADING: {:.1}°\n    heading ACCURACY: {:.1}°",
        g.latitude,
        g.longitude,
        g.horizontal_accuracy,
        g.altitude,
        g.vertical_accuracy,
        normalize_heading(g.heading),
        g.heading_accuracy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EarthState;

    fn transform() -> GeospatialTransform {
        GeospatialTransform::new(36.091526, 136.211851, 42.5)
            .with_accuracy(3.456, 1.2)
            .with_heading(270.0, 4.3)
    }

    #[test]
    fn test_heading_normalization() {
        assert_eq!(normalize_heading(270.0), -90.0);
        assert_eq!(normalize_heading(90.0), 90.0);
        assert_eq!(normalize_heading(180.0), 180.0);
        assert_eq!(normalize_heading(-180.0), 180.0);
        assert_eq!(normalize_heading(0.0), 0.0);
        assert_eq!(normalize_heading(359.5), -0.5);
    }

    #[test]
    fn test_transform_format() {
        let text = format_geospatial_transform(&transform());
        assert_eq!(
            text,
            "LAT/LONG: 36.091526°, 136.211851°\n    horizontal ACCURACY: 3.46m\nALTITUDE: 42.50m\n    vertical ACCURACY: 1.20m    \nHEADING: -90.0°\n    heading ACCURACY: 4.3°"
        );
    }

    #[test]
    fn test_earth_error_reports_code() {
        let frame = GeospatialFrame::at_secs(0.0).with_earth_state(EarthState::ErrorResourceExhausted);
        let text = describe(LocalizationState::Failed, &frame);
        assert_eq!(text.tracking_text, "Bad EarthState: ERROR_RESOURCE_EXHAUSTED");
        assert_eq!(text.status_text.as_deref(), Some(LOCALIZATION_FAILURE_MESSAGE));
    }

    #[test]
    fn test_failed_clears_tracking_text() {
        let frame = GeospatialFrame::at_secs(0.0).with_transform(transform());
        let text = describe(LocalizationState::Failed, &frame);
        assert!(text.tracking_text.is_empty());
        assert_eq!(text.status_text.as_deref(), Some(LOCALIZATION_FAILURE_MESSAGE));
    }

    #[test]
    fn test_missing_transform() {
        let stopped = GeospatialFrame::at_secs(0.0);
        assert_eq!(describe(LocalizationState::Pretracking, &stopped).tracking_text, "");

        let paused = stopped.with_tracking_state(EarthTrackingState::Paused);
        let text = describe(LocalizationState::Localizing, &paused);
        assert_eq!(text.tracking_text, NOT_TRACKING_MESSAGE);
        assert_eq!(text.status_text.as_deref(), Some(LOCALIZATION_TIP));
    }

    #[test]
    fn test_transform_wins_over_paused() {
        let frame = GeospatialFrame::at_secs(0.0)
            .with_tracking_state(EarthTrackingState::Paused)
            .with_transform(transform());
        let text = describe(LocalizationState::Localized, &frame);
        assert!(text.tracking_text.starts_with("LAT/LONG: 36.091526°"));
        assert_eq!(text.status_text, None);
    }
}
