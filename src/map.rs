use serde::Serialize;
use serde_json::{Value, json};

use crate::journey::Chapter;
use crate::store::JourneyStore;

/// Environment variable holding the map-service access token.
pub const MAPBOX_TOKEN_ENV: &str = "CARTOLOG_MAPBOX_TOKEN";

/// Camera flight duration when the current chapter changes.
pub const FLY_DURATION_MS: u64 = 2000;

/// Starting view before any chapter is active: Singapore, where the
/// journey begins.
pub const HOME_CENTER: [f64; 2] = [103.8198, 1.3521];

/// Dashed amber line tracing the journey across the map.
pub const PATH_COLOR: &str = "#FF9F1C";

/// Viewport profile. Mobile gets a flatter, wider, less rotated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Desktop,
    Mobile,
}

impl Profile {
    fn idle_zoom(self) -> f64 {
        match self {
            Self::Desktop => 3.0,
            Self::Mobile => 2.0,
        }
    }

    fn chapter_zoom(self) -> f64 {
        match self {
            Self::Desktop => 6.0,
            Self::Mobile => 4.0,
        }
    }

    fn idle_pitch(self) -> f64 {
        match self {
            Self::Desktop => 45.0,
            Self::Mobile => 30.0,
        }
    }

    fn chapter_pitch(self) -> f64 {
        match self {
            Self::Desktop => 50.0,
            Self::Mobile => 30.0,
        }
    }

    /// Bearing sweep across the whole journey, degrees.
    fn bearing_sweep(self) -> f64 {
        match self {
            Self::Desktop => 60.0,
            Self::Mobile => 30.0,
        }
    }

    pub fn path_line_width(self) -> f64 {
        match self {
            Self::Desktop => 3.0,
            Self::Mobile => 2.0,
        }
    }
}

/// Where the map camera should be. Consumed by the renderer; the model
/// never draws anything itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    /// [longitude, latitude]
    pub center: [f64; 2],
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

/// The opening pose shown before data loads or outside any chapter.
pub fn idle_pose(profile: Profile) -> CameraPose {
    CameraPose {
        center: HOME_CENTER,
        zoom: profile.idle_zoom(),
        pitch: profile.idle_pitch(),
        bearing: 0.0,
    }
}

/// Derive the camera pose from the store's current state.
///
/// Inside a chapter the camera centers on its coordinates and the bearing
/// rotates with overall journey progress, so the view keeps drifting even
/// while the center holds still. Outside any chapter the camera returns
/// to the idle pose.
pub fn camera_pose(store: &JourneyStore, profile: Profile) -> CameraPose {
    match store.current_chapter() {
        None => idle_pose(profile),
        Some(ch) => CameraPose {
            center: ch.coordinates,
            zoom: profile.chapter_zoom(),
            pitch: profile.chapter_pitch(),
            bearing: store.scroll_progress() * profile.bearing_sweep(),
        },
    }
}

/// GeoJSON LineString feature connecting the chapter locations in order.
pub fn journey_path(chapters: &[Chapter]) -> Value {
    let coordinates: Vec<[f64; 2]> = chapters.iter().map(|ch| ch.coordinates).collect();
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        }
    })
}

/// Layer definition drawing the journey path as a dashed amber line.
pub fn path_layer(profile: Profile) -> Value {
    json!({
        "id": "journey-line",
        "type": "line",
        "source": "journey-path",
        "layout": {
            "line-join": "round",
            "line-cap": "round",
        },
        "paint": {
            "line-color": PATH_COLOR,
            "line-width": profile.path_line_width(),
            "line-opacity": 0.7,
            "line-dasharray": [2, 2],
        }
    })
}

/// Map rendering mode, decided once at startup from the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapView {
    /// Token present: live tiles.
    Live { token: String },
    /// No token: inert placeholder panel instead of a hard failure.
    Placeholder,
}

/// Resolve the map view from an optional configured token, falling back
/// to the environment.
pub fn resolve_view(configured: Option<&str>) -> MapView {
    let token = configured
        .map(str::to_string)
        .or_else(|| std::env::var(MAPBOX_TOKEN_ENV).ok())
        .filter(|t| !t.trim().is_empty());

    match token {
        Some(token) => MapView::Live { token },
        None => {
            log::info!("no map token configured, using placeholder view");
            MapView::Placeholder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::tests::chapter;

    #[test]
    fn idle_pose_outside_any_chapter() {
        let mut store = JourneyStore::new();
        store.set_chapters(vec![chapter("a", 0.2, 0.5)]);
        store.set_scroll_progress(0.05);

        let pose = camera_pose(&store, Profile::Desktop);
        assert_eq!(pose, idle_pose(Profile::Desktop));
        assert_eq!(pose.center, HOME_CENTER);
        assert_eq!(pose.bearing, 0.0);
    }

    #[test]
    fn chapter_pose_centers_on_its_coordinates() {
        let mut store = JourneyStore::new();
        let mut ch = chapter("ny", 0.7, 0.85);
        ch.coordinates = [-74.006, 40.7128];
        store.set_chapters(vec![ch]);
        store.set_scroll_progress(0.75);

        let pose = camera_pose(&store, Profile::Desktop);
        assert_eq!(pose.center, [-74.006, 40.7128]);
        assert_eq!(pose.zoom, 6.0);
        assert_eq!(pose.pitch, 50.0);
        assert!((pose.bearing - 45.0).abs() < 1e-12); // 0.75 * 60
    }

    #[test]
    fn mobile_profile_flattens_the_view() {
        let mut store = JourneyStore::new();
        store.set_chapters(vec![chapter("a", 0.0, 1.0)]);
        store.set_scroll_progress(0.5);

        let pose = camera_pose(&store, Profile::Mobile);
        assert_eq!(pose.zoom, 4.0);
        assert_eq!(pose.pitch, 30.0);
        assert!((pose.bearing - 15.0).abs() < 1e-12); // 0.5 * 30
    }

    #[test]
    fn journey_path_connects_chapters_in_order() {
        let mut a = chapter("a", 0.0, 0.3);
        a.coordinates = [103.8198, 1.3521];
        let mut b = chapter("b", 0.3, 0.6);
        b.coordinates = [-58.3816, -34.6037];

        let feature = journey_path(&[a, b]);
        assert_eq!(feature["geometry"]["type"], "LineString");
        let coords = feature["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0][0], 103.8198);
        assert_eq!(coords[1][1], -34.6037);
    }

    #[test]
    fn path_layer_styles_by_profile() {
        let desktop = path_layer(Profile::Desktop);
        assert_eq!(desktop["paint"]["line-color"], PATH_COLOR);
        assert_eq!(desktop["paint"]["line-width"], 3.0);

        let mobile = path_layer(Profile::Mobile);
        assert_eq!(mobile["paint"]["line-width"], 2.0);
    }

    #[test]
    fn missing_token_yields_placeholder() {
        assert_eq!(resolve_view(Some("  ")), MapView::Placeholder);
        assert_eq!(
            resolve_view(Some("pk.test")),
            MapView::Live {
                token: "pk.test".to_string()
            }
        );
    }
}
