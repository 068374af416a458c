//! Motion-cluster analysis: "attractor" points the camera engine should pan
//! toward — either a dwell cluster's centroid or a cinematic average of
//! recent cursor motion (spec.md §4.E).

use camwright_project_model::{MouseEvent, Point2D};

use crate::mouse_interp::interpolate_mouse;

const CINEMATIC_WINDOW_MS: f64 = 400.0;
const CINEMATIC_SAMPLES: usize = 8;
const MIN_CLUSTER_DURATION_MS: f64 = 400.0;

/// A dwell region: the cursor stayed within `cluster_radius` of a moving
/// centroid for at least [`MIN_CLUSTER_DURATION_MS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCluster {
    pub start_t: f64,
    pub end_t: f64,
    pub centroid: Point2D,
}

/// Scan `events` (sorted ascending by timestamp) for dwell clusters. The
/// cluster radius scales with the source diagonal so the same dwell
/// tolerance applies across recording resolutions.
pub fn detect_clusters(events: &[MouseEvent], source_width: f64, source_height: f64) -> Vec<MotionCluster> {
    let radius = 0.15 * (source_width * source_width + source_height * source_height).sqrt();
    let mut clusters = Vec::new();
    if events.is_empty() {
        return clusters;
    }

    let mut start_t = events[0].t;
    let mut sum_x = events[0].x;
    let mut sum_y = events[0].y;
    let mut count = 1usize;
    let mut last_t = events[0].t;

    let mut close = |clusters: &mut Vec<MotionCluster>, start_t: f64, last_t: f64, sum_x: f64, sum_y: f64, count: usize| {
        if last_t - start_t >= MIN_CLUSTER_DURATION_MS {
            clusters.push(MotionCluster {
                start_t,
                end_t: last_t,
                centroid: Point2D::new(sum_x / count as f64, sum_y / count as f64),
            });
        }
    };

    for event in &events[1..] {
        let centroid_x = sum_x / count as f64;
        let centroid_y = sum_y / count as f64;
        let dist = ((event.x - centroid_x).powi(2) + (event.y - centroid_y).powi(2)).sqrt();

        if dist <= radius {
            sum_x += event.x;
            sum_y += event.y;
            count += 1;
            last_t = event.t;
        } else {
            close(&mut clusters, start_t, last_t, sum_x, sum_y, count);
            start_t = event.t;
            sum_x = event.x;
            sum_y = event.y;
            count = 1;
            last_t = event.t;
        }
    }
    close(&mut clusters, start_t, last_t, sum_x, sum_y, count);

    clusters
}

/// The point the camera should pan toward at time `t`: a dwell cluster's
/// centroid when `t` falls in `[cluster.start, cluster.end + 400ms]`,
/// otherwise a cinematic average of the raw cursor motion.
pub fn calculate_attractor(clusters: &[MotionCluster], events: &[MouseEvent], t: f64) -> Point2D {
    for cluster in clusters {
        if t >= cluster.start_t && t <= cluster.end_t + 400.0 {
            return cluster.centroid;
        }
    }
    cinematic_average(events, t)
}

fn cinematic_average(events: &[MouseEvent], t: f64) -> Point2D {
    let mut sum = Point2D::new(0.0, 0.0);
    for i in 0..CINEMATIC_SAMPLES {
        let sample_t = t - CINEMATIC_WINDOW_MS * i as f64 / CINEMATIC_SAMPLES as f64;
        let p = interpolate_mouse(events, sample_t).unwrap_or(Point2D::new(0.0, 0.0));
        sum.x += p.x;
        sum.y += p.y;
    }
    Point2D::new(sum.x / CINEMATIC_SAMPLES as f64, sum.y / CINEMATIC_SAMPLES as f64)
}
