use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::records::CompetitorRecord;

/// Tuning knobs for hotspot clustering. The defaults mirror what the
/// product surfaces today: a lone business is not a hotspot, and the map
/// view only plots the top three clusters.
#[derive(Debug, Clone, Copy)]
pub struct ClusterLimits {
    pub min_cluster_size: usize,
    pub max_hotspots: usize,
}

impl Default for ClusterLimits {
    fn default() -> Self {
        Self {
            min_cluster_size: 2,
            max_hotspots: 3,
        }
    }
}

/// A neighborhood-level competitor cluster with centroid coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hotspot {
    pub name: String,
    pub competitors: usize,
    pub rating: f64,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub competitors: usize,
    pub hotspots: usize,
    pub avg_rating: f64,
    pub competitor_hotspots: Vec<Hotspot>,
}

impl SummaryMetrics {
    fn empty() -> Self {
        Self {
            competitors: 0,
            hotspots: 0,
            avg_rating: 0.0,
            competitor_hotspots: Vec::new(),
        }
    }
}

/// Groups competitors by neighborhood label and keeps the densest clusters.
///
/// Members without a usable coordinate still count toward cluster size but
/// are excluded from the centroid; a cluster with no usable coordinates gets
/// a (0,0) centroid. Ties in cluster size keep first-seen grouping order.
pub fn cluster_by_neighborhood(
    competitors: &[CompetitorRecord],
    limits: ClusterLimits,
) -> Vec<Hotspot> {
    if competitors.is_empty() {
        return Vec::new();
    }

    // Insertion-ordered grouping; input is capped at the search limit so a
    // linear scan per record is fine.
    let mut groups: Vec<(&str, Vec<&CompetitorRecord>)> = Vec::new();
    for record in competitors {
        let label = record.neighborhood_label();
        match groups.iter_mut().find(|(name, _)| *name == label) {
            Some((_, members)) => members.push(record),
            None => groups.push((label, vec![record])),
        }
    }

    let mut hotspots: Vec<Hotspot> = groups
        .into_iter()
        .filter(|(_, members)| members.len() >= limits.min_cluster_size)
        .map(|(name, members)| {
            let mut lat_sum = 0.0;
            let mut lng_sum = 0.0;
            let mut coord_count = 0usize;
            let mut rating_sum = 0.0;

            for member in &members {
                if let Some((lat, lng)) = member.valid_coordinates() {
                    lat_sum += lat;
                    lng_sum += lng;
                    coord_count += 1;
                }
                rating_sum += member.rating;
            }

            let competitors = members.len();
            let (lat, lng) = if coord_count > 0 {
                (lat_sum / coord_count as f64, lng_sum / coord_count as f64)
            } else {
                (0.0, 0.0)
            };

            trace!(
                name,
                competitors,
                coord_count,
                "clustered neighborhood group"
            );

            Hotspot {
                name: name.to_string(),
                competitors,
                rating: round_one_decimal(rating_sum / competitors as f64),
                lat,
                lng,
            }
        })
        .collect();

    // sort_by is stable, so equal counts preserve grouping order.
    hotspots.sort_by(|a, b| b.competitors.cmp(&a.competitors));
    hotspots.truncate(limits.max_hotspots);
    hotspots
}

/// Builds overall summary metrics for a competitor set. Empty input yields
/// the all-zero record; unrated businesses (rating 0) are excluded from the
/// overall average.
pub fn summarize(competitors: &[CompetitorRecord], limits: ClusterLimits) -> SummaryMetrics {
    if competitors.is_empty() {
        return SummaryMetrics::empty();
    }

    let hotspots = cluster_by_neighborhood(competitors, limits);

    let mut rating_sum = 0.0;
    let mut rating_count = 0usize;
    for record in competitors {
        if record.rating > 0.0 {
            rating_sum += record.rating;
            rating_count += 1;
        }
    }

    let avg_rating = if rating_count > 0 {
        round_one_decimal(rating_sum / rating_count as f64)
    } else {
        0.0
    };

    SummaryMetrics {
        competitors: competitors.len(),
        hotspots: hotspots.len(),
        avg_rating,
        competitor_hotspots: hotspots,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CompetitorLocation, Coordinates};

    fn competitor(
        id: &str,
        neighborhood: &str,
        rating: f64,
        coords: Option<(f64, f64)>,
    ) -> CompetitorRecord {
        CompetitorRecord {
            id: id.into(),
            name: format!("Business {id}"),
            rating,
            review_count: 25,
            location: CompetitorLocation {
                neighborhood: Some(vec![neighborhood.into()]),
                city: Some("Testville".into()),
                ..Default::default()
            },
            coordinates: coords.map(|(lat, lng)| Coordinates {
                latitude: Some(lat),
                longitude: Some(lng),
            }),
            categories: Vec::new(),
        }
    }

    #[test]
    fn empty_input_yields_all_zero_metrics() {
        let metrics = summarize(&[], ClusterLimits::default());
        assert_eq!(metrics.competitors, 0);
        assert_eq!(metrics.hotspots, 0);
        assert_eq!(metrics.avg_rating, 0.0);
        assert!(metrics.competitor_hotspots.is_empty());
    }

    #[test]
    fn downtown_cluster_gets_centroid_and_rounded_rating() {
        let competitors = vec![
            competitor("1", "Downtown", 4.0, Some((40.0, -74.0))),
            competitor("2", "Downtown", 4.5, Some((40.0025, -74.0025))),
            competitor("3", "Downtown", 4.2, Some((40.005, -74.005))),
            competitor("4", "Downtown", 4.8, Some((40.0075, -74.0075))),
            competitor("5", "Downtown", 4.1, Some((40.01, -74.01))),
        ];

        let hotspots = cluster_by_neighborhood(&competitors, ClusterLimits::default());
        assert_eq!(hotspots.len(), 1);
        let spot = &hotspots[0];
        assert_eq!(spot.name, "Downtown");
        assert_eq!(spot.competitors, 5);
        assert_eq!(spot.rating, 4.3);
        assert!((spot.lat - 40.005).abs() < 1e-9);
        assert!((spot.lng - -74.005).abs() < 1e-9);
    }

    #[test]
    fn singleton_groups_are_dropped() {
        let competitors = vec![
            competitor("1", "North End", 4.0, None),
            competitor("2", "South End", 3.5, None),
            competitor("3", "South End", 4.5, None),
        ];

        let hotspots = cluster_by_neighborhood(&competitors, ClusterLimits::default());
        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].name, "South End");
        assert!(hotspots.iter().all(|h| h.competitors >= 2));
    }

    #[test]
    fn caps_output_and_breaks_ties_by_grouping_order() {
        let mut competitors = Vec::new();
        for (idx, name) in ["Alpha", "Bravo", "Charlie", "Delta", "Echo"]
            .iter()
            .enumerate()
        {
            competitors.push(competitor(&format!("{idx}a"), name, 4.0, None));
            competitors.push(competitor(&format!("{idx}b"), name, 4.0, None));
        }

        let hotspots = cluster_by_neighborhood(&competitors, ClusterLimits::default());
        assert_eq!(hotspots.len(), 3);
        assert_eq!(hotspots[0].name, "Alpha");
        assert_eq!(hotspots[1].name, "Bravo");
        assert_eq!(hotspots[2].name, "Charlie");
    }

    #[test]
    fn invalid_coordinates_count_toward_size_but_not_centroid() {
        let competitors = vec![
            competitor("1", "Harborside", 4.0, Some((41.0, -70.0))),
            competitor("2", "Harborside", 5.0, Some((0.0, 0.0))),
            competitor("3", "Harborside", 0.0, None),
        ];

        let hotspots = cluster_by_neighborhood(&competitors, ClusterLimits::default());
        assert_eq!(hotspots[0].competitors, 3);
        assert_eq!(hotspots[0].lat, 41.0);
        assert_eq!(hotspots[0].lng, -70.0);
        // mean of [4.0, 5.0, 0.0]
        assert_eq!(hotspots[0].rating, 3.0);
    }

    #[test]
    fn no_valid_coordinates_yields_origin_centroid() {
        let competitors = vec![
            competitor("1", "Old Town", 4.0, None),
            competitor("2", "Old Town", 4.0, Some((f64::NAN, -70.0))),
        ];

        let hotspots = cluster_by_neighborhood(&competitors, ClusterLimits::default());
        assert_eq!(hotspots[0].lat, 0.0);
        assert_eq!(hotspots[0].lng, 0.0);
    }

    #[test]
    fn unrated_competitors_are_excluded_from_overall_average() {
        let competitors = vec![
            competitor("1", "Midtown", 0.0, None),
            competitor("2", "Midtown", 0.0, None),
        ];

        let metrics = summarize(&competitors, ClusterLimits::default());
        assert_eq!(metrics.competitors, 2);
        assert_eq!(metrics.avg_rating, 0.0);
        assert_eq!(metrics.hotspots, 1);
    }

    #[test]
    fn average_rating_stays_within_bounds() {
        let competitors = vec![
            competitor("1", "Uptown", 5.0, None),
            competitor("2", "Uptown", 0.0, None),
            competitor("3", "Uptown", 3.4, None),
        ];

        let metrics = summarize(&competitors, ClusterLimits::default());
        assert!(metrics.avg_rating >= 0.0 && metrics.avg_rating <= 5.0);
        // mean of [5.0, 3.4]
        assert_eq!(metrics.avg_rating, 4.2);
    }

    #[test]
    fn respects_custom_limits() {
        let competitors = vec![
            competitor("1", "Solo", 4.0, None),
            competitor("2", "Duo", 4.0, None),
            competitor("3", "Duo", 4.0, None),
        ];

        let limits = ClusterLimits {
            min_cluster_size: 1,
            max_hotspots: 1,
        };
        let hotspots = cluster_by_neighborhood(&competitors, limits);
        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].name, "Duo");
    }
}
