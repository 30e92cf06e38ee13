//! Lloyd's k-means over pickup locations with k-means++ seeding.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::spatial::{centroid, Location};

#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster index of every input point.
    pub labels: Vec<usize>,
    pub centroids: Vec<Location>,
}

impl Clustering {
    pub fn cluster_count(&self) -> usize {
        self.centroids.len()
    }

    #[cfg(test)]
    fn members(&self, cluster: usize) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |(_, &label)| label == cluster)
            .map(|(idx, _)| idx)
    }
}

/// Partition `points` into at most `k` clusters minimising the within-cluster
/// sum of squared distances.
///
/// `k <= 1` gives one cluster at the mean location. `k >= points.len()` gives
/// one singleton cluster per point. The RNG is seeded from `seed` on every call
/// so identical inputs always give identical clusters.
pub fn kmeans(points: &[Location], k: usize, max_iterations: usize, seed: u64) -> Clustering {
    if points.is_empty() {
        return Clustering {
            labels: Vec::new(),
            centroids: Vec::new(),
        };
    }
    if k <= 1 {
        return Clustering {
            labels: vec![0; points.len()],
            centroids: centroid(points).into_iter().collect(),
        };
    }
    if k >= points.len() {
        return Clustering {
            labels: (0..points.len()).collect(),
            centroids: points.to_vec(),
        };
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = seed_plus_plus(points, k, &mut rng);
    let mut labels = vec![usize::MAX; points.len()];

    for _ in 0..max_iterations.max(1) {
        let changed = assign_points(points, &centroids, &mut labels);
        recompute_centroids(points, &mut labels, &mut centroids);
        if !changed {
            break;
        }
    }

    Clustering { labels, centroids }
}

fn nearest_centroid(point: &Location, centroids: &[Location]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (idx, c) in centroids.iter().enumerate() {
        let d = point.squared_distance_to(c);
        if d < best_distance {
            best = idx;
            best_distance = d;
        }
    }
    best
}

/// k-means++: each new centre is drawn with probability proportional to its
/// squared distance from the nearest centre already chosen.
fn seed_plus_plus(points: &[Location], k: usize, rng: &mut StdRng) -> Vec<Location> {
    let mut chosen = vec![false; points.len()];
    let first = rng.gen_range(0..points.len());
    chosen[first] = true;
    let mut centroids = vec![points[first]];

    while centroids.len() < k {
        let distances: Vec<f64> = points
            .iter()
            .map(|p| p.squared_distance_to(&centroids[nearest_centroid(p, &centroids)]))
            .collect();
        let total: f64 = distances.iter().sum();

        let next = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut pick = None;
            for (idx, d) in distances.iter().enumerate() {
                cumulative += d;
                if *d > 0.0 && cumulative >= target {
                    pick = Some(idx);
                    break;
                }
            }
            // Rounding can leave the target just past the last bucket.
            pick.or_else(|| distances.iter().rposition(|d| *d > 0.0))
        } else {
            None
        };
        // All remaining points coincide with a centre: take any unused one.
        let next = next
            .or_else(|| chosen.iter().position(|used| !used))
            .unwrap_or(0);
        chosen[next] = true;
        centroids.push(points[next]);
    }
    centroids
}

fn assign_points(points: &[Location], centroids: &[Location], labels: &mut [usize]) -> bool {
    let mut changed = false;
    for (point, label) in points.iter().zip(labels.iter_mut()) {
        let nearest = nearest_centroid(point, centroids);
        if *label != nearest {
            *label = nearest;
            changed = true;
        }
    }
    changed
}

/// Move every centroid to the mean of its members. An empty cluster steals the
/// point farthest from its own centroid among clusters with more than one
/// member.
fn recompute_centroids(points: &[Location], labels: &mut [usize], centroids: &mut [Location]) {
    let k = centroids.len();
    let mut sizes = vec![0usize; k];
    for &label in labels.iter() {
        sizes[label] += 1;
    }

    for cluster in 0..k {
        if sizes[cluster] > 0 {
            continue;
        }
        let donor = points
            .iter()
            .enumerate()
            .filter(|(idx, _)| sizes[labels[*idx]] > 1)
            .map(|(idx, p)| (idx, p.squared_distance_to(&centroids[labels[idx]])))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((idx, _)) = donor {
            sizes[labels[idx]] -= 1;
            labels[idx] = cluster;
            sizes[cluster] = 1;
        }
    }

    for (cluster, c) in centroids.iter_mut().enumerate() {
        let members = points
            .iter()
            .zip(labels.iter())
            .filter(|(_, &label)| label == cluster)
            .map(|(p, _)| p);
        if let Some(mean) = centroid(members) {
            *c = mean;
        }
    }
}
