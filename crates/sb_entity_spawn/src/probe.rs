//! One-shot geometry measurement.
//!
//! The probe materializes an entity (with its whole passenger chain) in a
//! host world, folds every instance's bounding volume into one box, destroys
//! everything it spawned and reports the box relative to the spawn origin.

use sb_core::{BoundingBox, Hitbox, TagCompound, WorldPos};
use thiserror::Error;

use crate::host::{EntityHost, SpawnError};

/// Errors raised by [`measure_geometry`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbeError {
    #[error("Could not materialize entity for measurement: {0}")]
    Spawn(#[from] SpawnError),

    #[error("Materialized entity reported no bounding volume")]
    MissingBounds,
}

/// Measure the hitbox of `blob` by materializing it at `origin`.
///
/// `width` is the widest horizontal reach from `origin` in any of the four
/// horizontal directions; `height` is the top of the combined volume above
/// `origin`. Volume below `origin` is ignored. Nothing spawned by the probe
/// outlives the call.
pub fn measure_geometry<H: EntityHost>(host: &mut H, blob: &TagCompound, origin: WorldPos) -> Result<Hitbox, ProbeError> {
    let root = host.spawn_transient(blob, origin)?;

    let mut spawned = Vec::new();
    collect_chain(host, root, &mut spawned);

    let bounds = spawned
        .iter()
        .map(|&handle| host.bounding_box(handle))
        .try_fold(None, |acc: Option<BoundingBox>, bb| {
            bb.map(|bb| Some(acc.map_or(bb, |acc| acc.union(&bb))))
        });

    // Passengers first, so every destroy targets a leaf.
    for &handle in spawned.iter().rev() {
        host.destroy(handle);
    }

    let bounds = bounds.flatten().ok_or(ProbeError::MissingBounds)?;
    Ok(Hitbox::new(bounds.horizontal_reach(origin), bounds.height_above(origin)))
}

/// Depth-first list of `handle` and everything riding it.
fn collect_chain<H: EntityHost>(host: &H, handle: H::Handle, out: &mut Vec<H::Handle>) {
    out.push(handle);
    for passenger in host.passengers(handle) {
        collect_chain(host, passenger, out);
    }
}
