//! The scan driver: runs a [`ScanConfig`] to completion, producing a [`Scan`].
//!
//! Each root is walked and decoded independently on a data-parallel worker; a single collector
//! then ingests every root's facts sequentially in root order, so that shadowing resolves by
//! root index rather than by whichever worker happened to finish first.

use rayon::prelude::*;

use crate::classpath::{walk_root, WalkContext};
use crate::config::ScanConfig;
use crate::error::{Diagnostic, ScanError};
use crate::graph::HierarchyGraph;
use crate::query::Scan;

/// Runs `config` to completion.
pub fn run(config: &ScanConfig) -> Result<Scan, ScanError> {
    let options = config.decode_options();
    let name_filter = config.name_filter_ref();
    let walk_ctx = WalkContext {
        options: &options,
        name_filter,
        path_filter: config.path_filter_ref(),
        jar_filter: config.jar_filter_ref(),
        resource_patterns: config.resource_patterns(),
    };

    let per_root: Vec<(Vec<crate::jvm::fact::ClassFact>, Vec<Diagnostic>)> = config
        .roots()
        .par_iter()
        .enumerate()
        .map(|(root_index, root)| walk_root(root, root_index, &walk_ctx))
        .collect::<Result<Vec<_>, ScanError>>()?;

    let mut graph = HierarchyGraph::new();
    let mut diagnostics = Vec::new();

    for (facts, root_diagnostics) in per_root {
        diagnostics.extend(root_diagnostics);
        for fact in facts {
            if !name_filter.matches(&fact.binary_name) {
                continue;
            }
            if let Some(diagnostic) = graph.ingest(fact)? {
                diagnostics.push(diagnostic);
            }
        }
    }
    graph.finalize();

    Ok(Scan { graph, diagnostics })
}
