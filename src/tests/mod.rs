mod test_tophits;

use crate::builder::{LinkMethod, NetworkParams};

pub const IDENTIFIER: &str = "spectrumid";

/// Mid-sized configuration used by the random-matrix tests
pub fn network_params(link_method: LinkMethod) -> NetworkParams {
    NetworkParams {
        identifier: IDENTIFIER.to_owned(),
        top_n: 6,
        max_links: 3,
        score_cutoff: 0.4,
        link_method,
        keep_unconnected_nodes: true,
    }
}
