use crate::graph::Graph;

/// Base address of the Great Circle Mapper route viewer.
pub const GCMAP_BASE_URL: &str = "http://www.gcmap.com/mapui?P=";

/// Great Circle Mapper URL plotting every directed flight in the graph.
pub fn visualizer_url<T>(graph: &Graph<T>) -> String {
    let routes = graph
        .edges()
        .map(|edge| format!("{}-{}", edge.source, edge.target))
        .collect::<Vec<_>>()
        .join(",");
    format!("{GCMAP_BASE_URL}{routes}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphWriter;

    #[test]
    fn url_lists_directed_flights_in_scan_order() {
        let mut graph: Graph<()> = Graph::new();
        for code in ["SCL", "MEX", "LIM"] {
            graph.add_node(code, ()).unwrap();
        }
        graph.add_symmetric_edge("MEX", "LIM", 4231.0).unwrap();
        graph.add_symmetric_edge("SCL", "LIM", 2453.0).unwrap();

        assert_eq!(
            visualizer_url(&graph),
            "http://www.gcmap.com/mapui?P=SCL-LIM,MEX-LIM,LIM-SCL,LIM-MEX"
        );
    }

    #[test]
    fn empty_graph_has_bare_url() {
        let graph: Graph<()> = Graph::new();
        assert_eq!(visualizer_url(&graph), GCMAP_BASE_URL);
    }
}
