use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt::{Debug, Formatter},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError<T>
where
    T: Debug,
{
    #[error("Cycle detected in dependency graph, from {:?}", .0)]
    CycleDetected(DepRoute<T>),
    #[error("Duplicate edge detected in dependency graph, from {:?}", .0)]
    DuplicateEdge(DepRoute<T>),
}

pub struct DepRoute<T> {
    // first is where the walk started, last is where it ended
    route: Vec<T>,
}

impl<T> DepRoute<T> {
    pub fn nodes(&self) -> &[T] {
        &self.route
    }
}

impl<T> Debug for DepRoute<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some((last, rest)) = self.route.split_last() else {
            return write!(f, "[]");
        };
        for item in rest {
            write!(f, "{item:?} -> ")?;
        }
        write!(f, "{last:?}")
    }
}

/// Dependency graph: an edge `from -> to` means `to` reads `from`.
#[derive(Debug)]
pub struct Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    edges: BTreeMap<Node, BTreeSet<Node>>,
    duplicates: Vec<(Node, Node)>,

    downstream_cache: BTreeMap<Node, BTreeSet<Node>>,
}

impl<Node> Default for Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Node> Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
            duplicates: Vec::new(),
            downstream_cache: BTreeMap::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.edges.entry(node).or_default();
    }

    pub fn route_to(&mut self, from: Node, to: Node) {
        self.add_node(to);
        if !self.edges.entry(from).or_default().insert(to) {
            self.duplicates.push((from, to));
        }
        self.downstream_cache.clear();
    }

    /// Kahn's algorithm. Returns every node so that each comes after all it depends on.
    pub fn topology_sort(&self) -> Result<Vec<Node>, TopologyError<Node>> {
        if let Some(&(from, to)) = self.duplicates.first() {
            return Err(TopologyError::DuplicateEdge(DepRoute {
                route: vec![from, to],
            }));
        }

        let mut in_degree: BTreeMap<Node, usize> =
            self.edges.keys().map(|node| (*node, 0)).collect();
        for targets in self.edges.values() {
            for to in targets {
                *in_degree.entry(*to).or_default() += 1;
            }
        }

        let mut ready: VecDeque<Node> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| *node)
            .collect();
        let mut order = Vec::with_capacity(in_degree.len());

        while let Some(node) = ready.pop_front() {
            order.push(node);
            for to in self.direct_downstream(node) {
                if let Some(degree) = in_degree.get_mut(&to) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(to);
                    }
                }
            }
        }

        if order.len() == in_degree.len() {
            return Ok(order);
        }

        let remaining: BTreeSet<Node> = in_degree
            .into_iter()
            .filter(|(node, _)| !order.contains(node))
            .map(|(node, _)| node)
            .collect();
        let route = self.find_cycle(&remaining).unwrap_or_default();
        Err(TopologyError::CycleDetected(DepRoute { route }))
    }

    fn find_cycle(&self, nodes: &BTreeSet<Node>) -> Option<Vec<Node>> {
        let mut visited = BTreeSet::new();
        let mut on_path = BTreeSet::new();
        let mut path = Vec::new();
        let mut stack: Vec<(Node, std::vec::IntoIter<Node>)> = Vec::new();

        let neighbours = |node: Node| {
            self.direct_downstream(node)
                .filter(|n| nodes.contains(n))
                .collect::<Vec<_>>()
                .into_iter()
        };

        for &start in nodes {
            if !visited.insert(start) {
                continue;
            }
            on_path.insert(start);
            path.push(start);
            stack.push((start, neighbours(start)));

            while let Some((current, next)) = stack.last_mut() {
                match next.next() {
                    Some(neighbour) if on_path.contains(&neighbour) => {
                        let pos = path.iter().position(|n| *n == neighbour)?;
                        let mut cycle = path[pos..].to_vec();
                        cycle.push(neighbour);
                        return Some(cycle);
                    }
                    Some(neighbour) => {
                        if visited.insert(neighbour) {
                            on_path.insert(neighbour);
                            path.push(neighbour);
                            stack.push((neighbour, neighbours(neighbour)));
                        }
                    }
                    None => {
                        let done = *current;
                        stack.pop();
                        on_path.remove(&done);
                        path.pop();
                    }
                }
            }
        }
        None
    }

    /// Every node that transitively depends on `node`.
    pub fn downstream(&mut self, node: Node) -> &BTreeSet<Node> {
        if !self.downstream_cache.contains_key(&node) {
            let collected = self.collect_downstream(node);
            self.downstream_cache.insert(node, collected);
        }
        &self.downstream_cache[&node]
    }

    fn direct_downstream(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.edges.get(&node).into_iter().flatten().copied()
    }

    fn collect_downstream(&self, node: Node) -> BTreeSet<Node> {
        let mut collected = BTreeSet::new();
        let mut queue = VecDeque::from([node]);

        while let Some(current) = queue.pop_front() {
            for to in self.direct_downstream(current) {
                // the collected check also keeps a cyclic graph from looping forever
                if collected.insert(to) {
                    queue.push_back(to);
                }
            }
        }

        collected
    }
}
