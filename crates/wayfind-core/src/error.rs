use std::fmt;

/// Failure taxonomy shared by every wayfind error type.
///
/// Each module keeps its own error enum; `kind()` on those enums collapses
/// them onto this set so callers can branch on the class of failure without
/// matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument violates a structural precondition
    /// (non-member endpoint, undirected edge, negative weight, ...).
    InvalidInput,
    /// The referenced entity is not currently part of the structure.
    NotFound,
    /// The operation needs at least one element.
    Empty,
    /// An argument value is out of the accepted range for the operation.
    InvalidArgument,
    /// The operation needs a prior computation, or a precondition was
    /// violated after construction.
    InvalidState,
    /// An integer node index is outside `[0, node_count)`.
    IndexOutOfBounds,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidInput => "invalid input",
            Self::NotFound => "not found",
            Self::Empty => "empty",
            Self::InvalidArgument => "invalid argument",
            Self::InvalidState => "invalid state",
            Self::IndexOutOfBounds => "index out of bounds",
        };
        f.write_str(name)
    }
}

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EndpointNotInGraph,
    UndirectedEdge,
    ElementAlreadyQueued,
    InvalidPriority,
    InvalidGraph,
    NodeNotInGraph,
    NodeNotFound,
    EdgeNotFound,
    NodeIndexOutOfRange,
    QueueEmpty,
    ElementNotQueued,
    PriorityNotDecreased,
    NotComputed,
    GraphChanged,
    StaleRun,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EndpointNotInGraph => "E1001",
            Self::UndirectedEdge => "E1002",
            Self::ElementAlreadyQueued => "E1003",
            Self::InvalidPriority => "E1004",
            Self::InvalidGraph => "E1005",
            Self::NodeNotInGraph => "E1006",
            Self::NodeNotFound => "E2001",
            Self::EdgeNotFound => "E2002",
            Self::NodeIndexOutOfRange => "E2003",
            Self::QueueEmpty => "E3001",
            Self::ElementNotQueued => "E3002",
            Self::PriorityNotDecreased => "E3003",
            Self::NotComputed => "E4001",
            Self::GraphChanged => "E4002",
            Self::StaleRun => "E4003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::EndpointNotInGraph => "Edge endpoint is not a node of the graph",
            Self::UndirectedEdge => "Edge is not directed",
            Self::ElementAlreadyQueued => "Element is already in the queue",
            Self::InvalidPriority => "Priority is not a number",
            Self::InvalidGraph => "Graph is not usable for shortest paths",
            Self::NodeNotInGraph => "Node is not a member of the graph",
            Self::NodeNotFound => "Node not found",
            Self::EdgeNotFound => "Edge not found",
            Self::NodeIndexOutOfRange => "Node index out of range",
            Self::QueueEmpty => "Priority queue is empty",
            Self::ElementNotQueued => "Element is not in the queue",
            Self::PriorityNotDecreased => "New priority is not lower than the current one",
            Self::NotComputed => "Shortest paths have not been computed",
            Self::GraphChanged => "Graph no longer satisfies shortest-path preconditions",
            Self::StaleRun => "Computed paths do not match the current graph",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::EndpointNotInGraph => Some("Add both endpoint nodes before adding the edge."),
            Self::UndirectedEdge => Some("Build the edge with `GraphEdge::directed` or `weighted`."),
            Self::ElementAlreadyQueued => {
                Some("Use `decrease_priority` to reposition a queued element.")
            }
            Self::InvalidGraph => Some(
                "Use a non-empty directed graph whose edges all carry non-negative weights.",
            ),
            Self::NotComputed => Some("Call `compute_shortest_paths_from` first."),
            Self::GraphChanged | Self::StaleRun => {
                Some("Fix the graph and call `compute_shortest_paths_from` again.")
            }
            Self::PriorityNotDecreased => Some("Priorities may only move down while queued."),
            Self::InvalidPriority
            | Self::NodeNotInGraph
            | Self::NodeNotFound
            | Self::EdgeNotFound
            | Self::NodeIndexOutOfRange
            | Self::QueueEmpty
            | Self::ElementNotQueued => None,
        }
    }

    /// Failure class this code belongs to.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::EndpointNotInGraph
            | Self::UndirectedEdge
            | Self::ElementAlreadyQueued
            | Self::InvalidPriority
            | Self::InvalidGraph
            | Self::NodeNotInGraph => ErrorKind::InvalidInput,
            Self::NodeNotFound | Self::EdgeNotFound | Self::ElementNotQueued => ErrorKind::NotFound,
            Self::NodeIndexOutOfRange => ErrorKind::IndexOutOfBounds,
            Self::QueueEmpty => ErrorKind::Empty,
            Self::PriorityNotDecreased => ErrorKind::InvalidArgument,
            Self::NotComputed | Self::GraphChanged | Self::StaleRun => ErrorKind::InvalidState,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
