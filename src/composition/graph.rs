//! Structured filter-graph model.
//!
//! Nodes reference each other through pad labels. The graph is only turned
//! into the engine's `[in]op=params[out];...` text at the command boundary,
//! after [`FilterGraph::validate`] has checked that every label resolves.

use std::collections::HashSet;
use std::fmt;

use crate::composition::TransitionKind;
use crate::error::{CompositionError, Result};

/// One input pad of a filter node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pad {
    /// Video stream of the raw input at this index
    Input(usize),
    /// Output of an earlier node
    Label(String),
}

impl Pad {
    pub fn label<S: Into<String>>(label: S) -> Self {
        Self::Label(label.into())
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(index) => write!(f, "[{}:v]", index),
            Self::Label(label) => write!(f, "[{}]", label),
        }
    }
}

/// Filter operation with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Trim { start: f64, end: f64 },
    Xfade { transition: TransitionKind, duration: f64, offset: f64 },
    Scale { width: u32, height: u32 },
    HStack { inputs: usize },
    VStack { inputs: usize },
    ColorFill { color: String, width: u32, height: u32 },
}

impl FilterOp {
    /// Filter name as the engine knows it
    pub fn name(&self) -> &'static str {
        match self {
            Self::Trim { .. } => "trim",
            Self::Xfade { .. } => "xfade",
            Self::Scale { .. } => "scale",
            Self::HStack { .. } => "hstack",
            Self::VStack { .. } => "vstack",
            Self::ColorFill { .. } => "color",
        }
    }

    /// Number of input pads the operation consumes
    pub fn arity(&self) -> usize {
        match self {
            Self::ColorFill { .. } => 0,
            Self::Trim { .. } | Self::Scale { .. } => 1,
            Self::Xfade { .. } => 2,
            Self::HStack { inputs } | Self::VStack { inputs } => *inputs,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trim { start, end } => write!(f, "trim={}:{}", start, end),
            Self::Xfade { transition, duration, offset } => write!(
                f,
                "xfade=transition={}:duration={}:offset={}",
                transition, duration, offset
            ),
            Self::Scale { width, height } => write!(f, "scale={}:{}", width, height),
            Self::HStack { inputs } => write!(f, "hstack=inputs={}", inputs),
            Self::VStack { inputs } => write!(f, "vstack=inputs={}", inputs),
            Self::ColorFill { color, width, height } => {
                write!(f, "color=c={}:s={}x{}", color, width, height)
            }
        }
    }
}

/// One step of the filter graph
#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    pub op: FilterOp,
    pub inputs: Vec<Pad>,
    pub output: String,
}

impl FilterNode {
    pub fn new<S: Into<String>>(op: FilterOp, inputs: Vec<Pad>, output: S) -> Self {
        Self {
            op,
            inputs,
            output: output.into(),
        }
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pad in &self.inputs {
            write!(f, "{}", pad)?;
        }
        write!(f, "{}[{}]", self.op, self.output)
    }
}

/// Ordered list of filter nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGraph {
    nodes: Vec<FilterNode>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its output as a pad for later nodes
    pub fn push(&mut self, node: FilterNode) -> Pad {
        let pad = Pad::Label(node.output.clone());
        self.nodes.push(node);
        pad
    }

    pub fn nodes(&self) -> &[FilterNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Count nodes running the given filter
    pub fn count(&self, name: &str) -> usize {
        self.nodes.iter().filter(|n| n.op.name() == name).count()
    }

    /// Check the graph against `input_count` raw inputs and its final label
    ///
    /// Every label must be produced exactly once, every reference must point
    /// at a raw input or at an earlier node, each node must get as many pads
    /// as its operation consumes, and the last node must produce `final_label`.
    pub fn validate(&self, input_count: usize, final_label: &str) -> Result<()> {
        let invalid = |reason: String| CompositionError::InvalidGraph { reason };
        let mut produced: HashSet<&str> = HashSet::new();

        for node in &self.nodes {
            if node.inputs.len() != node.op.arity() {
                return Err(invalid(format!(
                    "{} expects {} inputs, got {} (output [{}])",
                    node.op.name(), node.op.arity(), node.inputs.len(), node.output
                )).into());
            }

            for pad in &node.inputs {
                match pad {
                    Pad::Input(index) if *index >= input_count => {
                        return Err(invalid(format!(
                            "[{}] reads input {} but only {} inputs exist",
                            node.output, index, input_count
                        )).into());
                    }
                    Pad::Label(label) if !produced.contains(label.as_str()) => {
                        return Err(invalid(format!(
                            "[{}] reads undefined label [{}]",
                            node.output, label
                        )).into());
                    }
                    _ => {}
                }
            }

            if !produced.insert(node.output.as_str()) {
                return Err(invalid(format!("duplicate output label [{}]", node.output)).into());
            }
        }

        match self.nodes.last() {
            Some(last) if last.output == final_label => Ok(()),
            Some(last) => Err(invalid(format!(
                "final label [{}] is not the last output [{}]",
                final_label, last.output
            )).into()),
            None => Err(invalid("graph has no nodes".to_string()).into()),
        }
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(input: usize, output: &str) -> FilterNode {
        FilterNode::new(FilterOp::Scale { width: 960, height: 540 }, vec![Pad::Input(input)], output)
    }

    #[test]
    fn test_node_text() {
        let node = FilterNode::new(
            FilterOp::Xfade { transition: TransitionKind::SlideLeft, duration: 1.0, offset: 9.0 },
            vec![Pad::label("v0"), Pad::label("v1")],
            "v",
        );
        assert_eq!(node.to_string(), "[v0][v1]xfade=transition=slideleft:duration=1:offset=9[v]");

        let trim = FilterNode::new(FilterOp::Trim { start: 0.0, end: 2.5 }, vec![Pad::Input(3)], "v3");
        assert_eq!(trim.to_string(), "[3:v]trim=0:2.5[v3]");

        let fill = FilterNode::new(
            FilterOp::ColorFill { color: "black".into(), width: 640, height: 360 },
            vec![],
            "fill2_1",
        );
        assert_eq!(fill.to_string(), "color=c=black:s=640x360[fill2_1]");
    }

    #[test]
    fn test_graph_text_is_semicolon_separated() {
        let mut graph = FilterGraph::new();
        let a = graph.push(scale(0, "v0"));
        let b = graph.push(scale(1, "v1"));
        graph.push(FilterNode::new(FilterOp::HStack { inputs: 2 }, vec![a, b], "v"));

        assert_eq!(
            graph.to_string(),
            "[0:v]scale=960:540[v0];[1:v]scale=960:540[v1];[v0][v1]hstack=inputs=2[v]"
        );
        assert!(graph.validate(2, "v").is_ok());
        assert_eq!(graph.count("scale"), 2);
    }

    #[test]
    fn test_dangling_label_is_rejected() {
        let mut graph = FilterGraph::new();
        graph.push(scale(0, "v0"));
        graph.push(FilterNode::new(
            FilterOp::HStack { inputs: 2 },
            vec![Pad::label("v0"), Pad::label("v9")],
            "v",
        ));
        assert!(graph.validate(2, "v").is_err());
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let mut graph = FilterGraph::new();
        graph.push(FilterNode::new(FilterOp::Scale { width: 1, height: 1 }, vec![Pad::label("v1")], "v0"));
        graph.push(scale(1, "v1"));
        assert!(graph.validate(2, "v1").is_err());
    }

    #[test]
    fn test_duplicate_label_is_rejected() {
        let mut graph = FilterGraph::new();
        graph.push(scale(0, "v0"));
        graph.push(scale(1, "v0"));
        assert!(graph.validate(2, "v0").is_err());
    }

    #[test]
    fn test_out_of_range_input_is_rejected() {
        let mut graph = FilterGraph::new();
        graph.push(scale(2, "v"));
        assert!(graph.validate(2, "v").is_err());
    }

    #[test]
    fn test_wrong_final_label_is_rejected() {
        let mut graph = FilterGraph::new();
        graph.push(scale(0, "v0"));
        assert!(graph.validate(1, "v").is_err());
        assert!(FilterGraph::new().validate(0, "v").is_err());
    }

    #[test]
    fn test_arity_mismatch_is_rejected() {
        let mut graph = FilterGraph::new();
        let a = graph.push(scale(0, "v0"));
        graph.push(FilterNode::new(FilterOp::VStack { inputs: 3 }, vec![a], "v"));
        assert!(graph.validate(1, "v").is_err());
    }
}
