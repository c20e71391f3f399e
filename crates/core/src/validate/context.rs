use crate::config::ValidatorConfig;
use crate::grammar::lexer::Token;
use dfd_behavior_catalog::LabelCatalog;
use thiserror::Error;

/// A dataflow node owning an output port.
pub trait BehaviorNode {
    /// Names of the node's input ports that a behavior may reference.
    fn available_inputs(&self) -> Vec<String>;
}

/// The output port whose behavior text is validated.
pub trait OutputPort {
    /// The node the port belongs to, or `None` if the port is not attached
    /// to a node.
    fn parent(&self) -> Option<&dyn BehaviorNode>;
}

/// Contract violations of the caller, as opposed to findings in the text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// The output port has no parent node, so its inputs are unknown.
    #[error("output port's parent is not a dataflow node")]
    ParentNotNode,
}

/// Plain output port attached to a node with the given input names.
///
/// ```
/// use dfd_behavior_core::{BehaviorNode, OutputPort, PortContext};
///
/// let port = PortContext::new(["in", "other"]);
/// let node = port.parent().unwrap();
/// assert_eq!(node.available_inputs(), vec!["in", "other"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortContext {
    /// Input port names of the parent node.
    pub available_inputs: Vec<String>,
}

impl PortContext {
    /// Build a context from input names.
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available_inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }
}

impl BehaviorNode for PortContext {
    fn available_inputs(&self) -> Vec<String> {
        self.available_inputs.clone()
    }
}

impl OutputPort for PortContext {
    fn parent(&self) -> Option<&dyn BehaviorNode> {
        Some(self)
    }
}

/// State shared by every line of one validation call.
pub(super) struct ValidationContext<'a> {
    pub(super) config: &'a ValidatorConfig,
    pub(super) catalog: Option<&'a LabelCatalog>,
    port: &'a dyn OutputPort,
    inputs: Option<Vec<String>>,
}

impl<'a> ValidationContext<'a> {
    pub(super) fn new(
        config: &'a ValidatorConfig,
        catalog: Option<&'a LabelCatalog>,
        port: &'a dyn OutputPort,
    ) -> Self {
        Self {
            config,
            catalog,
            port,
            inputs: None,
        }
    }

    /// Input names of the port's node, fetched on first use.
    pub(super) fn available_inputs(&mut self) -> Result<&[String], PortError> {
        if self.inputs.is_none() {
            let node = self.port.parent().ok_or(PortError::ParentNotNode)?;
            self.inputs = Some(node.available_inputs());
        }
        Ok(self.inputs.as_deref().unwrap_or_default())
    }
}

/// One line being validated.
#[derive(Clone, Copy)]
pub(super) struct LineCtx<'l, 'a> {
    pub(super) text: &'a str,
    pub(super) line_no: usize,
    pub(super) toks: &'l [Token<'a>],
}
