/// The output dispatcher.
///
/// [`output_for`] builds a recursive renderer for one named output property
/// of a rule table. Every non-array node renders through its rule's output
/// function; sibling sequences render through the table's `Array` joiner
/// for the property.
use crate::ast::Node;
use crate::error::{EngineError, Result};
use crate::parser::Rules;
use crate::state::State;

pub type OutputFn<O> =
    Box<dyn Fn(&Node, &dyn Render<O>, &mut State) -> Result<O> + Send + Sync>;
pub type ArrayFn<O> =
    Box<dyn Fn(&[Node], &dyn Render<O>, &mut State) -> Result<O> + Send + Sync>;

/// Recursion hooks handed to output functions.
pub trait Render<O> {
    /// Renders a single node through its rule's output function.
    fn node(&self, node: &Node, state: &mut State) -> Result<O>;
    /// Renders a sibling sequence through the `Array` joiner.
    fn nodes(&self, nodes: &[Node], state: &mut State) -> Result<O>;
}

/// Builds a renderer for one output property of a rule table. Fails up
/// front when the table has no `Array` joiner for the property.
pub fn output_for<'r, O>(rules: &'r Rules<O>, property: &str) -> Result<Renderer<'r, O>> {
    if rules.array_output(property).is_none() {
        return Err(EngineError::MissingArrayJoiner {
            property: property.to_owned(),
        });
    }
    Ok(Renderer {
        rules,
        property: property.to_owned(),
    })
}

/// The recursive renderer returned by [`output_for`].
pub struct Renderer<'r, O> {
    rules: &'r Rules<O>,
    property: String,
}

impl<O> std::fmt::Debug for Renderer<'_, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("property", &self.property)
            .finish()
    }
}

impl<O> Renderer<'_, O> {
    /// Renders a parsed AST. Pass the state from the parse to let output
    /// functions see definitions and client fields.
    pub fn render(&self, nodes: &[Node], state: &mut State) -> Result<O> {
        self.nodes(nodes, state)
    }
}

impl<O> Render<O> for Renderer<'_, O> {
    fn node(&self, node: &Node, state: &mut State) -> Result<O> {
        let kind = node.kind();
        let output = self
            .rules
            .get(kind)
            .and_then(|rule| rule.output_fn(&self.property))
            .ok_or_else(|| EngineError::MissingOutputRule {
                kind: kind.to_owned(),
                property: self.property.clone(),
            })?;
        output(node, self, state)
    }

    fn nodes(&self, nodes: &[Node], state: &mut State) -> Result<O> {
        let joiner =
            self.rules
                .array_output(&self.property)
                .ok_or_else(|| EngineError::MissingArrayJoiner {
                    property: self.property.clone(),
                })?;
        joiner(nodes, self, state)
    }
}

/// Folds runs of adjacent `text` nodes into single maximal text nodes, so
/// downstream text handling always sees the longest run. Idempotent.
pub fn fold_text_nodes(nodes: &[Node]) -> Vec<Node> {
    let mut folded: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match (folded.last_mut(), node) {
            (Some(Node::Text { content: run }), Node::Text { content }) => {
                run.push_str(content);
            }
            _ => folded.push(node.clone()),
        }
    }
    folded
}

/// The default `html` joiner: fold text runs, render each sibling,
/// concatenate the strings.
pub fn html_array_output() -> ArrayFn<String> {
    Box::new(|nodes, render, state| {
        let mut out = String::new();
        for node in fold_text_nodes(nodes) {
            out.push_str(&render.node(&node, state)?);
        }
        Ok(out)
    })
}

/// A joiner for tree outputs: folds text runs, gives each child a stable
/// sibling index in `state.key` (restoring the caller's key afterwards),
/// and combines the rendered children with the supplied step.
pub fn keyed_array_output<O: 'static>(
    combine: impl Fn(Vec<O>) -> O + Send + Sync + 'static,
) -> ArrayFn<O> {
    Box::new(move |nodes, render, state| {
        let caller_key = std::mem::take(&mut state.key);
        let folded = fold_text_nodes(nodes);
        let mut children = Vec::with_capacity(folded.len());
        for (index, node) in folded.iter().enumerate() {
            state.key = index.to_string();
            match render.node(node, state) {
                Ok(child) => children.push(child),
                Err(error) => {
                    state.key = caller_key;
                    return Err(error);
                }
            }
        }
        state.key = caller_key;
        Ok(combine(children))
    })
}
