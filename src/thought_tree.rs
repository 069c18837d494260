//! A fixed-shape tree of completions.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]; each
//! node knows its parent and owns an ordered list of children. There is
//! no search, scoring or pruning: every node on a level is expanded the
//! same number of times.

use std::collections::VecDeque;
use log::{debug, info};
use crate::client::CompletionBackend;
use crate::error::Error;
use crate::request::CompletionOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThoughtNode
{   pub thought: String
  , pub parent: Option<NodeId>
  , pub children: Vec<NodeId>
}

#[derive(Debug, Clone)]
pub struct ThoughtTree
{   nodes: Vec<ThoughtNode>
}

/// Prompt used to grow a child from its parent's thought
pub fn expansion_prompt(thought: &str) -> String
{   format!("Expand on the idea: {}", thought)
}

impl ThoughtTree
{   pub fn new(root_thought: impl Into<String>) -> Self
    {   ThoughtTree
        {   nodes: vec![ThoughtNode
            {   thought: root_thought.into()
              , parent: None
              , children: vec![]
            }]
        }
    }

    pub fn root(&self) -> NodeId
    {   NodeId(0)
    }

    /// Append a child under `parent`. Returns `None`, leaving the tree
    /// untouched, if `parent` is not a node of this tree.
    pub fn add_child(
      &mut self
    , parent: NodeId
    , thought: impl Into<String>
    ) -> Option<NodeId>
    {   if parent.0 >= self.nodes.len()
        {   return None;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(ThoughtNode
        {   thought: thought.into()
          , parent: Some(parent)
          , children: vec![]
        });
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&ThoughtNode>
    {   self.nodes.get(id.0)
    }

    pub fn thought(&self, id: NodeId) -> Option<&str>
    {   self.node(id).map(|n| n.thought.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId>
    {   self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId]
    {   self.node(id)
          .map(|n| n.children.as_slice())
          .unwrap_or(&[])
    }

    pub fn len(&self) -> usize
    {   self.nodes.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.nodes.is_empty()
    }

    /// Number of edges between `id` and the root
    pub fn depth(&self, id: NodeId) -> usize
    {   let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(p) = current
        {   depth += 1;
            current = self.parent(p);
        }
        depth
    }

    /// Breadth-first walk from the root
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ThoughtNode)> + '_
    {   let mut queue = VecDeque::from([self.root()]);
        std::iter::from_fn(move || {
          let id = queue.pop_front()?;
          let node = &self.nodes[id.0];
          queue.extend(node.children.iter().copied());
          Some((id, node))
        })
    }

    /// Grow a tree level by level. `branching[level]` children are added
    /// to every node of the previous level, in order, each from an
    /// independent completion of [`expansion_prompt`].
    pub async fn grow<B>(
      backend: &B
    , initial_prompt: &str
    , branching: &[usize]
    , options: &CompletionOptions
    ) -> Result<Self, Error>
    where B: CompletionBackend + ?Sized
    {   let root_thought = backend.complete(initial_prompt, options).await?;
        let mut tree = ThoughtTree::new(root_thought);
        let mut frontier = vec![tree.root()];

        for (level, &fanout) in branching.iter().enumerate()
        {   debug!(
              "Expanding level {} ({} nodes x {})",
              level + 1, frontier.len(), fanout
            );
            let mut next = Vec::with_capacity(frontier.len() * fanout);
            for &parent in &frontier
            {   for _ in 0..fanout
                {   let prompt = expansion_prompt(&tree.nodes[parent.0].thought);
                    let thought = backend.complete(&prompt, options).await?;
                    let child = tree.add_child(parent, thought)
                      .ok_or_else(|| Error::InvalidRequest(format!(
                        "unknown parent node {:?}", parent
                      )))?;
                    next.push(child);
                }
            }
            frontier = next;
        }

        info!("Thought tree grown to {} nodes", tree.len());
        Ok(tree)
    }

    /// Root, two children, one grandchild under each
    pub async fn fixed_shape<B>(
      backend: &B
    , initial_prompt: &str
    , options: &CompletionOptions
    ) -> Result<Self, Error>
    where B: CompletionBackend + ?Sized
    {   ThoughtTree::grow(backend, initial_prompt, &[2, 1], options).await
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::testing::ScriptedBackend;

    #[test]
    fn fixed_shape_places_replies_in_creation_order()
    {   let backend = ScriptedBackend::new(&["A", "B", "C", "D", "E"]);
        let tree = tokio_test::block_on(ThoughtTree::fixed_shape(
          &backend,
          "Generate ideas for a new AI project.",
          &CompletionOptions::with_max_output_tokens(300)
        )).unwrap();

        let root = tree.root();
        assert_eq!(tree.thought(root), Some("A"));
        assert_eq!(tree.parent(root), None);

        let kids = tree.children(root).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(tree.thought(kids[0]), Some("B"));
        assert_eq!(tree.thought(kids[1]), Some("C"));

        let under_b = tree.children(kids[0]);
        let under_c = tree.children(kids[1]);
        assert_eq!(under_b.len(), 1);
        assert_eq!(under_c.len(), 1);
        assert_eq!(tree.thought(under_b[0]), Some("D"));
        assert_eq!(tree.thought(under_c[0]), Some("E"));

        for (id, node) in tree.iter().skip(1)
        {   let parent = node.parent.unwrap();
            assert!(tree.children(parent).contains(&id));
        }
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn children_are_grown_from_their_parent_thought()
    {   let backend = ScriptedBackend::new(&["A", "B", "C", "D", "E"]);
        tokio_test::block_on(ThoughtTree::fixed_shape(
          &backend, "start", &CompletionOptions::default()
        )).unwrap();
        assert_eq!(
          backend.prompts(),
          vec![
            "start".to_string(),
            expansion_prompt("A"),
            expansion_prompt("A"),
            expansion_prompt("B"),
            expansion_prompt("C"),
          ]
        );
    }

    #[test]
    fn depth_and_breadth_first_order()
    {   let mut tree = ThoughtTree::new("root");
        let a = tree.add_child(tree.root(), "a").unwrap();
        let b = tree.add_child(tree.root(), "b").unwrap();
        let a1 = tree.add_child(a, "a1").unwrap();
        assert_eq!(tree.depth(tree.root()), 0);
        assert_eq!(tree.depth(b), 1);
        assert_eq!(tree.depth(a1), 2);

        let order: Vec<&str> = tree.iter()
          .map(|(_, n)| n.thought.as_str())
          .collect();
        assert_eq!(order, ["root", "a", "b", "a1"]);
    }

    #[test]
    fn foreign_parent_is_rejected_without_touching_the_tree()
    {   let mut other = ThoughtTree::new("other root");
        let foreign = other.add_child(other.root(), "a").unwrap();

        let mut tree = ThoughtTree::new("root");
        assert_eq!(tree.add_child(foreign, "b"), None);
        assert_eq!(tree.len(), 1);
        assert!(tree.children(tree.root()).is_empty());

        let child = tree.add_child(tree.root(), "b").unwrap();
        assert_eq!(tree.parent(child), Some(tree.root()));
        assert_eq!(tree.depth(child), 1);
        assert_eq!(tree.iter().count(), 2);
    }

    #[test]
    fn expansion_error_is_propagated()
    {   let backend = ScriptedBackend::with_results(vec![
          Ok("A".into()),
          Err(Error::Transport("timeout".into())),
        ]);
        let result = tokio_test::block_on(ThoughtTree::fixed_shape(
          &backend, "start", &CompletionOptions::default()
        ));
        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
