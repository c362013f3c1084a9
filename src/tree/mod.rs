//! Дерево узлов, которое получает tree explorer.
//!
//! Узлы хранятся в arena ([`SmTree::nodes`]) и адресуются через [`NodeId`].
//! Корень всегда имеет индекс `0`. Единственная точка структурного изменения
//! дерева: [`SmTree::insert_or_get`], поэтому уникальность имён среди
//! соседей выполняется по построению.

mod selection;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PrismError;

pub use selection::{CheckState, CheckingMode};

/// Индекс узла в arena.
pub type NodeId = usize;

/// Контейнер (папка) или лист (файл).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Container,
    Leaf { file_path: PathBuf },
}

/// Узел дерева.
#[derive(Debug, Clone)]
pub struct SmNode {
    name: String,
    kind: NodeKind,
    check: CheckState,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SmNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Абсолютный путь файла; `None` для контейнеров.
    pub fn file_path(&self) -> Option<&Path> {
        match &self.kind {
            NodeKind::Leaf { file_path } => Some(file_path),
            NodeKind::Container => None,
        }
    }

    pub fn check(&self) -> CheckState {
        self.check
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Дерево event/station/файлов с одним корнем.
#[derive(Debug, Clone)]
pub struct SmTree {
    nodes: Vec<SmNode>,
}

impl SmTree {
    pub const ROOT: NodeId = 0;

    /// Новое дерево из одного корня-контейнера.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![SmNode {
                name: root_name.into(),
                kind: NodeKind::Container,
                check: CheckState::Unchecked,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> &SmNode {
        &self.nodes[Self::ROOT]
    }

    /// Узел по индексу; `None` для чужого индекса.
    pub fn node(&self, id: NodeId) -> Option<&SmNode> {
        self.nodes.get(id)
    }

    /// Число узлов, включая корень.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Дерево никогда не бывает пустым: корень есть всегда.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Вставить ребёнка или вернуть существующего с тем же именем.
    ///
    /// Существующий узел возвращается без изменений, даже если `kind` отличается.
    pub fn insert_or_get(
        &mut self,
        parent: NodeId,
        name: &str,
        kind: NodeKind,
    ) -> Result<NodeId, PrismError> {
        let parent_node = self
            .nodes
            .get(parent)
            .ok_or_else(|| PrismError::TreeInvariant(format!("unknown parent node {parent}")))?;

        if parent_node.is_leaf() {
            return Err(PrismError::TreeInvariant(format!(
                "leaf '{}' cannot have children",
                parent_node.name
            )));
        }

        if let Some(existing) = self.child_by_name(parent, name) {
            return Ok(existing);
        }

        if let NodeKind::Leaf { file_path } = &kind {
            if file_path.as_os_str().is_empty() {
                return Err(PrismError::TreeInvariant(format!(
                    "leaf '{name}' has an empty file path"
                )));
            }
        }

        let id = self.nodes.len();
        self.nodes.push(SmNode {
            name: name.to_string(),
            kind,
            check: CheckState::Unchecked,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Shortcut для контейнера.
    pub fn insert_container(&mut self, parent: NodeId, name: &str) -> Result<NodeId, PrismError> {
        self.insert_or_get(parent, name, NodeKind::Container)
    }

    /// Shortcut для листа; имя берётся из имени файла.
    pub fn insert_file(&mut self, parent: NodeId, file_path: &Path) -> Result<NodeId, PrismError> {
        let name = file_path
            .file_name()
            .ok_or_else(|| PrismError::FileNameMissing(file_path.to_path_buf()))?
            .to_string_lossy()
            .into_owned();
        self.insert_or_get(
            parent,
            &name,
            NodeKind::Leaf {
                file_path: file_path.to_path_buf(),
            },
        )
    }

    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes
            .get(parent)?
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].name == name)
    }

    /// Имена детей в порядке вставки.
    pub fn child_names(&self, parent: NodeId) -> Vec<&str> {
        self.nodes
            .get(parent)
            .map(|node| {
                node.children
                    .iter()
                    .map(|&child| self.nodes[child].name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Спуск от корня по цепочке имён, например `["EQ2020", "STA1", "V1"]`.
    pub fn find_path(&self, names: &[&str]) -> Option<NodeId> {
        names
            .iter()
            .try_fold(Self::ROOT, |current, name| self.child_by_name(current, name))
    }

    /// Все узлы в порядке обхода в глубину (pre-order), начиная с корня.
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// Листья в порядке дерева.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.depth_first()
            .into_iter()
            .filter(|&id| self.nodes[id].is_leaf())
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Глубина узла: корень = 0.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(id).and_then(SmNode::parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent].parent;
        }
        depth
    }
}

impl fmt::Display for SmTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in self.depth_first() {
            let node = &self.nodes[id];
            let marker = match node.check {
                CheckState::Checked => "[x]",
                CheckState::Partial => "[-]",
                CheckState::Unchecked => "[ ]",
            };
            writeln!(f, "{}{} {}", "  ".repeat(self.depth(id)), marker, node.name)?;
        }
        Ok(())
    }
}
