//! Состояние чекбоксов дерева.
//!
//! Режим `Simple` меняет только сам узел. Режим `Propagate` распространяет
//! состояние на потомков и пересчитывает предков.

use std::path::Path;
use std::str::FromStr;

use super::{NodeId, SmTree};
use crate::error::PrismError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
    /// Часть потомков отмечена.
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckingMode {
    Simple,
    #[default]
    Propagate,
}

impl FromStr for CheckingMode {
    type Err = PrismError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(CheckingMode::Simple),
            "propagate" => Ok(CheckingMode::Propagate),
            _ => Err(PrismError::InvalidConfig {
                key: "checking_mode",
                value: s.to_string(),
            }),
        }
    }
}

impl SmTree {
    /// Отметить/снять отметку узла.
    pub fn set_checked(
        &mut self,
        id: NodeId,
        checked: bool,
        mode: CheckingMode,
    ) -> Result<(), PrismError> {
        if id >= self.nodes.len() {
            return Err(PrismError::TreeInvariant(format!("unknown node {id}")));
        }

        let state = if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        };

        match mode {
            CheckingMode::Simple => self.nodes[id].check = state,
            CheckingMode::Propagate => {
                let mut stack = vec![id];
                while let Some(current) = stack.pop() {
                    self.nodes[current].check = state;
                    stack.extend(self.nodes[current].children.iter().copied());
                }
                self.refresh_ancestors(id);
            }
        }
        Ok(())
    }

    /// Снять все отметки.
    pub fn clear_checks(&mut self) {
        for node in &mut self.nodes {
            node.check = CheckState::Unchecked;
        }
    }

    /// Пути отмеченных листьев в порядке дерева.
    pub fn checked_files(&self) -> Vec<&Path> {
        self.leaves()
            .into_iter()
            .filter(|&id| self.nodes[id].check == CheckState::Checked)
            .filter_map(|id| self.nodes[id].file_path())
            .collect()
    }

    pub fn has_checked(&self) -> bool {
        self.nodes.iter().any(|node| node.check != CheckState::Unchecked)
    }

    fn refresh_ancestors(&mut self, id: NodeId) {
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            let children = &self.nodes[parent].children;
            let checked = children
                .iter()
                .filter(|&&c| self.nodes[c].check == CheckState::Checked)
                .count();
            let untouched = children
                .iter()
                .filter(|&&c| self.nodes[c].check == CheckState::Unchecked)
                .count();

            let state = if checked == children.len() {
                CheckState::Checked
            } else if untouched == children.len() {
                CheckState::Unchecked
            } else {
                CheckState::Partial
            };
            self.nodes[parent].check = state;
            current = self.nodes[parent].parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> EQ -> {STA1 -> {a, b}, STA2 -> {c}}
    fn sample() -> (SmTree, [NodeId; 6]) {
        let mut tree = SmTree::new("root");
        let eq = tree.insert_container(SmTree::ROOT, "EQ").unwrap();
        let sta1 = tree.insert_container(eq, "STA1").unwrap();
        let sta2 = tree.insert_container(eq, "STA2").unwrap();
        let a = tree.insert_file(sta1, Path::new("/r/EQ/STA1/a")).unwrap();
        let b = tree.insert_file(sta1, Path::new("/r/EQ/STA1/b")).unwrap();
        let c = tree.insert_file(sta2, Path::new("/r/EQ/STA2/c")).unwrap();
        (tree, [eq, sta1, sta2, a, b, c])
    }

    #[test]
    fn simple_mode_touches_only_the_node() {
        let (mut tree, [eq, sta1, _, a, b, _]) = sample();
        tree.set_checked(sta1, true, CheckingMode::Simple).unwrap();

        assert_eq!(tree.node(sta1).unwrap().check(), CheckState::Checked);
        assert_eq!(tree.node(a).unwrap().check(), CheckState::Unchecked);
        assert_eq!(tree.node(b).unwrap().check(), CheckState::Unchecked);
        assert_eq!(tree.node(eq).unwrap().check(), CheckState::Unchecked);
        assert!(tree.checked_files().is_empty());
    }

    #[test]
    fn propagate_mode_checks_descendants_and_marks_ancestors_partial() {
        let (mut tree, [eq, sta1, sta2, a, b, c]) = sample();
        tree.set_checked(sta1, true, CheckingMode::Propagate).unwrap();

        assert_eq!(tree.node(a).unwrap().check(), CheckState::Checked);
        assert_eq!(tree.node(b).unwrap().check(), CheckState::Checked);
        assert_eq!(tree.node(c).unwrap().check(), CheckState::Unchecked);
        assert_eq!(tree.node(sta2).unwrap().check(), CheckState::Unchecked);
        assert_eq!(tree.node(eq).unwrap().check(), CheckState::Partial);
        assert_eq!(tree.root().check(), CheckState::Partial);
        assert_eq!(
            tree.checked_files(),
            vec![Path::new("/r/EQ/STA1/a"), Path::new("/r/EQ/STA1/b")]
        );
    }

    #[test]
    fn checking_last_leaf_completes_parents() {
        let (mut tree, [eq, sta1, _, a, b, c]) = sample();
        for id in [a, b, c] {
            tree.set_checked(id, true, CheckingMode::Propagate).unwrap();
        }

        assert_eq!(tree.node(sta1).unwrap().check(), CheckState::Checked);
        assert_eq!(tree.node(eq).unwrap().check(), CheckState::Checked);
        assert_eq!(tree.root().check(), CheckState::Checked);

        tree.set_checked(b, false, CheckingMode::Propagate).unwrap();
        assert_eq!(tree.node(sta1).unwrap().check(), CheckState::Partial);
        assert_eq!(tree.root().check(), CheckState::Partial);
    }

    #[test]
    fn clear_checks_resets_everything() {
        let (mut tree, _) = sample();
        tree.set_checked(SmTree::ROOT, true, CheckingMode::Propagate).unwrap();
        assert!(tree.has_checked());

        tree.clear_checks();
        assert!(!tree.has_checked());
    }

    #[test]
    fn checking_mode_parses_case_insensitive() {
        assert_eq!("Simple".parse::<CheckingMode>().unwrap(), CheckingMode::Simple);
        assert_eq!(" propagate ".parse::<CheckingMode>().unwrap(), CheckingMode::Propagate);
        assert!("tri".parse::<CheckingMode>().is_err());
    }
}
