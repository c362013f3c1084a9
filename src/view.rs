//! Активное представление и доступность действий.
//!
//! [`ViewTracker`] явно хранит, какое представление в фокусе, и отвечает,
//! какие действия сейчас доступны.

use std::path::PathBuf;

use log::debug;

use crate::tree::{CheckingMode, SmTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Explorer,
    Chart,
}

/// Запросы, которые действия задают представлению в фокусе.
pub trait ActiveView {
    fn kind(&self) -> ViewKind;
    fn has_selection(&self) -> bool;
    fn is_enabled(&self) -> bool;
}

/// Tree explorer: владеет текущим деревом до замены или закрытия.
#[derive(Debug, Default)]
pub struct ExplorerView {
    tree: Option<SmTree>,
    checking_mode: CheckingMode,
}

impl ExplorerView {
    pub fn new(checking_mode: CheckingMode) -> Self {
        Self {
            tree: None,
            checking_mode,
        }
    }

    /// Показать новое дерево; прежнее возвращается вызывающему.
    pub fn show(&mut self, tree: SmTree) -> Option<SmTree> {
        debug!("Explorer shows tree rooted at {}", tree.root().name());
        self.tree.replace(tree)
    }

    pub fn tree(&self) -> Option<&SmTree> {
        self.tree.as_ref()
    }

    pub fn tree_mut(&mut self) -> Option<&mut SmTree> {
        self.tree.as_mut()
    }

    pub fn checking_mode(&self) -> CheckingMode {
        self.checking_mode
    }

    pub fn set_checking_mode(&mut self, mode: CheckingMode) {
        self.checking_mode = mode;
    }

    /// Отмеченные файлы текущего дерева.
    pub fn checked_files(&self) -> Vec<PathBuf> {
        self.tree
            .as_ref()
            .map(|t| t.checked_files().into_iter().map(PathBuf::from).collect())
            .unwrap_or_default()
    }

    pub fn tear_down(&mut self) -> Option<SmTree> {
        self.tree.take()
    }
}

impl ActiveView for ExplorerView {
    fn kind(&self) -> ViewKind {
        ViewKind::Explorer
    }

    fn has_selection(&self) -> bool {
        self.tree.as_ref().is_some_and(|t| !t.checked_files().is_empty())
    }

    fn is_enabled(&self) -> bool {
        self.tree.is_some()
    }
}

/// Представление графиков: знает только, какие файлы ему переданы.
/// Отрисовку делает внешний charting engine.
#[derive(Debug, Default)]
pub struct ChartView {
    files: Vec<PathBuf>,
}

impl ChartView {
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn load(&mut self, files: Vec<PathBuf>) {
        self.files = files;
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}

impl ActiveView for ChartView {
    fn kind(&self) -> ViewKind {
        ViewKind::Chart
    }

    fn has_selection(&self) -> bool {
        !self.files.is_empty()
    }

    fn is_enabled(&self) -> bool {
        !self.files.is_empty()
    }
}

/// Действия меню/тулбара.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OpenEvent,
    OpenFile,
    ChartSelection,
    ClearSelection,
}

/// Владелец представлений и фокуса.
#[derive(Debug)]
pub struct ViewTracker {
    explorer: ExplorerView,
    chart: ChartView,
    focused: ViewKind,
}

impl ViewTracker {
    pub fn new(checking_mode: CheckingMode) -> Self {
        Self {
            explorer: ExplorerView::new(checking_mode),
            chart: ChartView::default(),
            focused: ViewKind::Explorer,
        }
    }

    pub fn focus(&mut self, kind: ViewKind) {
        self.focused = kind;
    }

    pub fn focused(&self) -> ViewKind {
        self.focused
    }

    pub fn active(&self) -> &dyn ActiveView {
        match self.focused {
            ViewKind::Explorer => &self.explorer,
            ViewKind::Chart => &self.chart,
        }
    }

    pub fn explorer(&self) -> &ExplorerView {
        &self.explorer
    }

    pub fn explorer_mut(&mut self) -> &mut ExplorerView {
        &mut self.explorer
    }

    pub fn chart(&self) -> &ChartView {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut ChartView {
        &mut self.chart
    }

    pub fn is_action_enabled(&self, action: Action) -> bool {
        let active = self.active();
        match action {
            Action::OpenEvent | Action::OpenFile => true,
            Action::ChartSelection => {
                active.kind() == ViewKind::Explorer && active.is_enabled() && active.has_selection()
            }
            Action::ClearSelection => active.has_selection(),
        }
    }

    /// Закрыть все представления.
    pub fn tear_down(&mut self) {
        self.explorer.tear_down();
        self.chart.clear();
        self.focused = ViewKind::Explorer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn tree_with_file() -> SmTree {
        let mut tree = SmTree::new("/ev");
        let event = tree.insert_container(SmTree::ROOT, "EQ").unwrap();
        tree.insert_file(event, Path::new("/ev/EQ/a.v1")).unwrap();
        tree
    }

    #[test]
    fn empty_explorer_is_disabled() {
        let tracker = ViewTracker::new(CheckingMode::Propagate);
        assert!(!tracker.active().is_enabled());
        assert!(tracker.is_action_enabled(Action::OpenEvent));
        assert!(tracker.is_action_enabled(Action::OpenFile));
        assert!(!tracker.is_action_enabled(Action::ChartSelection));
        assert!(!tracker.is_action_enabled(Action::ClearSelection));
    }

    #[test]
    fn chart_selection_needs_checked_files_in_focused_explorer() {
        let mut tracker = ViewTracker::new(CheckingMode::Propagate);
        tracker.explorer_mut().show(tree_with_file());
        assert!(tracker.active().is_enabled());
        assert!(!tracker.is_action_enabled(Action::ChartSelection));

        let mode = tracker.explorer().checking_mode();
        tracker
            .explorer_mut()
            .tree_mut()
            .unwrap()
            .set_checked(SmTree::ROOT, true, mode)
            .unwrap();
        assert!(tracker.is_action_enabled(Action::ChartSelection));

        tracker.focus(ViewKind::Chart);
        assert!(!tracker.is_action_enabled(Action::ChartSelection));
    }

    #[test]
    fn show_returns_previous_tree() {
        let mut explorer = ExplorerView::default();
        assert!(explorer.show(tree_with_file()).is_none());
        let previous = explorer.show(SmTree::new("/other")).unwrap();
        assert_eq!(previous.root().name(), "/ev");
        assert_eq!(explorer.tree().unwrap().root().name(), "/other");
    }

    #[test]
    fn tear_down_drops_tree_and_resets_focus() {
        let mut tracker = ViewTracker::new(CheckingMode::Simple);
        tracker.explorer_mut().show(tree_with_file());
        tracker.chart_mut().load(vec![PathBuf::from("/ev/EQ/a.v1")]);
        tracker.focus(ViewKind::Chart);

        tracker.tear_down();
        assert!(tracker.explorer().tree().is_none());
        assert!(tracker.chart().files().is_empty());
        assert_eq!(tracker.focused(), ViewKind::Explorer);
    }
}
