//! PRISM Review Rust Core
//!
//! Этот crate содержит не-GUI логику PRISM Review Tool: построение дерева
//! event/station/файлов по соглашению о каталогах, состояние выделения,
//! контекст приложения и наблюдение за корнем событий.
//! Отрисовка и привязка к оконному фреймворку живут вне crate.

pub mod actions;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod events_watcher;
pub mod hierarchy;
pub mod logging;
pub mod tree;
pub mod view;

pub use error::PrismError;
pub use hierarchy::{EventSelection, HierarchyBuilder};
pub use tree::{CheckState, CheckingMode, NodeId, NodeKind, SmNode, SmTree};
