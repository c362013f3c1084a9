//! Обработчики действий меню/тулбара.
//!
//! Каждое действие получает контекст и представления явно. Ошибка уходит
//! в строку статуса и возвращается вызывающему; текущее дерево при этом
//! остаётся на экране.

use std::path::PathBuf;

use log::{info, warn};

use crate::context::AppContext;
use crate::error::PrismError;
use crate::hierarchy::{spawn_build, BuildRequest, BuildTask, EventSelection};
use crate::tree::SmTree;
use crate::view::{Action, ViewKind, ViewTracker};

/// "Open event": построить дерево выбранного события и показать его.
pub fn open_event(
    ctx: &AppContext,
    views: &mut ViewTracker,
    selection: &EventSelection,
) -> Result<(), PrismError> {
    let result = ctx.builder().build_from_event_selection(selection);
    finish_open(ctx, views, result)
}

/// "Open file": построить дерево для файлов одного каталога `Vx`.
pub fn open_files(
    ctx: &AppContext,
    views: &mut ViewTracker,
    files: &[PathBuf],
) -> Result<(), PrismError> {
    let result = ctx.builder().build_from_file_selection(files);
    finish_open(ctx, views, result)
}

/// Запустить построение вне UI-потока; результат передать в [`finish_open`].
pub fn start_open(ctx: &AppContext, request: BuildRequest) -> BuildTask {
    spawn_build(request, ctx.listing())
}

/// Передать результат построения в explorer (или сообщить об ошибке).
pub fn finish_open(
    ctx: &AppContext,
    views: &mut ViewTracker,
    result: Result<SmTree, PrismError>,
) -> Result<(), PrismError> {
    match result {
        Ok(tree) => {
            let message = format!(
                "Opened {} ({} files)",
                tree.root().name(),
                tree.leaf_count()
            );
            views.explorer_mut().show(tree);
            views.focus(ViewKind::Explorer);
            ctx.status().report(&message);
            Ok(())
        }
        Err(err) => {
            if err.is_validation() {
                warn!("Open rejected: {err}");
            }
            ctx.status().report_error(&err.to_string());
            Err(err)
        }
    }
}

/// Передать отмеченные файлы в представление графиков.
///
/// Возвращает число переданных файлов; `0`, если действие недоступно.
pub fn chart_selection(ctx: &AppContext, views: &mut ViewTracker) -> usize {
    if !views.is_action_enabled(Action::ChartSelection) {
        ctx.status().report("Nothing selected to chart");
        return 0;
    }
    let files = views.explorer().checked_files();
    let count = files.len();
    views.chart_mut().load(files);
    views.focus(ViewKind::Chart);
    info!("Charting {count} files");
    count
}

/// Снять выделение в представлении, находящемся в фокусе.
pub fn clear_selection(views: &mut ViewTracker) {
    match views.focused() {
        ViewKind::Explorer => {
            if let Some(tree) = views.explorer_mut().tree_mut() {
                tree.clear_checks();
            }
        }
        ViewKind::Chart => views.chart_mut().clear(),
    }
}
