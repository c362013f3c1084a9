//! Изменения под корнем событий.

use std::path::{Component, Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
  Created,
  Removed,
}

/// Появился или исчез файл/каталог под корнем событий.
///
/// Дерево по этому событию не меняется: UI предлагает пересобрать его.
#[derive(Clone, Debug)]
pub struct EventsRootChange {
  pub kind: ChangeKind,
  /// Первый сегмент относительно корня (имя события).
  pub event: String,
  /// Второй сегмент (имя станции), если изменение глубже события.
  pub station: Option<String>,
  pub path: PathBuf,
  /// Unix timestamp в миллисекундах.
  pub occurred_at_ms: i64,
}

impl EventsRootChange {
  /// Разложить `path` относительно `root`; `None`, если путь вне корня
  /// или совпадает с ним.
  pub fn locate(
    root: &Path,
    path: &Path,
    kind: ChangeKind,
    occurred_at_ms: i64,
  ) -> Option<Self> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = relative.components().filter_map(|c| match c {
      Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
      _ => None,
    });

    let event = segments.next()?;
    let station = segments.next();
    Some(Self {
      kind,
      event,
      station,
      path: path.to_path_buf(),
      occurred_at_ms,
    })
  }
}
