//! Наблюдение за корнем событий.
//!
//! Отвечает за:
//! - проверку корня (абсолютный путь, существующий каталог)
//! - запуск рекурсивного `notify` watcher
//! - перевод событий notify в [`EventsRootChange`]
//! - graceful shutdown

mod events;

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, error, info, warn};
use notify::{event::ModifyKind, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::PrismError;

pub use events::{ChangeKind, EventsRootChange};

/// Handle запущенного watcher'а.
pub struct WatcherHandle {
  stop_tx: mpsc::Sender<()>,
  join: Option<thread::JoinHandle<()>>,
  events_root: PathBuf,
}

impl WatcherHandle {
  pub fn events_root(&self) -> &Path {
    &self.events_root
  }

  pub fn stop(mut self) -> Result<(), PrismError> {
    let _ = self.stop_tx.send(());
    if let Some(join) = self.join.take() {
      let _ = join.join();
    }
    Ok(())
  }
}

fn ensure_events_root(events_root: &Path) -> Result<PathBuf, PrismError> {
  if events_root.as_os_str().is_empty() {
    return Err(PrismError::InvalidPath("empty events root".to_string()));
  }
  if !events_root.is_absolute() {
    return Err(PrismError::InvalidPath(format!(
      "events root must be absolute: {}",
      events_root.display()
    )));
  }
  if !events_root.is_dir() {
    return Err(PrismError::NotADirectory(events_root.to_path_buf()));
  }
  Ok(events_root.to_path_buf())
}

/// Запустить watcher корня событий.
///
/// `on_change` вызывается из потока watcher'а на каждый созданный или
/// удалённый путь под корнем.
pub fn start_events_watcher(
  events_root: &Path,
  on_change: impl Fn(EventsRootChange) + Send + Sync + 'static,
) -> Result<WatcherHandle, PrismError> {
  let events_root = ensure_events_root(events_root)?;

  info!("Starting events watcher for: {}", events_root.display());

  let (stop_tx, stop_rx) = mpsc::channel::<()>();
  let (event_tx, event_rx) = mpsc::channel::<Result<notify::Event, notify::Error>>();

  let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res| {
    // best-effort send; если receiver уже закрыт, игнорируем.
    let _ = event_tx.send(res);
  })?;
  watcher.watch(&events_root, RecursiveMode::Recursive)?;

  // notify может отдавать канонические пути (например, /private/var на macOS).
  let root_clone = events_root.clone();
  let canonical_root = events_root
    .canonicalize()
    .unwrap_or_else(|_| events_root.clone());
  let join = thread::spawn(move || {
    // watcher живёт, пока жив поток.
    let _watcher = watcher;

    loop {
      if stop_rx.try_recv().is_ok() {
        info!("Events watcher shutdown requested");
        break;
      }

      match event_rx.recv_timeout(Duration::from_millis(250)) {
        Ok(Ok(event)) => {
          debug!("notify event: {:?}", event.kind);
          let Some(kind) = change_kind(&event.kind) else {
            continue;
          };

          let occurred_at_ms = now_ms();
          for path in event.paths {
            let located = EventsRootChange::locate(&root_clone, &path, kind, occurred_at_ms)
              .or_else(|| EventsRootChange::locate(&canonical_root, &path, kind, occurred_at_ms));
            match located {
              Some(change) => on_change(change),
              None => debug!("Ignoring change outside events root: {}", path.display()),
            }
          }
        }
        Ok(Err(err)) => {
          warn!("notify error: {err}");
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
          // тик
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
          error!("notify channel disconnected");
          break;
        }
      }
    }

    info!("Events watcher thread finished");
  });

  Ok(WatcherHandle {
    stop_tx,
    join: Some(join),
    events_root,
  })
}

fn change_kind(kind: &EventKind) -> Option<ChangeKind> {
  match kind {
    EventKind::Create(_) => Some(ChangeKind::Created),
    EventKind::Remove(_) => Some(ChangeKind::Removed),
    // Rename: сторону (from/to) notify отдаёт не на всех платформах.
    EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Created),
    EventKind::Modify(_) => None,
    EventKind::Access(_) => None,
    EventKind::Other => None,
    EventKind::Any => None,
  }
}

fn now_ms() -> i64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or(Duration::from_millis(0))
    .as_millis() as i64
}
