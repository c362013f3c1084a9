//! Построение дерева вне UI-потока.
//!
//! Результат передаётся один раз, целиком, через канал. Частичных
//! обновлений и отмены нет; таймаут задаёт вызывающая сторона.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::{error, info};

use super::{DirectoryListing, EventSelection, HierarchyBuilder};
use crate::error::PrismError;
use crate::tree::SmTree;

/// Что строить.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildRequest {
    Event(EventSelection),
    Files(Vec<PathBuf>),
}

/// Handle запущенного построения.
pub struct BuildTask {
    result_rx: mpsc::Receiver<Result<SmTree, PrismError>>,
    join: Option<thread::JoinHandle<()>>,
}

impl BuildTask {
    /// Дождаться результата.
    pub fn wait(mut self) -> Result<SmTree, PrismError> {
        let result = self.result_rx.recv().unwrap_or(Err(PrismError::WorkerGone));
        self.join_worker();
        result
    }

    /// Дождаться результата не дольше `timeout`.
    ///
    /// `None`: построение ещё идёт, handle можно опросить снова.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Result<SmTree, PrismError>> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => {
                self.join_worker();
                Some(result)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                self.join_worker();
                Some(Err(PrismError::WorkerGone))
            }
        }
    }

    /// Забрать результат, если он уже готов.
    pub fn try_take(&mut self) -> Option<Result<SmTree, PrismError>> {
        match self.result_rx.try_recv() {
            Ok(result) => {
                self.join_worker();
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.join_worker();
                Some(Err(PrismError::WorkerGone))
            }
        }
    }

    fn join_worker(&mut self) {
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                error!("Tree build worker panicked");
            }
        }
    }
}

/// Запустить построение в отдельном потоке.
pub fn spawn_build<L>(request: BuildRequest, listing: L) -> BuildTask
where
    L: DirectoryListing + Send + 'static,
{
    let (result_tx, result_rx) = mpsc::channel();

    let join = thread::spawn(move || {
        let builder = HierarchyBuilder::new(listing);
        let result = builder.build(&request);
        if let Err(err) = &result {
            info!("Background build failed: {err}");
        }
        // receiver мог уже уйти (view закрыт), результат теряется.
        let _ = result_tx.send(result);
    });

    BuildTask {
        result_rx,
        join: Some(join),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::FsListing;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn background_build_delivers_tree() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let v1 = temp.path().join("EQ").join("STA1").join("V1");
        fs::create_dir_all(&v1).unwrap();
        File::create(v1.join("a.v1")).unwrap();

        let request = BuildRequest::Event(EventSelection::new(temp.path(), "EQ", ["STA1"]));
        let tree = spawn_build(request, FsListing::default())
            .wait()
            .expect("Build should succeed");

        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn background_build_reports_validation_error() {
        let request = BuildRequest::Files(vec![PathBuf::from("/tmp/x.v2")]);
        let mut task = spawn_build(request, FsListing::default());

        let result = task
            .wait_timeout(Duration::from_secs(5))
            .expect("Build should finish within timeout");
        assert!(matches!(result, Err(PrismError::Structure { .. })));
    }
}
