//! Построение дерева event/station/файлов.
//!
//! Соглашение о каталогах:
//! `<eventsRoot>/<event>/<station>/[Trouble/]V1|V2/<file...>`
//!
//! Builder не хранит состояния между вызовами: каждый вызов возвращает новое
//! [`SmTree`], которое дальше принадлежит потребителю (explorer view).

mod listing;
mod task;

use std::path::{Component, Path, PathBuf};

use log::{debug, info, trace, warn};

use crate::error::PrismError;
use crate::logging::LogContext;
use crate::tree::{NodeId, SmTree};

pub use listing::{DirectoryListing, FsListing, ListingOrder};
pub use task::{spawn_build, BuildRequest, BuildTask};

/// Имя папки "проблемных" записей (сравнивается без учёта регистра).
pub const TROUBLE_FOLDER: &str = "Trouble";

/// Папка версии обработки данных.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionFolder {
    V1,
    V2,
}

impl VersionFolder {
    pub const ALL: [VersionFolder; 2] = [VersionFolder::V1, VersionFolder::V2];

    pub fn name(self) -> &'static str {
        match self {
            VersionFolder::V1 => "V1",
            VersionFolder::V2 => "V2",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }
}

/// Выбор пользователя в диалоге "Open event".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSelection {
    pub events_root: PathBuf,
    pub event: String,
    pub stations: Vec<String>,
    pub include_v1: bool,
    pub include_v2: bool,
    /// Заглядывать ли в `<station>/Trouble`.
    pub include_trouble: bool,
}

impl EventSelection {
    /// Выбор с обеими версиями и веткой Trouble.
    pub fn new(
        events_root: impl Into<PathBuf>,
        event: impl Into<String>,
        stations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            events_root: events_root.into(),
            event: event.into(),
            stations: stations.into_iter().map(Into::into).collect(),
            include_v1: true,
            include_v2: true,
            include_trouble: true,
        }
    }

    pub fn with_versions(mut self, include_v1: bool, include_v2: bool) -> Self {
        self.include_v1 = include_v1;
        self.include_v2 = include_v2;
        self
    }

    pub fn with_trouble(mut self, include_trouble: bool) -> Self {
        self.include_trouble = include_trouble;
        self
    }

    pub fn includes(&self, version: VersionFolder) -> bool {
        match version {
            VersionFolder::V1 => self.include_v1,
            VersionFolder::V2 => self.include_v2,
        }
    }
}

/// Положение выбранных файлов в соглашении о каталогах,
/// восстановленное по их общему родителю.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionLayout {
    pub events_root: PathBuf,
    pub event: String,
    pub station: String,
    pub trouble: bool,
    pub version: String,
}

impl SelectionLayout {
    /// Разобрать каталог `Vx` вида `<root>/<event>/<station>/[Trouble/]<Vx>`.
    pub fn from_version_dir(version_dir: &Path) -> Result<Self, PrismError> {
        let mut segments: Vec<String> = Vec::new();
        for component in version_dir.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
                Component::Prefix(_) | Component::RootDir => {}
                // `..` ломает соответствие сегментов и предков.
                Component::CurDir | Component::ParentDir => {
                    return Err(PrismError::InvalidPath(format!(
                        "selected folder must not contain '.' or '..': {}",
                        version_dir.display()
                    )));
                }
            }
        }

        let trouble = segments.len() >= 2
            && segments[segments.len() - 2].eq_ignore_ascii_case(TROUBLE_FOLDER);
        let required = if trouble { 5 } else { 4 };

        if segments.len() < required {
            return Err(PrismError::Structure {
                path: version_dir.to_path_buf(),
                segments: segments.len(),
                required,
            });
        }

        let n = segments.len();
        let (station, event) = if trouble {
            (&segments[n - 3], &segments[n - 4])
        } else {
            (&segments[n - 2], &segments[n - 3])
        };
        // Корень: те же компоненты без последних `levels_up` сегментов.
        let levels_up = if trouble { 4 } else { 3 };
        let components: Vec<Component> = version_dir.components().collect();
        let events_root: PathBuf = components[..components.len() - levels_up]
            .iter()
            .collect();

        Ok(Self {
            events_root,
            event: event.clone(),
            station: station.clone(),
            trouble,
            version: segments[n - 1].clone(),
        })
    }
}

/// Строит [`SmTree`] по соглашению о каталогах.
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder<L = FsListing> {
    listing: L,
}

impl<L: DirectoryListing> HierarchyBuilder<L> {
    pub fn new(listing: L) -> Self {
        Self { listing }
    }

    pub fn build(&self, request: &BuildRequest) -> Result<SmTree, PrismError> {
        match request {
            BuildRequest::Event(selection) => self.build_from_event_selection(selection),
            BuildRequest::Files(files) => self.build_from_file_selection(files),
        }
    }

    /// Дерево для выбранного события и станций.
    ///
    /// Отсутствующие `Trouble`, `V1`, `V2` пропускаются молча: это нормальная
    /// ситуация для станции.
    pub fn build_from_event_selection(
        &self,
        selection: &EventSelection,
    ) -> Result<SmTree, PrismError> {
        let ctx = LogContext::with_operation("open_event");

        if !self.listing.is_dir(&selection.events_root) {
            return Err(PrismError::NotADirectory(selection.events_root.clone()));
        }
        ensure_segment_name(&selection.event, "event name")?;
        if selection.stations.is_empty() {
            return Err(PrismError::EmptySelection("no stations selected"));
        }
        for station in &selection.stations {
            ensure_segment_name(station, "station name")?;
        }

        info!(
            "{} Building tree for event '{}' ({} stations, V1={}, V2={})",
            ctx.tag(),
            selection.event,
            selection.stations.len(),
            selection.include_v1,
            selection.include_v2
        );

        let mut tree = SmTree::new(selection.events_root.to_string_lossy());
        let event_id = tree.insert_container(SmTree::ROOT, &selection.event)?;
        let event_dir = selection.events_root.join(&selection.event);

        for station in &selection.stations {
            let station_id = tree.insert_container(event_id, station)?;
            let station_dir = event_dir.join(station);

            if selection.include_trouble {
                if let Some(trouble_dir) = self
                    .listing
                    .find_dir_ignore_case(&station_dir, TROUBLE_FOLDER)?
                {
                    let trouble_id = tree.insert_container(station_id, TROUBLE_FOLDER)?;
                    self.add_version_folders(&mut tree, trouble_id, &trouble_dir, selection, &ctx)?;
                }
            }

            self.add_version_folders(&mut tree, station_id, &station_dir, selection, &ctx)?;
        }

        info!("{} Built tree with {} files", ctx.tag(), tree.leaf_count());
        trace!("{} Tree:\n{}", ctx.tag(), tree);
        Ok(tree)
    }

    /// Дерево для файлов, выбранных напрямую из одного каталога `Vx`.
    pub fn build_from_file_selection(&self, files: &[PathBuf]) -> Result<SmTree, PrismError> {
        let ctx = LogContext::with_operation("open_file");

        let first = files
            .first()
            .ok_or(PrismError::EmptySelection("no files selected"))?;
        for file in files {
            if !file.is_absolute() {
                return Err(PrismError::InvalidPath(format!(
                    "selected file must be absolute: {}",
                    file.display()
                )));
            }
        }

        let version_dir = first
            .parent()
            .ok_or_else(|| PrismError::InvalidPath(format!("no parent: {}", first.display())))?;
        if let Some(other) = files.iter().find(|f| f.parent() != Some(version_dir)) {
            return Err(PrismError::MixedParents {
                first: first.clone(),
                other: other.clone(),
            });
        }

        let layout = SelectionLayout::from_version_dir(version_dir)?;
        if VersionFolder::from_name(&layout.version).is_none() {
            warn!(
                "{} Files selected from non-standard version folder '{}'",
                ctx.tag(),
                layout.version
            );
        }

        info!(
            "{} Building tree for {} files of {}/{}{}/{}",
            ctx.tag(),
            files.len(),
            layout.event,
            layout.station,
            if layout.trouble { "/Trouble" } else { "" },
            layout.version
        );

        let mut tree = SmTree::new(layout.events_root.to_string_lossy());
        let event_id = tree.insert_container(SmTree::ROOT, &layout.event)?;
        let mut parent = tree.insert_container(event_id, &layout.station)?;
        if layout.trouble {
            parent = tree.insert_container(parent, TROUBLE_FOLDER)?;
        }
        let version_id = tree.insert_container(parent, &layout.version)?;
        for file in files {
            tree.insert_file(version_id, file)?;
        }

        trace!("{} Tree:\n{}", ctx.tag(), tree);
        Ok(tree)
    }

    fn add_version_folders(
        &self,
        tree: &mut SmTree,
        parent: NodeId,
        base_dir: &Path,
        selection: &EventSelection,
        ctx: &LogContext,
    ) -> Result<(), PrismError> {
        for version in VersionFolder::ALL {
            if !selection.includes(version) {
                continue;
            }
            let dir = base_dir.join(version.name());
            if !self.listing.is_dir(&dir) {
                debug!("{} No {} folder in {}", ctx.tag(), version.name(), base_dir.display());
                continue;
            }

            let version_id = tree.insert_container(parent, version.name())?;
            for file in self.listing.list_files(&dir)? {
                tree.insert_file(version_id, &file)?;
            }
        }
        Ok(())
    }
}

/// Имя события/станции должно быть одним сегментом пути.
fn ensure_segment_name(name: &str, what: &'static str) -> Result<(), PrismError> {
    if name.trim().is_empty() {
        return Err(PrismError::EmptySelection(what));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(PrismError::InvalidPath(format!("{what} is not a folder name: {name}"))),
    }
}
